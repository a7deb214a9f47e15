use aoiscan_core::error::{AoiscanError, Result};
use aoiscan_core::models::{AnalysisResult, FailureStage, LayerFailure, LayerQuery};
use aoiscan_core::ports::FeatureService;
use aoiscan_geo::region::resolve_region;
use chrono::Utc;
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use uuid::Uuid;

use crate::models::{AnalysisRequest, AnalysisRun, LayerOutcome, RunOptions};
use crate::observer::{NoopObserver, RunObserver};

/// Runs intersects queries against every requested layer
///
/// A failing layer is logged and recorded but never aborts the run; the
/// remaining layers are still queried.
pub struct AnalysisRunner<S: FeatureService> {
    service: S,
    options: RunOptions,
    observer: Arc<dyn RunObserver>,
}

impl<S: FeatureService> AnalysisRunner<S> {
    /// Create a runner with default options
    pub fn new(service: S) -> Self {
        Self::with_options(service, RunOptions::default())
    }

    pub fn with_options(service: S, options: RunOptions) -> Self {
        Self { service, options, observer: Arc::new(NoopObserver) }
    }

    pub fn with_observer(mut self, observer: Arc<dyn RunObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn options(&self) -> &RunOptions {
        &self.options
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    /// Execute an analysis
    ///
    /// Fails only when there is neither a region nor any configured layer, or
    /// when the supplied region is invalid. Both checks happen before any
    /// service call.
    pub async fn run(&self, request: &AnalysisRequest) -> Result<AnalysisRun> {
        let area = resolve_region(request.region.as_ref(), request.view.as_ref())?;

        if area.is_none() && request.layers.is_empty() {
            return Err(AoiscanError::NothingToAnalyze);
        }

        let layers: &[String] =
            if request.layers.is_empty() { &self.options.default_layers } else { &request.layers };

        let id = Uuid::new_v4();
        let started_at = Utc::now();
        let concurrency = self.options.concurrency.max(1);
        tracing::info!(
            run_id = %id,
            layers = layers.len(),
            concurrency,
            filtered = area.is_some(),
            "Starting analysis"
        );

        let query = LayerQuery::intersecting(area);

        let pending: Vec<_> = layers
            .iter()
            .enumerate()
            .map(|(index, url)| self.run_layer(index, url, &query))
            .collect();

        // `buffered` keeps input order and never lets one failure cancel the rest
        let outcomes: Vec<std::result::Result<AnalysisResult, LayerFailure>> =
            stream::iter(pending).buffered(concurrency).collect().await;

        let mut results = Vec::new();
        let mut failures = Vec::new();
        for outcome in outcomes {
            match outcome {
                Ok(result) => results.push(result),
                Err(failure) => failures.push(failure),
            }
        }

        let run = AnalysisRun { id, results, failures, started_at, finished_at: Utc::now() };

        tracing::info!(
            run_id = %id,
            succeeded = run.results.len(),
            failed = run.failures.len(),
            total_features = run.total_features(),
            elapsed_ms = run.elapsed().num_milliseconds(),
            "Analysis complete"
        );

        Ok(run)
    }

    async fn run_layer(
        &self,
        index: usize,
        url: &str,
        query: &LayerQuery,
    ) -> std::result::Result<AnalysisResult, LayerFailure> {
        self.observer.layer_started(index, url);

        let outcome = match tokio::time::timeout(self.options.layer_timeout, self.query_layer(url, query)).await {
            Ok(Ok(result)) => Ok(result),
            Ok(Err(err)) => Err(failure_from_error(url, err)),
            Err(_) => Err(failure_from_error(
                url,
                AoiscanError::LayerTimeout { url: url.to_string(), secs: self.options.layer_timeout.as_secs() },
            )),
        };

        match &outcome {
            Ok(result) => {
                tracing::debug!(url, features = result.feature_count(), "Layer analysed");
                self.observer.layer_finished(index, url, LayerOutcome::Succeeded(result));
            }
            Err(failure) => {
                tracing::warn!(url, stage = ?failure.stage, error = %failure.message, "Failed to analyze layer");
                self.observer.layer_finished(index, url, LayerOutcome::Failed(failure));
            }
        }

        outcome
    }

    async fn query_layer(&self, url: &str, query: &LayerQuery) -> Result<AnalysisResult> {
        let layer = self.service.load_layer(url).await?;
        let set = self.service.query_intersecting(&layer, query).await?;

        let title = set.title.or(layer.title);
        Ok(AnalysisResult::new(title, url, set.features))
    }
}

fn failure_from_error(url: &str, err: AoiscanError) -> LayerFailure {
    let stage = match &err {
        AoiscanError::LayerTimeout { .. } => FailureStage::Timeout,
        AoiscanError::LayerQuery { .. } => FailureStage::Query,
        _ => FailureStage::Load,
    };
    LayerFailure { layer_url: url.to_string(), stage, message: err.to_string() }
}
