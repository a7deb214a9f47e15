use aoiscan_core::config::LayeredConfig;
use aoiscan_core::models::{total_features, AnalysisResult, LayerFailure, MapView, Region};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

/// What to analyse: an optional region, the layers to query and the map view
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    /// Area of interest; `None` queries layers unfiltered
    #[serde(default)]
    pub region: Option<Region>,

    /// Layer URLs; empty falls back to the runner's default layers
    #[serde(default)]
    pub layers: Vec<String>,

    /// Current map view, used to resolve `Region::CurrentView`
    #[serde(default)]
    pub view: Option<MapView>,
}

impl AnalysisRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_region(mut self, region: Region) -> Self {
        self.region = Some(region);
        self
    }

    pub fn with_layers(mut self, layers: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.layers = layers.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_view(mut self, view: MapView) -> Self {
        self.view = Some(view);
        self
    }
}

/// Outcome of one analysis run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRun {
    pub id: Uuid,

    /// Successful layers, in request order
    pub results: Vec<AnalysisResult>,

    /// Layers that contributed nothing, in request order
    pub failures: Vec<LayerFailure>,

    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl AnalysisRun {
    /// Sum of feature counts across successful layers
    pub fn total_features(&self) -> usize {
        total_features(&self.results)
    }

    /// Number of layers attempted
    pub fn total_layers(&self) -> usize {
        self.results.len() + self.failures.len()
    }

    pub fn elapsed(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}

/// Runner tunables
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Layers queried at once; 1 runs them strictly one after another
    pub concurrency: usize,

    /// Budget for loading and querying one layer
    pub layer_timeout: Duration,

    /// Layers used when a request names none
    pub default_layers: Vec<String>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self::from_config(&LayeredConfig::with_defaults())
    }
}

impl RunOptions {
    pub fn from_config(config: &LayeredConfig) -> Self {
        Self {
            concurrency: config.concurrency.value.max(1),
            layer_timeout: Duration::from_secs(config.layer_timeout_secs.value),
            default_layers: config.default_layers.value.clone(),
        }
    }
}

/// Result of a single layer, as reported to observers
#[derive(Debug, Clone, Copy)]
pub enum LayerOutcome<'a> {
    Succeeded(&'a AnalysisResult),
    Failed(&'a LayerFailure),
}
