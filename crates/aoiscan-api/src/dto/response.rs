use aoiscan_analysis::AnalysisRun;
use aoiscan_core::models::{AnalysisResult, LayerFailure};
use aoiscan_core::widget::ResolvedWidget;
use serde::Serialize;
use uuid::Uuid;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self { status: "ok", service: "aoiscan-api" }
    }
}

/// Whether a configured layer URL looks like a feature service endpoint
#[derive(Debug, Serialize)]
pub struct LayerStatus {
    pub url: String,
    pub valid: bool,
}

/// Widget configuration with defaults applied
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigResponse {
    #[serde(flatten)]
    pub widget: ResolvedWidget,
    pub layer_status: Vec<LayerStatus>,

    /// True when the page should render only the embedded tool
    pub embedded: bool,
}

/// Per-layer line of a run summary
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerSummary {
    pub layer_title: String,
    pub layer_url: String,
    pub feature_count: usize,
}

impl From<&AnalysisResult> for LayerSummary {
    fn from(result: &AnalysisResult) -> Self {
        Self {
            layer_title: result.layer_title().to_string(),
            layer_url: result.layer_url().to_string(),
            feature_count: result.feature_count(),
        }
    }
}

/// Summary of a finished run
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResponse {
    pub run_id: Uuid,
    pub total_layers: usize,
    pub total_features: usize,
    pub results: Vec<LayerSummary>,
    pub failed_layers: Vec<LayerFailure>,
    pub elapsed_ms: i64,
}

impl From<&AnalysisRun> for AnalyzeResponse {
    fn from(run: &AnalysisRun) -> Self {
        Self {
            run_id: run.id,
            total_layers: run.total_layers(),
            total_features: run.total_features(),
            results: run.results.iter().map(LayerSummary::from).collect(),
            failed_layers: run.failures.clone(),
            elapsed_ms: run.elapsed().num_milliseconds(),
        }
    }
}
