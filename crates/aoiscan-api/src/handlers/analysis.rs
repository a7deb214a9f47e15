use std::sync::Arc;

use axum::{extract::State, Json};
use aoiscan_core::models::AnalysisResult;

use crate::dto::{AnalyzeRequest, AnalyzeResponse};
use crate::error::ApiError;
use crate::state::AppState;

pub async fn handle_analyze(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let _guard = state
        .try_begin_run()
        .ok_or_else(|| ApiError::conflict("Analysis already in progress"))?;

    tracing::info!(
        has_region = request.region.is_some(),
        use_current_view = request.use_current_view,
        layers = request.layers.as_ref().map_or(0, Vec::len),
        "Processing analyze request"
    );

    let analysis = request.into_analysis(state.viewport);
    let run = state.runner.run(&analysis).await.map_err(|e| {
        tracing::warn!(error = %e, "Analysis rejected");
        ApiError::from(e)
    })?;

    let response = AnalyzeResponse::from(&run);
    state.replace_results(run.results);

    Ok(Json(response))
}

pub async fn list_results(State(state): State<Arc<AppState>>) -> Json<Vec<AnalysisResult>> {
    Json(state.results().as_ref().clone())
}
