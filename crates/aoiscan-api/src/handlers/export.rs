use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
};
use aoiscan_core::export::{export, ExportFormat, ReportContext};
use aoiscan_core::widget::DEFAULT_REPORT_TITLE;

use crate::dto::ExportQuery;
use crate::error::ApiError;
use crate::state::AppState;

/// Download the latest results as an attachment
pub async fn handle_export(
    State(state): State<Arc<AppState>>,
    Path(format): Path<String>,
    Query(params): Query<ExportQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let format = ExportFormat::parse(&format)
        .map_err(|e| ApiError::bad_request("Unsupported export format").with_details(e.to_string()))?;

    let title = params
        .title
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_REPORT_TITLE.to_string());

    let results = state.results();
    let artifact = export(&results, &ReportContext::new(title), format).map_err(|e| {
        tracing::error!(error = %e, format = format.extension(), "Export failed");
        ApiError::from(e)
    })?;

    tracing::info!(filename = %artifact.filename, bytes = artifact.content.len(), "Serving export");

    let disposition = format!("attachment; filename=\"{}\"", artifact.filename);
    Ok((
        [(header::CONTENT_TYPE, artifact.mime_type.to_string()), (header::CONTENT_DISPOSITION, disposition)],
        artifact.content,
    ))
}
