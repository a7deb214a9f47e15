use axum::{
    extract::{Query, RawQuery},
    response::Html,
    Json,
};
use aoiscan_core::embed::iframe_embed_code;
use aoiscan_core::widget::{validate_layer_url, WidgetConfig};

use crate::dto::{ConfigResponse, EmbedQuery, LayerStatus};
use crate::error::ApiError;

/// Resolve widget settings from the request's own query string
pub async fn resolve_config(RawQuery(query): RawQuery) -> Json<ConfigResponse> {
    let query = query.unwrap_or_default();
    let config = WidgetConfig::from_query(&query);
    let embedded = config.is_embedded(&query);
    let widget = config.resolve();

    let layer_status = widget
        .layers
        .iter()
        .map(|url| LayerStatus { url: url.clone(), valid: validate_layer_url(url) })
        .collect();

    tracing::debug!(
        title = %widget.report_title,
        layers = widget.layers.len(),
        embedded,
        "Resolved widget config"
    );

    Json(ConfigResponse { widget, layer_status, embedded })
}

pub async fn embed_code(Query(params): Query<EmbedQuery>) -> Result<Html<String>, ApiError> {
    let url = params
        .url
        .filter(|u| !u.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("Missing url parameter"))?;

    Ok(Html(iframe_embed_code(&url, params.width.as_deref(), params.height.as_deref())))
}
