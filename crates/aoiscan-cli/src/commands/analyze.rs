//! Analyze command implementation

use crate::cli::AnalyzeArgs;
use crate::config::load_config_with_overrides;
use crate::output::OutputWriter;
use crate::output_types::{AnalyzeOutput, LayerRow};
use crate::progress::LayerProgress;
use anyhow::{Context, Result};
use aoiscan_analysis::{AnalysisRequest, AnalysisRunner, RunOptions};
use aoiscan_core::config::CliConfigOverrides;
use aoiscan_core::error::AoiscanError;
use aoiscan_core::export::{export, ExportFormat, ReportContext};
use aoiscan_core::models::{Envelope, Geometry, MapView, Region, Viewport};
use aoiscan_core::widget::{parse_extent, Preset, WidgetConfig, DEFAULT_EXTENT, DEFAULT_REPORT_TITLE};
use aoiscan_service::default_service;
use std::path::Path;
use std::sync::Arc;

pub async fn execute(args: AnalyzeArgs, output: &OutputWriter, config_file: Option<&Path>) -> Result<()> {
    let formats = args
        .export
        .iter()
        .map(|f| ExportFormat::parse(f))
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let overrides = CliConfigOverrides {
        request_timeout_secs: args.request_timeout,
        layer_timeout_secs: args.layer_timeout,
        concurrency: args.concurrency,
        max_features_per_layer: args.max_features,
        max_retries: args.max_retries,
        viewport: args.viewport.as_deref().map(Viewport::parse).transpose()?,
        default_layers: None,
    };
    let config = load_config_with_overrides(config_file, overrides)?;

    let widget = widget_config(&args)?;
    let request = build_request(&args, &widget, config.viewport.value).await?;

    let title = args
        .title
        .clone()
        .or_else(|| widget.report_title.clone())
        .unwrap_or_else(|| DEFAULT_REPORT_TITLE.to_string());

    let options = RunOptions::from_config(&config);
    let planned = if request.layers.is_empty() { options.default_layers.len() } else { request.layers.len() };

    let progress = Arc::new(if output.is_json() { LayerProgress::hidden() } else { LayerProgress::new(planned) });

    let service = default_service(&config)?;
    let runner = AnalysisRunner::with_options(service, options).with_observer(progress.clone());

    tracing::debug!(title = %title, layers = planned, "Running analysis");
    let run = runner.run(&request).await;
    progress.finish();
    let run = run?;

    let mut exports = Vec::new();
    if !formats.is_empty() {
        let context = ReportContext::new(title.clone());
        for format in formats {
            match export(&run.results, &context, format) {
                Ok(artifact) => exports.push(artifact.write_to(&args.out)?),
                Err(AoiscanError::NoData) => {
                    output.warning(format!("No Data: nothing to write as {}", format.extension()));
                    break;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    let rows: Vec<LayerRow> = run
        .results
        .iter()
        .map(|r| LayerRow {
            layer_title: r.layer_title().to_string(),
            feature_count: r.feature_count(),
            layer_url: r.layer_url().to_string(),
        })
        .collect();

    if output.is_json() {
        output.result(AnalyzeOutput {
            run_id: run.id,
            report_title: title,
            total_layers: run.total_layers(),
            total_features: run.total_features(),
            results: rows,
            failed_layers: run.failures.clone(),
            exports,
        })?;
        return Ok(());
    }

    output.section(&title);
    output.table(rows);

    for failure in &run.failures {
        output.warning(format!("Skipped {}: {}", failure.layer_url, failure.message));
    }

    output.kv("Layers analyzed", format!("{} of {}", run.results.len(), run.total_layers()));
    output.kv("Total features", run.total_features());
    output.kv("Elapsed", format!("{} ms", run.elapsed().num_milliseconds()));

    for path in &exports {
        output.success(format!("Wrote {}", path.display()));
    }

    Ok(())
}

/// Widget settings from `--preset`, overlaid by `--url`
fn widget_config(args: &AnalyzeArgs) -> Result<WidgetConfig> {
    let mut config = match &args.preset {
        Some(name) => Preset::parse(name)?.config(),
        None => WidgetConfig::default(),
    };

    if let Some(url) = &args.url {
        let from_url = WidgetConfig::from_url(url);
        config.report_title = from_url.report_title.or(config.report_title);
        config.layers = from_url.layers.or(config.layers);
        config.basemap = from_url.basemap.or(config.basemap);
        config.extent = from_url.extent.or(config.extent);
    }

    Ok(config)
}

async fn build_request(
    args: &AnalyzeArgs,
    widget: &WidgetConfig,
    viewport: Viewport,
) -> Result<AnalysisRequest> {
    let mut request = AnalysisRequest::new();

    if let Some(bbox) = &args.bbox {
        request = request.with_region(Region::envelope(Envelope::parse(bbox)?));
    } else if let Some(path) = &args.geometry {
        let text = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read geometry file {}", path.display()))?;
        request = request.with_region(Region::geometry(Geometry::parse_geojson(&text)?));
    } else if args.current_view {
        let extent = match &args.extent {
            Some(text) => parse_extent(text).ok_or_else(|| AoiscanError::InvalidRegion {
                reason: format!("extent '{}' needs three numbers: lon,lat,zoom", text),
            })?,
            None => widget.extent.unwrap_or(DEFAULT_EXTENT),
        };
        request = request.with_region(Region::CurrentView).with_view(MapView::from_extent(extent, viewport));
    }

    let layers: Vec<String> = if args.layers.is_empty() {
        widget.layers.clone().unwrap_or_default()
    } else {
        args.layers.clone()
    };

    Ok(request.with_layers(layers))
}
