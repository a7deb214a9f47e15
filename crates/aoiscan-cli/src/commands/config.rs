//! Config command implementation

use crate::cli::{ConfigAction, ConfigArgs, GenerateArgs};
use crate::config::{config_path, load_config};
use crate::output::OutputWriter;
use crate::output_types::{GenerateOutput, LayerCheck, SettingRow};
use anyhow::{bail, Result};
use aoiscan_core::config::parse_layer_list;
use aoiscan_core::widget::{generate_config_url, parse_extent, validate_layer_url, Preset, WidgetConfig};
use std::path::Path;

pub fn execute(args: ConfigArgs, output: &OutputWriter, config_file: Option<&Path>) -> Result<()> {
    match args.action {
        ConfigAction::Resolve { url } => resolve(&url, output),
        ConfigAction::Generate(args) => generate(args, output),
        ConfigAction::Validate { layers } => validate(&layers, output),
        ConfigAction::Show => show(output, config_file),
    }
}

fn resolve(url: &str, output: &OutputWriter) -> Result<()> {
    let config = WidgetConfig::from_url(url);
    let resolved = config.resolve();

    if output.is_json() {
        return output.result(&resolved);
    }

    output.section("Widget Configuration");
    output.kv("Title", &resolved.report_title);
    output.kv("Basemap", &resolved.basemap);
    output.kv(
        "Extent",
        format!("{}, {} (zoom {})", resolved.extent[0], resolved.extent[1], resolved.extent[2]),
    );

    if resolved.layers.is_empty() {
        output.info("No layers configured; the default layers will be analyzed");
    } else {
        output.table(layer_checks(&resolved.layers));
    }

    if config.is_empty() {
        output.info("No widget parameters found; all values are defaults");
    }

    Ok(())
}

fn generate(args: GenerateArgs, output: &OutputWriter) -> Result<()> {
    let mut config = match &args.preset {
        Some(name) => Preset::parse(name)?.config(),
        None => WidgetConfig::default(),
    };

    if let Some(title) = args.title {
        config.report_title = Some(title);
    }
    if let Some(layers) = args.layers {
        config.layers = Some(parse_layer_list(&layers));
    }
    if let Some(basemap) = args.basemap {
        config.basemap = Some(basemap);
    }
    if let Some(extent) = args.extent {
        match parse_extent(&extent) {
            Some(parsed) => config.extent = Some(parsed),
            None => bail!("Invalid extent '{}': expected lon,lat,zoom", extent),
        }
    }

    for layer in config.layers.iter().flatten() {
        if !validate_layer_url(layer) {
            output.warning(format!("{} does not look like a feature service layer URL", layer));
        }
    }

    let url = generate_config_url(&args.base_url, &config)?;

    if output.is_json() {
        output.result(GenerateOutput { url })
    } else {
        println!("{}", url);
        Ok(())
    }
}

fn validate(layers: &[String], output: &OutputWriter) -> Result<()> {
    let checks = layer_checks(layers);
    let invalid = checks.iter().filter(|c| !c.valid).count();

    if output.is_json() {
        return output.result(&checks);
    }

    output.table(checks);
    if invalid == 0 {
        output.success(format!("All {} layer URLs look valid", layers.len()));
    } else {
        output.warning(format!(
            "{} of {} layer URLs are not https FeatureServer/MapServer endpoints",
            invalid,
            layers.len()
        ));
    }
    Ok(())
}

fn show(output: &OutputWriter, config_file: Option<&Path>) -> Result<()> {
    let config = load_config(config_file)?;

    let mut rows: Vec<SettingRow> = config
        .to_inspection_map()
        .into_iter()
        .map(|(key, (value, source))| SettingRow { key, value, source })
        .collect();
    rows.sort_by(|a, b| a.key.cmp(&b.key));

    if output.is_json() {
        return output.result(&rows);
    }

    output.section("Runtime Configuration");
    if let Some(path) = config_path(config_file) {
        output.kv("Config file", path.display());
    }
    output.table(rows);
    Ok(())
}

fn layer_checks(layers: &[String]) -> Vec<LayerCheck> {
    layers
        .iter()
        .map(|url| LayerCheck { url: url.clone(), valid: validate_layer_url(url) })
        .collect()
}
