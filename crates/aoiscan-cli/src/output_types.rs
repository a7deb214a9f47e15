use aoiscan_core::config::ConfigSource;
use aoiscan_core::models::LayerFailure;
use serde::Serialize;
use std::path::PathBuf;
use tabled::Tabled;
use uuid::Uuid;

/// Output for analyze command
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeOutput {
    pub run_id: Uuid,
    pub report_title: String,
    pub total_layers: usize,
    pub total_features: usize,
    pub results: Vec<LayerRow>,
    pub failed_layers: Vec<LayerFailure>,
    pub exports: Vec<PathBuf>,
}

/// One successful layer
#[derive(Debug, Serialize, Tabled)]
#[serde(rename_all = "camelCase")]
pub struct LayerRow {
    #[tabled(rename = "Layer")]
    pub layer_title: String,
    #[tabled(rename = "Features")]
    pub feature_count: usize,
    #[tabled(rename = "URL")]
    pub layer_url: String,
}

/// Validity of one layer URL
#[derive(Debug, Serialize, Tabled)]
pub struct LayerCheck {
    #[tabled(rename = "Layer")]
    pub url: String,
    #[tabled(rename = "Valid")]
    pub valid: bool,
}

/// Output for config generate command
#[derive(Debug, Serialize)]
pub struct GenerateOutput {
    pub url: String,
}

/// Output for embed command
#[derive(Debug, Serialize)]
pub struct EmbedOutput {
    pub html: String,
}

/// One runtime setting for config show
#[derive(Debug, Serialize, Tabled)]
pub struct SettingRow {
    #[tabled(rename = "Key")]
    pub key: String,
    #[tabled(rename = "Value")]
    pub value: String,
    #[tabled(rename = "Source")]
    #[tabled(display_with = "display_source")]
    pub source: ConfigSource,
}

fn display_source(source: &ConfigSource) -> String {
    format!("{:?}", source)
}

/// One preset for the presets command
#[derive(Debug, Serialize, Tabled)]
#[serde(rename_all = "camelCase")]
pub struct PresetRow {
    #[tabled(rename = "Preset")]
    pub name: String,
    #[tabled(rename = "Title")]
    pub report_title: String,
    #[tabled(rename = "Layers")]
    pub layer_count: usize,
    #[tabled(rename = "Basemap")]
    pub basemap: String,
    #[tabled(rename = "URL")]
    #[tabled(display_with = "display_optional")]
    pub url: Option<String>,
}

fn display_optional(value: &Option<String>) -> String {
    value.clone().unwrap_or_else(|| "-".to_string())
}
