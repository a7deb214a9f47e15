use crate::error::{AoiscanError, Result};
use crate::models::Viewport;
use crate::widget::DEFAULT_LAYERS;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;

/// Configuration source for tracking where values come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default value
    Default,
    /// Loaded from config file
    File,
    /// Loaded from environment variable
    Environment,
    /// Provided via CLI argument
    Cli,
}

impl ConfigSource {
    /// Returns the precedence level (higher = higher priority)
    pub fn precedence(&self) -> u8 {
        match self {
            ConfigSource::Default => 0,
            ConfigSource::File => 1,
            ConfigSource::Environment => 2,
            ConfigSource::Cli => 3,
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    /// Update the value if the new source has higher precedence
    pub fn update(&mut self, value: T, source: ConfigSource) {
        if source.precedence() > self.source.precedence() {
            self.value = value;
            self.source = source;
        }
    }
}

/// Runtime tunables for the analysis runner and service adapters
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    pub request_timeout_secs: ConfigValue<u64>,
    pub layer_timeout_secs: ConfigValue<u64>,
    pub concurrency: ConfigValue<usize>,
    pub max_features_per_layer: ConfigValue<usize>,
    pub max_retries: ConfigValue<u32>,
    pub viewport: ConfigValue<Viewport>,
    pub default_layers: ConfigValue<Vec<String>>,
}

impl Default for LayeredConfig {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl LayeredConfig {
    /// Create a new configuration with default values
    pub fn with_defaults() -> Self {
        Self {
            request_timeout_secs: ConfigValue::new(30, ConfigSource::Default),
            layer_timeout_secs: ConfigValue::new(60, ConfigSource::Default),
            concurrency: ConfigValue::new(1, ConfigSource::Default),
            max_features_per_layer: ConfigValue::new(10_000, ConfigSource::Default),
            max_retries: ConfigValue::new(3, ConfigSource::Default),
            viewport: ConfigValue::new(Viewport::default(), ConfigSource::Default),
            default_layers: ConfigValue::new(
                DEFAULT_LAYERS.iter().map(|s| s.to_string()).collect(),
                ConfigSource::Default,
            ),
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| AoiscanError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to read config file: {}", e),
            })?;

        let file_config: FileConfig =
            toml::from_str(&content).map_err(|e| AoiscanError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to parse TOML: {}", e),
            })?;

        if let Some(secs) = file_config.request_timeout_secs {
            self.request_timeout_secs.update(positive("request_timeout_secs", secs)?, ConfigSource::File);
        }

        if let Some(secs) = file_config.layer_timeout_secs {
            self.layer_timeout_secs.update(positive("layer_timeout_secs", secs)?, ConfigSource::File);
        }

        if let Some(concurrency) = file_config.concurrency {
            self.concurrency.update(positive("concurrency", concurrency)?, ConfigSource::File);
        }

        if let Some(max) = file_config.max_features_per_layer {
            self.max_features_per_layer
                .update(positive("max_features_per_layer", max)?, ConfigSource::File);
        }

        if let Some(retries) = file_config.max_retries {
            self.max_retries.update(retries, ConfigSource::File);
        }

        if let Some(viewport) = file_config.viewport {
            self.viewport.update(Viewport::parse(&viewport)?, ConfigSource::File);
        }

        if let Some(layers) = file_config.default_layers {
            let layers: Vec<String> = layers
                .into_iter()
                .map(|l| l.trim().to_string())
                .filter(|l| !l.is_empty())
                .collect();
            if layers.is_empty() {
                return Err(AoiscanError::ConfigInvalid {
                    key: "default_layers".to_string(),
                    reason: "must list at least one layer URL".to_string(),
                });
            }
            self.default_layers.update(layers, ConfigSource::File);
        }

        Ok(self)
    }

    /// Load configuration from environment variables
    pub fn load_from_env(mut self) -> Self {
        // AOISCAN_REQUEST_TIMEOUT_SECS
        if let Ok(raw) = env::var("AOISCAN_REQUEST_TIMEOUT_SECS") {
            match parse_positive::<u64>("request_timeout_secs", &raw) {
                Ok(secs) => self.request_timeout_secs.update(secs, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid AOISCAN_REQUEST_TIMEOUT_SECS value '{}': expected positive integer",
                    raw
                ),
            }
        }

        // AOISCAN_LAYER_TIMEOUT_SECS
        if let Ok(raw) = env::var("AOISCAN_LAYER_TIMEOUT_SECS") {
            match parse_positive::<u64>("layer_timeout_secs", &raw) {
                Ok(secs) => self.layer_timeout_secs.update(secs, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid AOISCAN_LAYER_TIMEOUT_SECS value '{}': expected positive integer",
                    raw
                ),
            }
        }

        // AOISCAN_CONCURRENCY
        if let Ok(raw) = env::var("AOISCAN_CONCURRENCY") {
            match parse_positive::<usize>("concurrency", &raw) {
                Ok(n) => self.concurrency.update(n, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid AOISCAN_CONCURRENCY value '{}': expected positive integer",
                    raw
                ),
            }
        }

        // AOISCAN_MAX_FEATURES
        if let Ok(raw) = env::var("AOISCAN_MAX_FEATURES") {
            match parse_positive::<usize>("max_features_per_layer", &raw) {
                Ok(n) => self.max_features_per_layer.update(n, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid AOISCAN_MAX_FEATURES value '{}': expected positive integer",
                    raw
                ),
            }
        }

        // AOISCAN_MAX_RETRIES
        if let Ok(raw) = env::var("AOISCAN_MAX_RETRIES") {
            match raw.trim().parse::<u32>() {
                Ok(n) => self.max_retries.update(n, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid AOISCAN_MAX_RETRIES value '{}': expected integer",
                    raw
                ),
            }
        }

        // AOISCAN_VIEWPORT
        if let Ok(raw) = env::var("AOISCAN_VIEWPORT") {
            match Viewport::parse(&raw) {
                Ok(viewport) => self.viewport.update(viewport, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid AOISCAN_VIEWPORT value '{}': expected WIDTHxHEIGHT",
                    raw
                ),
            }
        }

        // AOISCAN_DEFAULT_LAYERS
        if let Ok(raw) = env::var("AOISCAN_DEFAULT_LAYERS") {
            let layers = parse_layer_list(&raw);
            if layers.is_empty() {
                tracing::warn!("Ignoring empty AOISCAN_DEFAULT_LAYERS");
            } else {
                self.default_layers.update(layers, ConfigSource::Environment);
            }
        }

        self
    }

    /// Update configuration from CLI arguments
    ///
    /// Overrides are checked like file values; nothing is applied when one is invalid.
    pub fn update_from_cli(&mut self, overrides: CliConfigOverrides) -> Result<()> {
        let request_timeout_secs =
            overrides.request_timeout_secs.map(|v| positive("request_timeout_secs", v)).transpose()?;
        let layer_timeout_secs =
            overrides.layer_timeout_secs.map(|v| positive("layer_timeout_secs", v)).transpose()?;
        let concurrency = overrides.concurrency.map(|v| positive("concurrency", v)).transpose()?;
        let max_features_per_layer = overrides
            .max_features_per_layer
            .map(|v| positive("max_features_per_layer", v))
            .transpose()?;

        let default_layers = match overrides.default_layers {
            Some(layers) if layers.is_empty() => {
                return Err(AoiscanError::ConfigInvalid {
                    key: "default_layers".to_string(),
                    reason: "must list at least one layer URL".to_string(),
                });
            }
            other => other,
        };

        if let Some(secs) = request_timeout_secs {
            self.request_timeout_secs.update(secs, ConfigSource::Cli);
        }

        if let Some(secs) = layer_timeout_secs {
            self.layer_timeout_secs.update(secs, ConfigSource::Cli);
        }

        if let Some(n) = concurrency {
            self.concurrency.update(n, ConfigSource::Cli);
        }

        if let Some(n) = max_features_per_layer {
            self.max_features_per_layer.update(n, ConfigSource::Cli);
        }

        if let Some(n) = overrides.max_retries {
            self.max_retries.update(n, ConfigSource::Cli);
        }

        if let Some(viewport) = overrides.viewport {
            self.viewport.update(viewport, ConfigSource::Cli);
        }

        if let Some(layers) = default_layers {
            self.default_layers.update(layers, ConfigSource::Cli);
        }

        Ok(())
    }

    /// Get all configuration values as a map for inspection
    pub fn to_inspection_map(&self) -> HashMap<String, (String, ConfigSource)> {
        let mut map = HashMap::new();

        map.insert(
            "request_timeout_secs".to_string(),
            (self.request_timeout_secs.value.to_string(), self.request_timeout_secs.source),
        );
        map.insert(
            "layer_timeout_secs".to_string(),
            (self.layer_timeout_secs.value.to_string(), self.layer_timeout_secs.source),
        );
        map.insert(
            "concurrency".to_string(),
            (self.concurrency.value.to_string(), self.concurrency.source),
        );
        map.insert(
            "max_features_per_layer".to_string(),
            (self.max_features_per_layer.value.to_string(), self.max_features_per_layer.source),
        );
        map.insert(
            "max_retries".to_string(),
            (self.max_retries.value.to_string(), self.max_retries.source),
        );
        map.insert(
            "viewport".to_string(),
            (
                format!("{}x{}", self.viewport.value.width, self.viewport.value.height),
                self.viewport.source,
            ),
        );
        map.insert(
            "default_layers".to_string(),
            (self.default_layers.value.join(","), self.default_layers.source),
        );

        map
    }
}

/// Configuration loaded from TOML file
#[derive(Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    request_timeout_secs: Option<u64>,
    layer_timeout_secs: Option<u64>,
    concurrency: Option<usize>,
    max_features_per_layer: Option<usize>,
    max_retries: Option<u32>,
    viewport: Option<String>,
    default_layers: Option<Vec<String>>,
}

/// CLI configuration overrides
#[derive(Debug, Default)]
pub struct CliConfigOverrides {
    pub request_timeout_secs: Option<u64>,
    pub layer_timeout_secs: Option<u64>,
    pub concurrency: Option<usize>,
    pub max_features_per_layer: Option<usize>,
    pub max_retries: Option<u32>,
    pub viewport: Option<Viewport>,
    pub default_layers: Option<Vec<String>>,
}

/// Parse a strictly positive integer setting
pub fn parse_positive<T>(key: &str, s: &str) -> Result<T>
where
    T: std::str::FromStr + PartialEq + Default,
{
    let value: T = s.trim().parse().map_err(|_| AoiscanError::ConfigInvalid {
        key: key.to_string(),
        reason: format!("Invalid number: {}", s),
    })?;
    positive(key, value)
}

/// Split a comma-separated layer list, dropping blank entries
pub fn parse_layer_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

fn positive<T: PartialEq + Default>(key: &str, value: T) -> Result<T> {
    if value == T::default() {
        return Err(AoiscanError::ConfigInvalid {
            key: key.to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }
    Ok(value)
}
