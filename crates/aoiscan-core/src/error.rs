//! Error types for aoiscan

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AoiscanError {
    // Startup errors
    #[error("No map view available and no layers configured for analysis")]
    NothingToAnalyze,

    #[error("Invalid region: {reason}")]
    InvalidRegion { reason: String },

    // Per-layer errors
    #[error("Failed to load layer {url}: {reason}")]
    LayerLoad { url: String, reason: String },

    #[error("Failed to query layer {url}: {reason}")]
    LayerQuery { url: String, reason: String },

    #[error("Layer {url} did not respond within {secs}s")]
    LayerTimeout { url: String, secs: u64 },

    // Export errors
    #[error("No analysis results to download")]
    NoData,

    #[error("Failed to generate download file: {reason}")]
    ExportFailed { reason: String },

    #[error("Failed to write {path}: {source}")]
    ExportWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Configuration errors
    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl AoiscanError {
    /// Whether this error belongs to a single layer and should not abort a run
    pub fn is_layer_failure(&self) -> bool {
        matches!(
            self,
            AoiscanError::LayerLoad { .. }
                | AoiscanError::LayerQuery { .. }
                | AoiscanError::LayerTimeout { .. }
        )
    }
}

impl From<serde_json::Error> for AoiscanError {
    fn from(err: serde_json::Error) -> Self {
        AoiscanError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AoiscanError>;
