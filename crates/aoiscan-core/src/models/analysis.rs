use serde::{Deserialize, Serialize};

/// Attribute row returned for one feature, in service field order
pub type AttributeMap = serde_json::Map<String, serde_json::Value>;

/// Title used when a service does not report one
pub const UNNAMED_LAYER: &str = "Unnamed Layer";

/// Features found in one successfully queried layer
///
/// `feature_count` is derived from `features` and cannot drift from it;
/// deserialization rejects payloads where the two disagree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawAnalysisResult")]
pub struct AnalysisResult {
    layer_title: String,
    layer_url: String,
    feature_count: usize,
    features: Vec<AttributeMap>,
}

impl AnalysisResult {
    /// Create a result; an empty or missing title becomes "Unnamed Layer"
    pub fn new(
        layer_title: Option<String>,
        layer_url: impl Into<String>,
        features: Vec<AttributeMap>,
    ) -> Self {
        let layer_title = layer_title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| UNNAMED_LAYER.to_string());

        Self {
            layer_title,
            layer_url: layer_url.into(),
            feature_count: features.len(),
            features,
        }
    }

    pub fn layer_title(&self) -> &str {
        &self.layer_title
    }

    pub fn layer_url(&self) -> &str {
        &self.layer_url
    }

    pub fn feature_count(&self) -> usize {
        self.feature_count
    }

    pub fn features(&self) -> &[AttributeMap] {
        &self.features
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAnalysisResult {
    layer_title: String,
    layer_url: String,
    feature_count: usize,
    features: Vec<AttributeMap>,
}

impl TryFrom<RawAnalysisResult> for AnalysisResult {
    type Error = String;

    fn try_from(raw: RawAnalysisResult) -> Result<Self, Self::Error> {
        if raw.feature_count != raw.features.len() {
            return Err(format!(
                "featureCount {} does not match {} features",
                raw.feature_count,
                raw.features.len()
            ));
        }
        Ok(Self {
            layer_title: raw.layer_title,
            layer_url: raw.layer_url,
            feature_count: raw.feature_count,
            features: raw.features,
        })
    }
}

/// Sum of feature counts across results
pub fn total_features(results: &[AnalysisResult]) -> usize {
    results.iter().map(AnalysisResult::feature_count).sum()
}

/// Stage at which a layer failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FailureStage {
    Load,
    Query,
    Timeout,
}

/// A layer that contributed nothing to a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerFailure {
    pub layer_url: String,
    pub stage: FailureStage,
    pub message: String,
}
