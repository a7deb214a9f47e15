use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};

use super::ReportContext;
use crate::error::Result;
use crate::models::{total_features, AnalysisResult};

/// JSON export document
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonReport {
    pub report_title: String,
    /// ISO-8601 generation time
    pub analysis_date: String,
    pub summary: ReportSummary,
    pub results: Vec<AnalysisResult>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub total_layers: usize,
    pub total_features: usize,
}

impl ReportSummary {
    pub fn of(results: &[AnalysisResult]) -> Self {
        Self { total_layers: results.len(), total_features: total_features(results) }
    }
}

/// Pretty-printed report carrying every result verbatim
pub fn render_json(results: &[AnalysisResult], context: &ReportContext) -> Result<String> {
    let report = JsonReport {
        report_title: context.title.clone(),
        analysis_date: context.generated_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        summary: ReportSummary::of(results),
        results: results.to_vec(),
    };
    Ok(serde_json::to_string_pretty(&report)?)
}
