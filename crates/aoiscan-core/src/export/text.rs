use chrono::Local;

use super::ReportContext;
use crate::models::{total_features, AnalysisResult};

/// Plain-text summary report
pub fn render_text(results: &[AnalysisResult], context: &ReportContext) -> String {
    let title = &context.title;
    let date = context.generated_at.with_timezone(&Local).format("%-m/%-d/%Y");

    let mut lines = vec![
        title.clone(),
        "=".repeat(title.chars().count()),
        String::new(),
        format!("Analysis Date: {}", date),
        format!("Total Layers Analyzed: {}", results.len()),
        format!("Total Features Found: {}", total_features(results)),
        String::new(),
        "Results by Layer:".to_string(),
        String::new(),
    ];

    for result in results {
        lines.push(format!("{}: {} features", result.layer_title(), result.feature_count()));
        if !result.layer_url().is_empty() {
            lines.push(format!("  URL: {}", result.layer_url()));
        }
        lines.push(String::new());
    }

    lines.join("\n")
}
