//! Export of analysis results as downloadable files
//!
//! Three renderings are supported: a CSV with a per-layer summary followed by
//! feature tables, a JSON document carrying the full results, and a short
//! plain-text report. Rendering is pure; [`ExportArtifact::write_to`] is the
//! only operation touching the filesystem.

mod csv;
mod json;
mod text;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{AoiscanError, Result};
use crate::models::AnalysisResult;

pub use self::csv::render_csv;
pub use self::json::{render_json, JsonReport, ReportSummary};
pub use self::text::render_text;

/// Output format of an export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Json,
    Text,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 3] = [ExportFormat::Csv, ExportFormat::Json, ExportFormat::Text];

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Text => "txt",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Json => "application/json",
            ExportFormat::Text => "text/plain",
        }
    }

    /// Parse a format name
    pub fn parse(name: &str) -> Result<Self> {
        match name.to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            "text" | "txt" | "report" => Ok(ExportFormat::Text),
            _ => Err(AoiscanError::ConfigInvalid {
                key: "format".to_string(),
                reason: format!("Invalid export format: {}. Use csv, json, or text", name),
            }),
        }
    }
}

/// Report metadata shared by all formats
#[derive(Debug, Clone)]
pub struct ReportContext {
    pub title: String,
    pub generated_at: DateTime<Utc>,
}

impl ReportContext {
    /// Context stamped with the current time
    pub fn new(title: impl Into<String>) -> Self {
        Self { title: title.into(), generated_at: Utc::now() }
    }

    pub fn at(title: impl Into<String>, generated_at: DateTime<Utc>) -> Self {
        Self { title: title.into(), generated_at }
    }
}

/// A rendered export ready for download
#[derive(Debug, Clone, PartialEq)]
pub struct ExportArtifact {
    pub filename: String,
    pub mime_type: &'static str,
    pub content: String,
}

impl ExportArtifact {
    /// Write the artifact into `dir`, creating it when missing
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(dir)
            .map_err(|source| AoiscanError::ExportWrite { path: dir.to_path_buf(), source })?;

        let path = dir.join(&self.filename);
        fs::write(&path, self.content.as_bytes())
            .map_err(|source| AoiscanError::ExportWrite { path: path.clone(), source })?;

        tracing::info!(path = %path.display(), bytes = self.content.len(), "Export written");
        Ok(path)
    }
}

/// Render `results` in `format`
///
/// Fails with [`AoiscanError::NoData`] when there is nothing to export.
pub fn export(
    results: &[AnalysisResult],
    context: &ReportContext,
    format: ExportFormat,
) -> Result<ExportArtifact> {
    if results.is_empty() {
        return Err(AoiscanError::NoData);
    }

    let content = match format {
        ExportFormat::Csv => render_csv(results),
        ExportFormat::Json => render_json(results, context)?,
        ExportFormat::Text => render_text(results, context),
    };

    Ok(ExportArtifact {
        filename: report_filename(&context.title, format),
        mime_type: format.mime_type(),
        content,
    })
}

/// `<title>_analysis.<ext>` safe to use as a single file name
///
/// Every run of whitespace, path separators, quotes and control characters
/// becomes one `_`, and leading dots are replaced so the name can neither
/// leave the target directory nor be hidden.
pub fn report_filename(title: &str, format: ExportFormat) -> String {
    let mut stem = String::with_capacity(title.len());
    let mut in_gap = false;
    for c in title.chars() {
        if is_filename_gap(c) {
            if !in_gap {
                stem.push('_');
            }
            in_gap = true;
        } else {
            stem.push(c);
            in_gap = false;
        }
    }

    let dots = stem.len() - stem.trim_start_matches('.').len();
    if dots > 0 {
        stem.replace_range(..dots, &"_".repeat(dots));
    }

    format!("{}_analysis.{}", stem, format.extension())
}

fn is_filename_gap(c: char) -> bool {
    c.is_whitespace() || c.is_control() || matches!(c, '/' | '\\' | '"')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AttributeMap;
    use serde_json::json;
    use tempfile::TempDir;

    fn sample() -> Vec<AnalysisResult> {
        let mut row = AttributeMap::new();
        row.insert("NAME".to_string(), json!("Well 1"));
        vec![AnalysisResult::new(Some("Wells".into()), "https://x/FeatureServer/0", vec![row])]
    }

    #[test]
    fn test_filename() {
        assert_eq!(report_filename("Area Analysis Tool", ExportFormat::Csv), "Area_Analysis_Tool_analysis.csv");
        assert_eq!(report_filename("Oil  &\tGas", ExportFormat::Json), "Oil_&_Gas_analysis.json");
        assert_eq!(report_filename("Report", ExportFormat::Text), "Report_analysis.txt");
    }

    #[test]
    fn test_filename_strips_path_components() {
        assert_eq!(report_filename("Wells / Pipelines", ExportFormat::Csv), "Wells_Pipelines_analysis.csv");
        assert_eq!(report_filename("../escaped", ExportFormat::Csv), "___escaped_analysis.csv");
        assert_eq!(report_filename("..\\x\"y", ExportFormat::Json), "___x_y_analysis.json");
        assert_eq!(report_filename(".hidden", ExportFormat::Text), "_hidden_analysis.txt");
        assert_eq!(report_filename("a\r\nb", ExportFormat::Csv), "a_b_analysis.csv");
        assert_eq!(report_filename("1.5 km", ExportFormat::Csv), "1.5_km_analysis.csv");
    }

    #[test]
    fn test_write_to_keeps_hostile_titles_inside_dir() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("out");

        for title in ["Wells / Pipelines", "../escaped", "../../etc/passwd"] {
            let artifact = export(&sample(), &ReportContext::new(title), ExportFormat::Csv).unwrap();
            let path = artifact.write_to(&target).unwrap();
            assert_eq!(path.parent(), Some(target.as_path()));
            assert!(path.is_file());
        }

        let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_empty_results_is_no_data() {
        let context = ReportContext::new("Report");
        for format in ExportFormat::ALL {
            assert!(matches!(export(&[], &context, format), Err(AoiscanError::NoData)));
        }
    }

    #[test]
    fn test_artifact_metadata() {
        let context = ReportContext::new("My Report");
        let artifact = export(&sample(), &context, ExportFormat::Json).unwrap();
        assert_eq!(artifact.filename, "My_Report_analysis.json");
        assert_eq!(artifact.mime_type, "application/json");

        let artifact = export(&sample(), &context, ExportFormat::Text).unwrap();
        assert_eq!(artifact.mime_type, "text/plain");
    }

    #[test]
    fn test_parse_format() {
        assert_eq!(ExportFormat::parse("CSV").unwrap(), ExportFormat::Csv);
        assert_eq!(ExportFormat::parse("txt").unwrap(), ExportFormat::Text);
        assert!(ExportFormat::parse("pdf").is_err());
    }

    #[test]
    fn test_write_to_creates_directory() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("exports");
        let artifact = export(&sample(), &ReportContext::new("Wells"), ExportFormat::Csv).unwrap();

        let path = artifact.write_to(&target).unwrap();
        assert_eq!(path, target.join("Wells_analysis.csv"));
        assert_eq!(std::fs::read_to_string(path).unwrap(), artifact.content);
    }
}
