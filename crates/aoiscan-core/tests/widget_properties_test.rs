//! Property tests for widget URL resolution and export totals

use aoiscan_core::export::{export, ExportFormat, JsonReport, ReportContext};
use aoiscan_core::models::{AnalysisResult, AttributeMap};
use aoiscan_core::widget::{generate_config_url, parse_extent, WidgetConfig};
use proptest::prelude::*;
use serde_json::json;

fn results_strategy() -> impl Strategy<Value = Vec<AnalysisResult>> {
    prop::collection::vec(("[A-Za-z ]{0,12}", 0usize..20), 1..6).prop_map(|layers| {
        layers
            .into_iter()
            .enumerate()
            .map(|(i, (title, count))| {
                let features = (0..count)
                    .map(|n| {
                        let mut row = AttributeMap::new();
                        row.insert("OBJECTID".to_string(), json!(n));
                        row
                    })
                    .collect();
                AnalysisResult::new(Some(title), format!("https://h/{}/FeatureServer/0", i), features)
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn resolving_arbitrary_queries_never_panics(query in ".{0,200}") {
        let config = WidgetConfig::from_query(&query);
        let resolved = config.resolve();
        prop_assert!(!resolved.report_title.is_empty());
        prop_assert!(!resolved.basemap.is_empty());
    }

    #[test]
    fn extent_is_set_only_for_three_finite_values(
        values in prop::collection::vec(-1000.0f64..1000.0, 0..6)
    ) {
        let text = values.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(",");
        let parsed = parse_extent(&text);
        if values.len() == 3 {
            prop_assert_eq!(parsed, Some([values[0], values[1], values[2]]));
        } else {
            prop_assert!(parsed.is_none());
        }
    }

    #[test]
    fn generated_urls_round_trip(
        title in "\\PC{1,40}",
        layers in prop::collection::vec("https://[a-z]{1,8}\\.com/[A-Za-z_ %,]{1,20}/FeatureServer/[0-9]", 1..4),
        basemap in "[a-z-]{1,16}",
    ) {
        let config = WidgetConfig {
            report_title: Some(title),
            layers: Some(layers),
            basemap: Some(basemap),
            extent: Some([-98.0, 39.5, 4.0]),
        };
        let url = generate_config_url("https://example.com/widget", &config).unwrap();
        prop_assert_eq!(WidgetConfig::from_url(&url), config);
    }

    #[test]
    fn json_summary_total_matches_layer_counts(results in results_strategy()) {
        let artifact = export(&results, &ReportContext::new("Totals"), ExportFormat::Json).unwrap();
        let report: JsonReport = serde_json::from_str(&artifact.content).unwrap();

        let sum: usize = report.results.iter().map(AnalysisResult::feature_count).sum();
        prop_assert_eq!(report.summary.total_features, sum);
        prop_assert_eq!(report.summary.total_layers, results.len());
    }

    #[test]
    fn csv_has_one_summary_row_per_layer(results in results_strategy()) {
        let artifact = export(&results, &ReportContext::new("Rows"), ExportFormat::Csv).unwrap();
        let lines: Vec<&str> = artifact.content.split('\n').collect();

        prop_assert_eq!(lines[0], "Layer,Feature Count,Layer URL");
        for (i, result) in results.iter().enumerate() {
            let expected_prefix = format!("\"{}\",{},", result.layer_title(), result.feature_count());
            prop_assert!(lines[i + 1].starts_with(&expected_prefix));
        }

        let blocks = artifact.content.matches("\nFeatures from ").count();
        let non_empty = results.iter().filter(|r| r.feature_count() > 0).count();
        prop_assert_eq!(blocks, non_empty);
    }
}
