use serde_json::Value;

use crate::models::AnalysisResult;

const SUMMARY_HEADER: &str = "Layer,Feature Count,Layer URL";

/// Summary rows, then one feature table per non-empty layer
pub fn render_csv(results: &[AnalysisResult]) -> String {
    let mut rows: Vec<String> = Vec::with_capacity(results.len() + 1);
    rows.push(SUMMARY_HEADER.to_string());

    for result in results {
        rows.push(format!(
            "{},{},{}",
            quote(result.layer_title()),
            result.feature_count(),
            quote(result.layer_url())
        ));
    }

    for result in results {
        let Some(first) = result.features().first() else {
            continue;
        };

        rows.push(String::new());
        rows.push(format!("Features from {}:", result.layer_title()));

        // Columns come from the first feature; later rows may lack some of them
        let headers: Vec<&String> = first.keys().collect();
        rows.push(headers.iter().map(|h| quote(h)).collect::<Vec<_>>().join(","));

        for feature in result.features() {
            let row = headers
                .iter()
                .map(|h| quote(&cell_text(feature.get(h.as_str()))))
                .collect::<Vec<_>>()
                .join(",");
            rows.push(row);
        }
    }

    rows.join("\n")
}

fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(other) => other.to_string(),
    }
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AttributeMap;
    use serde_json::json;

    fn row(pairs: &[(&str, Value)]) -> AttributeMap {
        pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
    }

    #[test]
    fn test_summary_and_feature_block() {
        let results = vec![AnalysisResult::new(
            Some("Wells".into()),
            "https://x/FeatureServer/0",
            vec![
                row(&[("OBJECTID", json!(1)), ("NAME", json!("Alpha")), ("ACTIVE", json!(true))]),
                row(&[("OBJECTID", json!(2)), ("NAME", json!(null))]),
            ],
        )];

        let csv = render_csv(&results);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Layer,Feature Count,Layer URL",
                "\"Wells\",2,\"https://x/FeatureServer/0\"",
                "",
                "Features from Wells:",
                "\"OBJECTID\",\"NAME\",\"ACTIVE\"",
                "\"1\",\"Alpha\",\"true\"",
                "\"2\",\"\",\"\"",
            ]
        );
    }

    #[test]
    fn test_empty_layer_has_no_feature_block() {
        let results = vec![
            AnalysisResult::new(Some("Empty".into()), "https://e/0", vec![]),
            AnalysisResult::new(Some("Full".into()), "https://f/0", vec![row(&[("A", json!(0))])]),
        ];

        let csv = render_csv(&results);
        assert!(!csv.contains("Features from Empty:"));
        assert!(csv.contains("Features from Full:"));
        assert!(csv.contains("\"Empty\",0,\"https://e/0\""));
        // zero is a value, not a missing field
        assert!(csv.ends_with("\"0\""));
    }

    #[test]
    fn test_embedded_quotes_are_doubled() {
        let results = vec![AnalysisResult::new(
            Some("The \"Big\" Layer".into()),
            "https://q/0",
            vec![row(&[("NOTE", json!("says \"hi\", then leaves"))])],
        )];

        let csv = render_csv(&results);
        assert!(csv.contains("\"The \"\"Big\"\" Layer\",1,"));
        assert!(csv.contains("\"says \"\"hi\"\", then leaves\""));
    }

    #[test]
    fn test_nested_values_render_as_json() {
        let results = vec![AnalysisResult::new(
            Some("L".into()),
            "u",
            vec![row(&[("TAGS", json!(["a", "b"]))])],
        )];
        assert!(render_csv(&results).ends_with("\"[\"\"a\"\",\"\"b\"\"]\""));
    }
}
