use aoiscan_analysis::AnalysisRequest;
use aoiscan_core::models::{MapView, Region, Viewport};
use serde::Deserialize;

/// Analyze request body
///
/// `useCurrentView` analyses the map view given by `extent` when no explicit
/// region is supplied. Omitted `layers` fall back to the configured defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    pub region: Option<Region>,
    pub layers: Option<Vec<String>>,
    #[serde(default)]
    pub use_current_view: bool,

    /// Map view as `[longitude, latitude, zoom]`
    pub extent: Option<[f64; 3]>,
}

impl AnalyzeRequest {
    pub fn into_analysis(self, viewport: Viewport) -> AnalysisRequest {
        let region = match self.region {
            Some(region) => Some(region),
            None if self.use_current_view => Some(Region::CurrentView),
            None => None,
        };

        AnalysisRequest {
            region,
            layers: self.layers.unwrap_or_default(),
            view: self.extent.map(|extent| MapView::from_extent(extent, viewport)),
        }
    }
}

/// Export query parameters
#[derive(Debug, Default, Deserialize)]
pub struct ExportQuery {
    pub title: Option<String>,
}

/// Embed query parameters
#[derive(Debug, Default, Deserialize)]
pub struct EmbedQuery {
    pub url: Option<String>,
    pub width: Option<String>,
    pub height: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_current_view_request() {
        let request: AnalyzeRequest =
            serde_json::from_value(json!({"useCurrentView": true, "extent": [-98.0, 39.5, 4.0]})).unwrap();
        let analysis = request.into_analysis(Viewport::default());

        assert_eq!(analysis.region, Some(Region::CurrentView));
        assert!(analysis.layers.is_empty());
        let view = analysis.view.unwrap();
        assert_eq!(view.center_lon, -98.0);
        assert_eq!(view.width_px, 1024);
    }

    #[test]
    fn test_explicit_region_wins() {
        let request: AnalyzeRequest = serde_json::from_value(json!({
            "region": {"kind": "envelope", "envelope": {"xmin": 0.0, "ymin": 0.0, "xmax": 1.0, "ymax": 1.0}},
            "useCurrentView": true,
            "layers": ["https://h/arcgis/rest/services/W/FeatureServer/0"]
        }))
        .unwrap();
        let analysis = request.into_analysis(Viewport::default());

        assert!(matches!(analysis.region, Some(Region::Envelope { .. })));
        assert_eq!(analysis.layers.len(), 1);
        assert!(analysis.view.is_none());
    }
}
