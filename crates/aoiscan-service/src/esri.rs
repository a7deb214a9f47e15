//! Esri JSON encoding of search areas and decoding of REST responses

use aoiscan_core::models::{AttributeMap, Envelope, Geometry, SearchArea};
use serde::Deserialize;
use serde_json::{json, Value};

/// Spatial reference of every geometry sent to services
pub const WGS84_WKID: u32 = 4326;

/// Esri geometry type names
pub const ENVELOPE: &str = "esriGeometryEnvelope";
pub const POINT: &str = "esriGeometryPoint";
pub const MULTIPOINT: &str = "esriGeometryMultipoint";
pub const POLYLINE: &str = "esriGeometryPolyline";
pub const POLYGON: &str = "esriGeometryPolygon";

/// Spatial relationship parameter for intersects queries
pub const SPATIAL_REL_INTERSECTS: &str = "esriSpatialRelIntersects";

/// Encode a search area as `(geometry JSON, geometryType)`
pub fn encode_area(area: &SearchArea) -> (String, &'static str) {
    let sr = json!({ "wkid": WGS84_WKID });
    let (value, kind) = match area {
        SearchArea::Envelope(env) => (envelope_json(env, &sr), ENVELOPE),
        SearchArea::Geometry(geometry) => match geometry {
            Geometry::Point { coordinates } => (
                json!({ "x": coordinates[0], "y": coordinates[1], "spatialReference": sr }),
                POINT,
            ),
            Geometry::MultiPoint { coordinates } => {
                (json!({ "points": coordinates, "spatialReference": sr }), MULTIPOINT)
            }
            Geometry::LineString { coordinates } => {
                (json!({ "paths": [coordinates], "spatialReference": sr }), POLYLINE)
            }
            Geometry::MultiLineString { coordinates } => {
                (json!({ "paths": coordinates, "spatialReference": sr }), POLYLINE)
            }
            Geometry::Polygon { coordinates } => {
                (json!({ "rings": coordinates, "spatialReference": sr }), POLYGON)
            }
            Geometry::MultiPolygon { coordinates } => {
                // Esri polygons carry every ring of every part in one list
                let rings: Vec<&Vec<[f64; 2]>> = coordinates.iter().flatten().collect();
                (json!({ "rings": rings, "spatialReference": sr }), POLYGON)
            }
        },
    };
    (value.to_string(), kind)
}

fn envelope_json(env: &Envelope, sr: &Value) -> Value {
    json!({
        "xmin": env.xmin,
        "ymin": env.ymin,
        "xmax": env.xmax,
        "ymax": env.ymax,
        "spatialReference": sr,
    })
}

/// Error object embedded in a 200 response
#[derive(Debug, Clone, Deserialize)]
pub struct RestError {
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub details: Vec<String>,
}

impl std::fmt::Display for RestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let message = self.message.as_deref().unwrap_or("unknown service error");
        match self.code {
            Some(code) => write!(f, "{} (code {})", message, code)?,
            None => write!(f, "{}", message)?,
        }
        if !self.details.is_empty() {
            write!(f, ": {}", self.details.join("; "))?;
        }
        Ok(())
    }
}

/// Layer description returned by `GET <layer>?f=json`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerInfo {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub geometry_type: Option<String>,
    #[serde(default)]
    pub max_record_count: Option<usize>,
}

/// One page returned by `POST <layer>/query`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryPage {
    #[serde(default)]
    pub features: Vec<QueryFeature>,
    #[serde(default)]
    pub exceeded_transfer_limit: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QueryFeature {
    #[serde(default)]
    pub attributes: AttributeMap,
}

/// Decode a response body, surfacing embedded `{"error": {...}}` objects
pub fn decode<T: for<'de> Deserialize<'de>>(body: &str) -> Result<T, String> {
    let value: Value =
        serde_json::from_str(body).map_err(|e| format!("response is not JSON: {}", e))?;

    if let Some(error) = value.get("error") {
        let rest_error: RestError = serde_json::from_value(error.clone())
            .unwrap_or(RestError { code: None, message: Some(error.to_string()), details: vec![] });
        return Err(rest_error.to_string());
    }

    serde_json::from_value(value).map_err(|e| format!("unexpected response shape: {}", e))
}
