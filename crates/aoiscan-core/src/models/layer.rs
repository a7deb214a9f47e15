use serde::{Deserialize, Serialize};

use super::analysis::AttributeMap;
use super::geometry::{SearchArea, SpatialRelationship};

/// A feature-service layer that has been loaded and is ready to query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerHandle {
    /// Endpoint the layer was loaded from
    pub url: String,

    /// Human-readable title reported by the service
    pub title: Option<String>,

    /// Service geometry type (e.g. `esriGeometryPoint`)
    pub geometry_type: Option<String>,

    /// Maximum records the service returns per request
    pub max_record_count: Option<usize>,
}

impl LayerHandle {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: None,
            geometry_type: None,
            max_record_count: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// Attribute query against one layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerQuery {
    /// Spatial filter; `None` queries the whole layer
    pub area: Option<SearchArea>,
    pub spatial_relationship: SpatialRelationship,
    pub out_fields: Vec<String>,
    pub return_geometry: bool,
}

impl Default for LayerQuery {
    fn default() -> Self {
        Self {
            area: None,
            spatial_relationship: SpatialRelationship::Intersects,
            out_fields: vec!["*".to_string()],
            return_geometry: false,
        }
    }
}

impl LayerQuery {
    /// All fields, no geometry, intersecting `area` when given
    pub fn intersecting(area: Option<SearchArea>) -> Self {
        Self { area, ..Default::default() }
    }

    /// Comma-joined field list as sent to services
    pub fn out_fields_param(&self) -> String {
        self.out_fields.join(",")
    }
}

/// Rows returned by a layer query
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureSet {
    pub title: Option<String>,
    pub features: Vec<AttributeMap>,
}
