//! In-memory and GeoJSON-backed feature services for offline use and testing.
//!
//! Spatial predicates are evaluated locally with `aoiscan-geo`, so results
//! match what a remote service would return for the same intersects query.

use async_trait::async_trait;
use aoiscan_core::error::{AoiscanError, Result};
use aoiscan_core::models::{AttributeMap, FeatureSet, Geometry, LayerHandle, LayerQuery, SearchArea};
use aoiscan_core::ports::FeatureService;
use aoiscan_geo::spatial::matches_area;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, RwLock};
use std::time::Duration;

/// A feature held by a memory layer
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryFeature {
    pub geometry: Option<Geometry>,
    pub attributes: AttributeMap,
}

impl MemoryFeature {
    pub fn new(geometry: Option<Geometry>, attributes: AttributeMap) -> Self {
        Self { geometry, attributes }
    }
}

/// A registered layer
#[derive(Debug, Clone, Default)]
pub struct MemoryLayer {
    pub title: Option<String>,
    pub features: Vec<MemoryFeature>,

    /// Artificial latency applied to every call, for exercising timeouts
    pub latency: Option<Duration>,
}

impl MemoryLayer {
    pub fn new(title: impl Into<String>, features: Vec<MemoryFeature>) -> Self {
        Self { title: Some(title.into()), features, latency: None }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Parse a GeoJSON document
    ///
    /// The title comes from a top-level `name` member, else `fallback_title`.
    pub fn from_geojson_str(text: &str, fallback_title: Option<&str>) -> Result<Self> {
        let invalid = |reason: String| AoiscanError::Serialization(format!("Invalid GeoJSON: {}", reason));

        let parsed: geojson::GeoJson = text.parse().map_err(|e: geojson::Error| invalid(e.to_string()))?;

        match parsed {
            geojson::GeoJson::FeatureCollection(fc) => {
                let title = fc
                    .foreign_members
                    .as_ref()
                    .and_then(|fm| fm.get("name"))
                    .and_then(|name| name.as_str())
                    .map(str::to_string)
                    .or_else(|| fallback_title.map(str::to_string));

                let features = fc.features.iter().map(convert_feature).collect::<Result<Vec<_>>>()?;
                Ok(Self { title, features, latency: None })
            }
            geojson::GeoJson::Feature(feature) => Ok(Self {
                title: fallback_title.map(str::to_string),
                features: vec![convert_feature(&feature)?],
                latency: None,
            }),
            geojson::GeoJson::Geometry(_) => {
                Err(invalid("expected a FeatureCollection or Feature".to_string()))
            }
        }
    }

    /// Read a GeoJSON file; the file stem is the fallback title
    pub async fn from_geojson_file(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path).await?;
        let stem = path.file_stem().and_then(|s| s.to_str());
        Self::from_geojson_str(&content, stem)
    }

    fn matching(&self, area: Option<&SearchArea>) -> Vec<AttributeMap> {
        self.features
            .iter()
            .filter(|f| matches_area(f.geometry.as_ref(), area))
            .map(|f| f.attributes.clone())
            .collect()
    }
}

/// Convert a GeoJSON feature, keeping property order
fn convert_feature(feature: &geojson::Feature) -> Result<MemoryFeature> {
    let geometry = match &feature.geometry {
        Some(geom) => {
            let value = serde_json::to_value(geom)?;
            Some(Geometry::from_geojson(&value).ok_or_else(|| {
                AoiscanError::Serialization(format!("Unsupported geometry: {}", value))
            })?)
        }
        None => None,
    };

    Ok(MemoryFeature { geometry, attributes: feature.properties.clone().unwrap_or_default() })
}

/// In-memory implementation of FeatureService
#[derive(Debug, Clone, Default)]
pub struct MemoryFeatureService {
    layers: Arc<RwLock<HashMap<String, MemoryLayer>>>,
}

impl MemoryFeatureService {
    /// Create an empty service
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or replace the layer served at `url`
    pub fn register(&self, url: impl Into<String>, layer: MemoryLayer) {
        let mut layers = self.layers.write().unwrap_or_else(|e| e.into_inner());
        layers.insert(url.into(), layer);
    }

    pub fn contains(&self, url: &str) -> bool {
        self.layers.read().unwrap_or_else(|e| e.into_inner()).contains_key(url)
    }

    /// Layer URLs in sorted order
    pub fn layer_urls(&self) -> Vec<String> {
        let layers = self.layers.read().unwrap_or_else(|e| e.into_inner());
        let mut urls: Vec<String> = layers.keys().cloned().collect();
        urls.sort();
        urls
    }

    fn layer(&self, url: &str) -> Option<MemoryLayer> {
        self.layers.read().unwrap_or_else(|e| e.into_inner()).get(url).cloned()
    }
}

#[async_trait]
impl FeatureService for MemoryFeatureService {
    async fn load_layer(&self, url: &str) -> Result<LayerHandle> {
        let layer = self.layer(url).ok_or_else(|| AoiscanError::LayerLoad {
            url: url.to_string(),
            reason: "no such layer".to_string(),
        })?;

        if let Some(latency) = layer.latency {
            tokio::time::sleep(latency).await;
        }

        Ok(LayerHandle {
            url: url.to_string(),
            title: layer.title.clone(),
            geometry_type: None,
            max_record_count: None,
        })
    }

    async fn query_intersecting(&self, handle: &LayerHandle, query: &LayerQuery) -> Result<FeatureSet> {
        let layer = self.layer(&handle.url).ok_or_else(|| AoiscanError::LayerQuery {
            url: handle.url.clone(),
            reason: "layer disappeared".to_string(),
        })?;

        if let Some(latency) = layer.latency {
            tokio::time::sleep(latency).await;
        }

        let features = layer.matching(query.area.as_ref());
        tracing::debug!(url = %handle.url, matched = features.len(), total = layer.features.len(), "Memory query");

        Ok(FeatureSet { title: layer.title, features })
    }
}
