//! Canonical geometry and region types used across all aoiscan crates.
//!
//! Geometries mirror GeoJSON so they can be read from request bodies and
//! files directly, and are converted to `geo` types where predicates are
//! evaluated.

use serde::{Deserialize, Serialize};

use crate::error::{AoiscanError, Result};

/// GeoJSON-compatible geometry representation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Point {
        coordinates: [f64; 2],
    },
    LineString {
        coordinates: Vec<[f64; 2]>,
    },
    Polygon {
        coordinates: Vec<Vec<[f64; 2]>>,
    },
    MultiPoint {
        coordinates: Vec<[f64; 2]>,
    },
    MultiLineString {
        coordinates: Vec<Vec<[f64; 2]>>,
    },
    MultiPolygon {
        coordinates: Vec<Vec<Vec<[f64; 2]>>>,
    },
}

impl Geometry {
    /// Create a Point geometry
    pub fn point(x: f64, y: f64) -> Self {
        Geometry::Point { coordinates: [x, y] }
    }

    /// Create a LineString geometry
    pub fn line_string(coords: Vec<[f64; 2]>) -> Self {
        Geometry::LineString { coordinates: coords }
    }

    /// Create a Polygon geometry
    pub fn polygon(rings: Vec<Vec<[f64; 2]>>) -> Self {
        Geometry::Polygon { coordinates: rings }
    }

    /// All coordinates of the geometry, flattened
    pub fn coordinates(&self) -> Vec<[f64; 2]> {
        match self {
            Geometry::Point { coordinates } => vec![*coordinates],
            Geometry::LineString { coordinates } | Geometry::MultiPoint { coordinates } => {
                coordinates.clone()
            }
            Geometry::Polygon { coordinates } | Geometry::MultiLineString { coordinates } => {
                coordinates.iter().flatten().copied().collect()
            }
            Geometry::MultiPolygon { coordinates } => {
                coordinates.iter().flatten().flatten().copied().collect()
            }
        }
    }

    /// Bounding envelope of the geometry, `None` when it has no coordinates
    pub fn envelope(&self) -> Option<Envelope> {
        let coords = self.coordinates();
        let first = coords.first()?;
        let init = Envelope::new(first[0], first[1], first[0], first[1]);
        Some(coords.iter().skip(1).fold(init, |env, c| Envelope {
            xmin: env.xmin.min(c[0]),
            ymin: env.ymin.min(c[1]),
            xmax: env.xmax.max(c[0]),
            ymax: env.ymax.max(c[1]),
        }))
    }

    /// Try to parse from a serde_json::Value (GeoJSON)
    pub fn from_geojson(value: &serde_json::Value) -> Option<Self> {
        serde_json::from_value(value.clone()).ok()
    }

    /// Parse a GeoJSON string, accepting a bare geometry or a Feature wrapping one
    pub fn parse_geojson(text: &str) -> Result<Self> {
        let value: serde_json::Value =
            serde_json::from_str(text).map_err(|e| AoiscanError::InvalidRegion {
                reason: format!("geometry is not valid JSON: {}", e),
            })?;

        let geometry_value = match value.get("type").and_then(|t| t.as_str()) {
            Some("Feature") => value.get("geometry").cloned().unwrap_or_default(),
            _ => value,
        };

        Self::from_geojson(&geometry_value).ok_or_else(|| AoiscanError::InvalidRegion {
            reason: "expected a GeoJSON geometry or Feature".to_string(),
        })
    }
}

/// Axis-aligned bounding box in WGS 84 degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub xmin: f64,
    pub ymin: f64,
    pub xmax: f64,
    pub ymax: f64,
}

impl Envelope {
    pub fn new(xmin: f64, ymin: f64, xmax: f64, ymax: f64) -> Self {
        Self { xmin, ymin, xmax, ymax }
    }

    /// Parse `xmin,ymin,xmax,ymax`
    pub fn parse(text: &str) -> Result<Self> {
        let parts: Vec<f64> = text
            .split(',')
            .map(|p| p.trim().parse::<f64>())
            .collect::<std::result::Result<_, _>>()
            .map_err(|e| AoiscanError::InvalidRegion {
                reason: format!("bbox '{}' is not numeric: {}", text, e),
            })?;

        match parts.as_slice() {
            [xmin, ymin, xmax, ymax] => Self::new(*xmin, *ymin, *xmax, *ymax).validated(),
            _ => Err(AoiscanError::InvalidRegion {
                reason: format!("bbox needs 4 values (xmin,ymin,xmax,ymax), got {}", parts.len()),
            }),
        }
    }

    /// Reject non-finite or inverted envelopes
    pub fn validated(self) -> Result<Self> {
        let finite = [self.xmin, self.ymin, self.xmax, self.ymax].iter().all(|v| v.is_finite());
        if !finite {
            return Err(AoiscanError::InvalidRegion {
                reason: "bbox values must be finite".to_string(),
            });
        }
        if self.xmin > self.xmax || self.ymin > self.ymax {
            return Err(AoiscanError::InvalidRegion {
                reason: format!(
                    "bbox min exceeds max ({},{} > {},{})",
                    self.xmin, self.ymin, self.xmax, self.ymax
                ),
            });
        }
        Ok(self)
    }

    pub fn width(&self) -> f64 {
        self.xmax - self.xmin
    }

    pub fn height(&self) -> f64 {
        self.ymax - self.ymin
    }

    pub fn center(&self) -> [f64; 2] {
        [(self.xmin + self.xmax) / 2.0, (self.ymin + self.ymax) / 2.0]
    }

    /// Closed polygon ring covering the envelope
    pub fn to_polygon(&self) -> Geometry {
        Geometry::polygon(vec![vec![
            [self.xmin, self.ymin],
            [self.xmax, self.ymin],
            [self.xmax, self.ymax],
            [self.xmin, self.ymax],
            [self.xmin, self.ymin],
        ]])
    }
}

/// Map viewport: centre, zoom level and pixel size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapView {
    pub center_lon: f64,
    pub center_lat: f64,
    pub zoom: f64,
    pub width_px: u32,
    pub height_px: u32,
}

impl MapView {
    pub fn new(center_lon: f64, center_lat: f64, zoom: f64, width_px: u32, height_px: u32) -> Self {
        Self { center_lon, center_lat, zoom, width_px, height_px }
    }

    /// Build a view from a widget extent triple `[lon, lat, zoom]`
    pub fn from_extent(extent: [f64; 3], viewport: Viewport) -> Self {
        Self::new(extent[0], extent[1], extent[2], viewport.width, viewport.height)
    }
}

/// Viewport size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { width: 1024, height: 768 }
    }
}

impl Viewport {
    /// Parse `WIDTHxHEIGHT`, e.g. `1024x768`
    pub fn parse(text: &str) -> Result<Self> {
        let invalid = || AoiscanError::ConfigInvalid {
            key: "viewport".to_string(),
            reason: format!("expected WIDTHxHEIGHT, got '{}'", text),
        };

        let (w, h) = text.trim().split_once(['x', 'X']).ok_or_else(invalid)?;
        let width: u32 = w.trim().parse().map_err(|_| invalid())?;
        let height: u32 = h.trim().parse().map_err(|_| invalid())?;
        if width == 0 || height == 0 {
            return Err(invalid());
        }
        Ok(Self { width, height })
    }
}

/// Spatial relationship requested from a feature service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SpatialRelationship {
    #[default]
    Intersects,
}

/// Area of interest as requested by the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Region {
    /// A sketched or supplied geometry
    Geometry { geometry: Geometry },
    /// A bounding box
    Envelope { envelope: Envelope },
    /// Whatever the map currently shows
    CurrentView,
}

impl Region {
    pub fn geometry(geometry: Geometry) -> Self {
        Region::Geometry { geometry }
    }

    pub fn envelope(envelope: Envelope) -> Self {
        Region::Envelope { envelope }
    }
}

/// Concrete area sent to a feature service once the region is resolved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SearchArea {
    Envelope(Envelope),
    Geometry(Geometry),
}

impl SearchArea {
    pub fn bounding_envelope(&self) -> Option<Envelope> {
        match self {
            SearchArea::Envelope(env) => Some(*env),
            SearchArea::Geometry(geom) => geom.envelope(),
        }
    }
}
