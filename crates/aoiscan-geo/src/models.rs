//! Geometry models for aoiscan-geo.
//!
//! This module re-exports canonical types from `aoiscan-core` and provides
//! conversions to the `geo` crate.

use geo::Geometry as GeoGeometry;

// Re-export canonical types from aoiscan-core
pub use aoiscan_core::models::{Envelope, Geometry, MapView, Region, SearchArea};

fn to_line_string(coords: &[[f64; 2]]) -> geo::LineString {
    geo::LineString::new(coords.iter().map(|c| geo::Coord { x: c[0], y: c[1] }).collect())
}

fn to_polygon(rings: &[Vec<[f64; 2]>]) -> geo::Polygon {
    match rings.split_first() {
        Some((exterior, interiors)) => geo::Polygon::new(
            to_line_string(exterior),
            interiors.iter().map(|ring| to_line_string(ring)).collect(),
        ),
        None => geo::Polygon::new(geo::LineString::new(vec![]), vec![]),
    }
}

/// Convert a canonical Geometry to a geo::Geometry
pub fn to_geo_geometry(geom: &Geometry) -> GeoGeometry {
    match geom {
        Geometry::Point { coordinates } => {
            GeoGeometry::Point(geo::Point::new(coordinates[0], coordinates[1]))
        }
        Geometry::LineString { coordinates } => GeoGeometry::LineString(to_line_string(coordinates)),
        Geometry::Polygon { coordinates } => GeoGeometry::Polygon(to_polygon(coordinates)),
        Geometry::MultiPoint { coordinates } => {
            let points: Vec<geo::Point> =
                coordinates.iter().map(|c| geo::Point::new(c[0], c[1])).collect();
            GeoGeometry::MultiPoint(geo::MultiPoint::new(points))
        }
        Geometry::MultiLineString { coordinates } => GeoGeometry::MultiLineString(
            geo::MultiLineString::new(coordinates.iter().map(|line| to_line_string(line)).collect()),
        ),
        Geometry::MultiPolygon { coordinates } => GeoGeometry::MultiPolygon(geo::MultiPolygon::new(
            coordinates.iter().map(|poly| to_polygon(poly)).collect(),
        )),
    }
}

/// Convert an envelope to a geo rectangle
pub fn envelope_to_rect(envelope: &Envelope) -> geo::Rect {
    geo::Rect::new(
        geo::Coord { x: envelope.xmin, y: envelope.ymin },
        geo::Coord { x: envelope.xmax, y: envelope.ymax },
    )
}

/// Convert a search area to a geo::Geometry
pub fn search_area_to_geo(area: &SearchArea) -> GeoGeometry {
    match area {
        SearchArea::Envelope(envelope) => GeoGeometry::Rect(envelope_to_rect(envelope)),
        SearchArea::Geometry(geometry) => to_geo_geometry(geometry),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_conversion() {
        let geom = Geometry::point(115.0, -8.5);
        match to_geo_geometry(&geom) {
            GeoGeometry::Point(p) => {
                assert!((p.x() - 115.0).abs() < 1e-10);
                assert!((p.y() + 8.5).abs() < 1e-10);
            }
            other => panic!("Expected Point geometry, got {:?}", other),
        }
    }

    #[test]
    fn test_polygon_with_hole() {
        let geom = Geometry::polygon(vec![
            vec![[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0], [0.0, 0.0]],
            vec![[4.0, 4.0], [6.0, 4.0], [6.0, 6.0], [4.0, 6.0], [4.0, 4.0]],
        ]);
        match to_geo_geometry(&geom) {
            GeoGeometry::Polygon(p) => {
                assert_eq!(p.exterior().0.len(), 5);
                assert_eq!(p.interiors().len(), 1);
            }
            other => panic!("Expected Polygon geometry, got {:?}", other),
        }
    }

    #[test]
    fn test_envelope_to_rect() {
        let rect = envelope_to_rect(&Envelope::new(-10.0, -5.0, 10.0, 5.0));
        assert_eq!(rect.min().x, -10.0);
        assert_eq!(rect.max().y, 5.0);
    }
}
