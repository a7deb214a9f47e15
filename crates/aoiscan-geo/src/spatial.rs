use crate::models::{envelope_to_rect, search_area_to_geo, to_geo_geometry, Geometry, SearchArea};
use geo::algorithm::bounding_rect::BoundingRect;
use geo::algorithm::intersects::Intersects;
use geo::Rect;

/// Check if a geometry intersects a search area
pub fn intersects(geometry: &Geometry, area: &SearchArea) -> bool {
    let geo_geom = to_geo_geometry(geometry);

    // Cheap rejection on bounding boxes before the exact test
    if let (Some(geom_bbox), Some(area_env)) = (geo_geom.bounding_rect(), area.bounding_envelope()) {
        if !bounding_boxes_intersect(&geom_bbox, &envelope_to_rect(&area_env)) {
            return false;
        }
    }

    match area {
        SearchArea::Envelope(envelope) => geo_geom.intersects(&envelope_to_rect(envelope)),
        SearchArea::Geometry(_) => geo_geom.intersects(&search_area_to_geo(area)),
    }
}

/// Whether a feature passes an optional area filter
///
/// Without an area every feature matches. With one, features lacking a
/// geometry never match.
pub fn matches_area(geometry: Option<&Geometry>, area: Option<&SearchArea>) -> bool {
    match (area, geometry) {
        (None, _) => true,
        (Some(_), None) => false,
        (Some(area), Some(geometry)) => intersects(geometry, area),
    }
}

/// Check if two bounding boxes intersect
fn bounding_boxes_intersect(bbox1: &Rect, bbox2: &Rect) -> bool {
    // Two rectangles intersect if they overlap in both x and y dimensions
    let x_overlap = bbox1.min().x <= bbox2.max().x && bbox1.max().x >= bbox2.min().x;
    let y_overlap = bbox1.min().y <= bbox2.max().y && bbox1.max().y >= bbox2.min().y;

    x_overlap && y_overlap
}
