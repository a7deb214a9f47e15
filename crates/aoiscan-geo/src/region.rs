//! Resolution of a requested region into the area sent to services

use crate::models::{MapView, Region, SearchArea};
use crate::projection::view_envelope;
use crate::validation::ensure_valid_region;
use aoiscan_core::error::Result;

/// Resolve the area of interest for a run
///
/// `CurrentView` becomes the envelope of `view`, or no area when there is no
/// view. Geometries and envelopes are validated and passed through.
pub fn resolve_region(region: Option<&Region>, view: Option<&MapView>) -> Result<Option<SearchArea>> {
    let area = match region {
        None => None,
        Some(Region::Geometry { geometry }) => {
            ensure_valid_region(geometry)?;
            Some(SearchArea::Geometry(geometry.clone()))
        }
        Some(Region::Envelope { envelope }) => Some(SearchArea::Envelope(envelope.validated()?)),
        Some(Region::CurrentView) => view.map(|v| SearchArea::Envelope(view_envelope(v))),
    };

    if let Some(area) = &area {
        tracing::debug!(bbox = ?area.bounding_envelope(), "Resolved area of interest");
    }

    Ok(area)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Envelope, Geometry};
    use aoiscan_core::error::AoiscanError;

    #[test]
    fn test_no_region() {
        assert_eq!(resolve_region(None, None).unwrap(), None);
        let view = MapView::new(0.0, 0.0, 3.0, 800, 600);
        assert_eq!(resolve_region(None, Some(&view)).unwrap(), None);
    }

    #[test]
    fn test_current_view_without_view() {
        assert_eq!(resolve_region(Some(&Region::CurrentView), None).unwrap(), None);
    }

    #[test]
    fn test_current_view_with_view() {
        let view = MapView::new(10.0, 20.0, 8.0, 800, 600);
        let area = resolve_region(Some(&Region::CurrentView), Some(&view)).unwrap();
        match area {
            Some(SearchArea::Envelope(env)) => {
                assert!(env.xmin < 10.0 && env.xmax > 10.0);
                assert!(env.ymin < 20.0 && env.ymax > 20.0);
            }
            other => panic!("Expected envelope, got {:?}", other),
        }
    }

    #[test]
    fn test_geometry_passes_through() {
        let point = Geometry::point(-98.0, 39.5);
        let area = resolve_region(Some(&Region::geometry(point.clone())), None).unwrap();
        assert_eq!(area, Some(SearchArea::Geometry(point)));
    }

    #[test]
    fn test_invalid_inputs() {
        let bad_point = Region::geometry(Geometry::point(0.0, 95.0));
        assert!(matches!(
            resolve_region(Some(&bad_point), None),
            Err(AoiscanError::InvalidRegion { .. })
        ));

        let inverted = Region::envelope(Envelope::new(5.0, 5.0, 0.0, 0.0));
        assert!(resolve_region(Some(&inverted), None).is_err());
    }
}
