use crate::models::Geometry;
use aoiscan_core::error::{AoiscanError, Result};

/// Validation result with details
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<ValidationError>,
}

/// Validation error with location details
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub location: String,
    pub reason: String,
}

impl ValidationResult {
    /// Create a valid result
    pub fn valid() -> Self {
        Self { is_valid: true, errors: Vec::new() }
    }

    /// Add an error to the result
    pub fn add_error(&mut self, location: String, reason: String) {
        self.is_valid = false;
        self.errors.push(ValidationError { location, reason });
    }

    fn absorb(&mut self, prefix: &str, other: ValidationResult) {
        for error in other.errors {
            self.add_error(format!("{}.{}", prefix, error.location), error.reason);
        }
    }
}

/// Validate a geometry given in WGS 84 degrees
pub fn validate_geometry(geometry: &Geometry) -> ValidationResult {
    match geometry {
        Geometry::Point { coordinates } => validate_coords("Point", std::slice::from_ref(coordinates)),
        Geometry::LineString { coordinates } => validate_linestring("LineString", coordinates),
        Geometry::Polygon { coordinates } => validate_polygon("Polygon", coordinates),
        Geometry::MultiPoint { coordinates } => {
            let mut result = validate_coords("MultiPoint", coordinates);
            if coordinates.is_empty() {
                result.add_error("MultiPoint".to_string(), "MultiPoint has no points".to_string());
            }
            result
        }
        Geometry::MultiLineString { coordinates } => {
            let mut result = ValidationResult::valid();
            for (i, line) in coordinates.iter().enumerate() {
                let location = format!("MultiLineString[{}]", i);
                result.absorb(&location, validate_linestring("LineString", line));
            }
            result
        }
        Geometry::MultiPolygon { coordinates } => {
            let mut result = ValidationResult::valid();
            for (i, polygon) in coordinates.iter().enumerate() {
                let location = format!("MultiPolygon[{}]", i);
                result.absorb(&location, validate_polygon("Polygon", polygon));
            }
            result
        }
    }
}

fn validate_coords(location: &str, coords: &[[f64; 2]]) -> ValidationResult {
    let mut result = ValidationResult::valid();
    for (i, c) in coords.iter().enumerate() {
        if !c[0].is_finite() || !c[1].is_finite() {
            result.add_error(format!("{}[{}]", location, i), "Coordinates must be finite".to_string());
        } else if !(-180.0..=180.0).contains(&c[0]) || !(-90.0..=90.0).contains(&c[1]) {
            result.add_error(
                format!("{}[{}]", location, i),
                format!("({}, {}) is outside WGS 84 bounds", c[0], c[1]),
            );
        }
    }
    result
}

fn validate_linestring(location: &str, coords: &[[f64; 2]]) -> ValidationResult {
    // LineString must have at least 2 points
    if coords.len() < 2 {
        let mut result = ValidationResult::valid();
        result.add_error(
            location.to_string(),
            format!("LineString must have at least 2 points, found {}", coords.len()),
        );
        return result;
    }
    validate_coords(location, coords)
}

fn validate_ring(location: &str, ring: &[[f64; 2]]) -> ValidationResult {
    let mut result = validate_coords(location, ring);

    if ring.len() < 4 {
        result.add_error(
            location.to_string(),
            format!("Ring must have at least 4 points, found {}", ring.len()),
        );
    }

    if let (Some(first), Some(last)) = (ring.first(), ring.last()) {
        if first != last {
            result.add_error(
                location.to_string(),
                "Ring must be closed (first point == last point)".to_string(),
            );
        }
    }

    result
}

fn validate_polygon(location: &str, rings: &[Vec<[f64; 2]>]) -> ValidationResult {
    let mut result = ValidationResult::valid();

    if rings.is_empty() {
        result.add_error(location.to_string(), "Polygon has no exterior ring".to_string());
        return result;
    }

    for (i, ring) in rings.iter().enumerate() {
        let ring_location = if i == 0 {
            format!("{} exterior", location)
        } else {
            format!("{} interior[{}]", location, i - 1)
        };
        let ring_result = validate_ring(&ring_location, ring);
        result.errors.extend(ring_result.errors);
    }
    result.is_valid = result.errors.is_empty();

    result
}

/// Reject geometries that cannot be used as an area of interest
pub fn ensure_valid_region(geometry: &Geometry) -> Result<()> {
    let validation = validate_geometry(geometry);
    if validation.is_valid {
        return Ok(());
    }

    let reason = validation
        .errors
        .iter()
        .map(|e| format!("{}: {}", e.location, e.reason))
        .collect::<Vec<_>>()
        .join("; ");
    Err(AoiscanError::InvalidRegion { reason })
}
