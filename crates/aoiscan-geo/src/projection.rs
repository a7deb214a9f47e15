//! Web Mercator projection and map view extents

use crate::models::{Envelope, MapView};
use std::f64::consts::PI;

/// WGS 84 semi-major axis in meters
const EARTH_RADIUS: f64 = 6_378_137.0;

/// Ground resolution at zoom 0 for 256 pixel tiles, in meters per pixel
const ZOOM_ZERO_RESOLUTION: f64 = 156_543.033_928_040_97;

/// Latitude limit of the Web Mercator square
pub const MAX_LATITUDE: f64 = 85.051_128_779_806_59;

/// Half the width of the Web Mercator square in meters
const HALF_WORLD: f64 = PI * EARTH_RADIUS;

/// Project WGS 84 degrees to Web Mercator meters
pub fn lonlat_to_web_mercator(lon: f64, lat: f64) -> (f64, f64) {
    let lat = lat.clamp(-MAX_LATITUDE, MAX_LATITUDE);
    let x = lon.to_radians() * EARTH_RADIUS;
    let y = (PI / 4.0 + lat.to_radians() / 2.0).tan().ln() * EARTH_RADIUS;
    (x, y)
}

/// Unproject Web Mercator meters to WGS 84 degrees
pub fn web_mercator_to_lonlat(x: f64, y: f64) -> (f64, f64) {
    let lon = (x / EARTH_RADIUS).to_degrees();
    let lat = (2.0 * (y / EARTH_RADIUS).exp().atan() - PI / 2.0).to_degrees();
    (lon, lat)
}

/// Meters per pixel at a zoom level
pub fn resolution(zoom: f64) -> f64 {
    ZOOM_ZERO_RESOLUTION / 2f64.powf(zoom)
}

/// Envelope in WGS 84 degrees visible in a map view
///
/// The result is clamped to the valid longitude range and to the Web Mercator
/// latitude limit.
pub fn view_envelope(view: &MapView) -> Envelope {
    let (cx, cy) = lonlat_to_web_mercator(view.center_lon, view.center_lat);
    let res = resolution(view.zoom);
    let half_w = f64::from(view.width_px) * res / 2.0;
    let half_h = f64::from(view.height_px) * res / 2.0;

    let xmin = (cx - half_w).max(-HALF_WORLD);
    let xmax = (cx + half_w).min(HALF_WORLD);
    let ymin = (cy - half_h).max(-HALF_WORLD);
    let ymax = (cy + half_h).min(HALF_WORLD);

    let (west, south) = web_mercator_to_lonlat(xmin, ymin);
    let (east, north) = web_mercator_to_lonlat(xmax, ymax);

    Envelope::new(west, south, east, north)
}
