//! Spherical Web-Mercator projection into the unit square.
//!
//! Longitude maps to `x` in `[0, 1]` west to east and latitude maps to `y` in
//! `[0, 1]` north to south, matching slippy-map tile coordinates at zoom 0.
//! At zoom `z` one unit spans `extent * 2^z` pixels.

use geo::Point;
use std::f64::consts::PI;

/// Projected coordinate, `[x, y]` in the unit square.
pub type Projected = [f64; 2];

/// Latitude at which the square's top and bottom edges sit.
pub const MAX_LATITUDE: f64 = 85.051_128_779_806_59;

pub fn lng_x(lng: f64) -> f64 {
    lng / 360.0 + 0.5
}

/// Latitudes beyond [`MAX_LATITUDE`] clamp to the square's edge.
pub fn lat_y(lat: f64) -> f64 {
    let sin = (lat * PI / 180.0).sin();
    let y = 0.5 - 0.25 * ((1.0 + sin) / (1.0 - sin)).ln() / PI;
    y.clamp(0.0, 1.0)
}

pub fn x_lng(x: f64) -> f64 {
    (x - 0.5) * 360.0
}

pub fn y_lat(y: f64) -> f64 {
    let y2 = (180.0 - y * 360.0) * PI / 180.0;
    360.0 * y2.exp().atan() / PI - 90.0
}

pub fn project(point: &Point) -> Projected {
    [lng_x(point.x()), lat_y(point.y())]
}

pub fn unproject(projected: Projected) -> Point {
    Point::new(x_lng(projected[0]), y_lat(projected[1]))
}

/// Size of one pixel at `zoom` in unit-square coordinates.
pub fn pixel_size(extent: f64, zoom: u8) -> f64 {
    1.0 / (extent * 2f64.powi(i32::from(zoom)))
}
