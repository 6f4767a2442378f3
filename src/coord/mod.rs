use geo_types::{Coord, Point};

/// Trait for types that can provide WGS84 longitude/latitude in degrees.
///
/// Implemented for `(f64, f64)` tuples, read as `(lon, lat)` like
/// `geo_types` coordinates, and for `geo_types::Point<f64>` and `Coord<f64>`
/// (x = lon).
/// This allows functions to accept any of them.
pub trait Coordinate {
    /// Returns the longitude in degrees.
    fn lon(&self) -> f64;
    /// Returns the latitude in degrees.
    fn lat(&self) -> f64;
}

impl Coordinate for (f64, f64) {
    fn lon(&self) -> f64 {
        self.0
    }
    fn lat(&self) -> f64 {
        self.1
    }
}

impl Coordinate for Point<f64> {
    fn lon(&self) -> f64 {
        self.x()
    }
    fn lat(&self) -> f64 {
        self.y()
    }
}

impl Coordinate for Coord<f64> {
    fn lon(&self) -> f64 {
        self.x
    }
    fn lat(&self) -> f64 {
        self.y
    }
}
