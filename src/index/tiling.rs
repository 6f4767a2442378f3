use crate::error::TileError;
use crate::index::constants::{
    CENTER_OFFSET, EARTH_RADIUS_METERS, MAX_LATITUDE, MAX_LONGITUDE, MAX_ZOOM_LEVEL,
};
use rayon::prelude::*;
use std::f64::consts::{FRAC_PI_4, PI};

/// Returns the number of tiles per axis, `2^zoom`, with zoom clamped to `[0, 22]`.
///
/// Clamping is silent: `zoom_scale(30) == zoom_scale(22)`.
pub fn zoom_scale(zoom: u8) -> f64 {
    2.0_f64.powi(i32::from(zoom.min(MAX_ZOOM_LEVEL)))
}

/// Converts a WGS84 position to the index of the slippy-map tile containing it.
///
/// Latitude is clamped to `±85.05` and longitude to `±179.999` before
/// projecting, so out-of-range input lands on an edge tile instead of failing.
/// Tile `(0, 0)` is the north-west corner of the world.
///
/// # Example
/// ```
/// use nearby_tiles_rs::deg_to_tile;
///
/// let (x, y) = deg_to_tile(51.5, -0.1, 19);
/// assert_eq!((x, y), deg_to_tile(51.5, -0.1, 19));
/// ```
pub fn deg_to_tile(lat: f64, lon: f64, zoom: u8) -> (u32, u32) {
    project(lat, lon, zoom_scale(zoom))
}

/// Batch form of [`deg_to_tile`].
///
/// Fails with [`TileError::ShapeMismatch`] when the slices differ in length.
pub fn deg_to_tiles(lats: &[f64], lons: &[f64], zoom: u8) -> Result<Vec<(u32, u32)>, TileError> {
    check_shape(lats.len(), lons.len())?;
    let n = zoom_scale(zoom);
    Ok(lats
        .par_iter()
        .zip(lons.par_iter())
        .map(|(&lat, &lon)| project(lat, lon, n))
        .collect())
}

/// Converts a tile index back to a `(lat, lon)` position inside that tile.
///
/// `offset` picks the point inside the tile: `0.0` is the north-west corner,
/// `0.5` the center and `1.0` the south-east corner; it is clamped to `[0, 1]`.
/// Indices outside `[0, 2^zoom - 1]` saturate to the nearest valid tile.
pub fn tile_to_deg(x: i64, y: i64, zoom: u8, offset: f64) -> (f64, f64) {
    let offset = offset.clamp(0.0, 1.0);
    tile_point(x, y, zoom_scale(zoom), offset, offset)
}

/// Batch form of [`tile_to_deg`].
pub fn tiles_to_deg(
    xs: &[i64],
    ys: &[i64],
    zoom: u8,
    offset: f64,
) -> Result<Vec<(f64, f64)>, TileError> {
    check_shape(xs.len(), ys.len())?;
    let n = zoom_scale(zoom);
    let offset = offset.clamp(0.0, 1.0);
    Ok(xs
        .par_iter()
        .zip(ys.par_iter())
        .map(|(&x, &y)| tile_point(x, y, n, offset, offset))
        .collect())
}

/// Returns the `(lat, lon)` center of a tile.
pub fn tile_center(x: i64, y: i64, zoom: u8) -> (f64, f64) {
    tile_to_deg(x, y, zoom, CENTER_OFFSET)
}

/// Great-circle distance in meters between two WGS84 positions, rounded to 0.1 m.
///
/// Uses a spherical Earth of radius 6 371 000 m. The result is symmetric in
/// its two endpoints.
pub fn haversine_meters(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let sin_lat = ((lat2_rad - lat1_rad) / 2.0).sin();
    let sin_lon = ((lon2.to_radians() - lon1.to_radians()) / 2.0).sin();

    let a = sin_lat * sin_lat + lat2_rad.cos() * lat1_rad.cos() * sin_lon * sin_lon;
    let central_angle = 2.0 * a.sqrt().min(1.0).asin();

    (central_angle * EARTH_RADIUS_METERS * 10.0).round() / 10.0
}

/// Batch form of [`haversine_meters`]; all four slices must have the same length.
pub fn haversine_batch(
    lats1: &[f64],
    lons1: &[f64],
    lats2: &[f64],
    lons2: &[f64],
) -> Result<Vec<f64>, TileError> {
    let expected = lats1.len();
    check_shape(expected, lons1.len())?;
    check_shape(expected, lats2.len())?;
    check_shape(expected, lons2.len())?;

    Ok((0..expected)
        .into_par_iter()
        .map(|i| haversine_meters(lats1[i], lons1[i], lats2[i], lons2[i]))
        .collect())
}

pub(crate) fn check_shape(expected: usize, found: usize) -> Result<(), TileError> {
    if expected != found {
        return Err(TileError::ShapeMismatch { expected, found });
    }
    Ok(())
}

fn project(lat: f64, lon: f64, n: f64) -> (u32, u32) {
    let lat_rad = lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
    let lon_rad = lon.clamp(-MAX_LONGITUDE, MAX_LONGITUDE).to_radians();

    let x = ((lon_rad + PI) / (2.0 * PI) * n).floor();
    let y = ((PI - (lat_rad / 2.0 + FRAC_PI_4).tan().ln()) / (2.0 * PI) * n).floor();

    (x.clamp(0.0, n - 1.0) as u32, y.clamp(0.0, n - 1.0) as u32)
}

/// Position inside tile `(x, y)` after clamping the index onto the grid.
pub(crate) fn tile_point(x: i64, y: i64, n: f64, x_offset: f64, y_offset: f64) -> (f64, f64) {
    let x = (x as f64).clamp(0.0, n - 1.0);
    let y = (y as f64).clamp(0.0, n - 1.0);
    unproject(x + x_offset, y + y_offset, n)
}

/// Inverse Mercator for fractional tile coordinates; defined beyond the grid too.
pub(crate) fn unproject(fx: f64, fy: f64, n: f64) -> (f64, f64) {
    let lon_rad = fx * (2.0 * PI) / n - PI;
    let lat_rad = 2.0 * ((PI - fy * (2.0 * PI) / n).exp().atan() - FRAC_PI_4);
    (lat_rad.to_degrees(), lon_rad.to_degrees())
}
