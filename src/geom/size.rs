use crate::coord::Coordinate;
use crate::index::{deg_to_tile, haversine_meters, tile_center, zoom_scale};
use geo_types::Point;
use serde::Serialize;

/// Physical size of one tile, measured between neighbouring tile centers.
///
/// Tiles shrink on the ground away from the equator, so the numbers only hold
/// near the latitude they were measured at.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TileSize {
    pub zoom: u8,
    pub x_tile_distance_meters: f64,
    pub y_tile_distance_meters: f64,
    pub diagonal_tile_distance_meters: f64,
}

/// Measures the tile containing `at`, or the tile at the middle of the grid when `None`.
///
/// Distances run from the tile's center to the centers of its east, south and
/// south-east neighbours (west/north on the last column/row).
///
/// # Example
/// ```
/// use nearby_tiles_rs::tile_size_meters;
/// use geo_types::Point;
///
/// let equator = tile_size_meters(None, 16);
/// let london = tile_size_meters(Some(Point::new(-0.1, 51.5)), 16);
/// assert!(london.x_tile_distance_meters < equator.x_tile_distance_meters);
/// ```
pub fn tile_size_meters(at: Option<Point<f64>>, zoom: u8) -> TileSize {
    let (x, y) = match at {
        Some(point) => {
            let (x, y) = deg_to_tile(point.y(), point.x(), zoom);
            (i64::from(x), i64::from(y))
        }
        None => {
            let half = (zoom_scale(zoom) / 2.0).floor() as i64;
            (half, half)
        }
    };

    let n = zoom_scale(zoom);
    let (x_next, y_next) = (in_grid_neighbour(x, n), in_grid_neighbour(y, n));

    let (lat, lon) = tile_center(x, y, zoom);
    let distance_to = |tx: i64, ty: i64| {
        let (other_lat, other_lon) = tile_center(tx, ty, zoom);
        haversine_meters(lat, lon, other_lat, other_lon)
    };

    TileSize {
        zoom,
        x_tile_distance_meters: distance_to(x_next, y),
        y_tile_distance_meters: distance_to(x, y_next),
        diagonal_tile_distance_meters: distance_to(x_next, y_next),
    }
}

/// The following index along one axis, or the preceding one on the last row/column.
pub(crate) fn in_grid_neighbour(index: i64, n: f64) -> i64 {
    if (index + 1) as f64 >= n {
        index - 1
    } else {
        index + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_size_shrinks_with_latitude() {
        let equator = tile_size_meters(Some(Point::new(0.0, 0.5)), 15);
        let north = tile_size_meters(Some(Point::new(0.0, 60.0)), 15);

        assert!(north.x_tile_distance_meters < equator.x_tile_distance_meters);
        assert!(north.y_tile_distance_meters < equator.y_tile_distance_meters);
        // Roughly cos(60) of the equatorial width
        let ratio = north.x_tile_distance_meters / equator.x_tile_distance_meters;
        assert!((ratio - 0.5).abs() < 0.01);
    }

    #[test]
    fn test_tile_size_default_is_equatorial() {
        let size = tile_size_meters(None, 10);
        assert_eq!(size.zoom, 10);
        // 40 075 km / 1024 tiles
        assert!((size.x_tile_distance_meters - 39_092.0).abs() < 50.0);
        assert!(size.diagonal_tile_distance_meters > size.x_tile_distance_meters);
        assert!(size.diagonal_tile_distance_meters > size.y_tile_distance_meters);
    }

    #[test]
    fn test_tile_size_on_last_column_is_positive() {
        let size = tile_size_meters(Some(Point::new(179.99, -85.0)), 4);
        assert!(size.x_tile_distance_meters > 0.0);
        assert!(size.y_tile_distance_meters > 0.0);
    }

    #[test]
    fn test_tile_size_serializes_camel_case() -> Result<(), serde_json::Error> {
        let json = serde_json::to_string(&tile_size_meters(None, 3))?;
        assert!(json.contains("\"xTileDistanceMeters\""));
        assert!(json.contains("\"diagonalTileDistanceMeters\""));
        Ok(())
    }
}
