use crate::index::{tile_point, zoom_scale};
use geo_types::{Coord, LineString, Polygon};

/// Returns the closed outline of a tile as `(lat, lon)` pairs.
///
/// Corners are ordered NW, SW, SE, NE and the first corner is repeated at the
/// end, ready to be drawn as a polyline.
pub fn tile_box_corners(x: i64, y: i64, zoom: u8) -> [(f64, f64); 5] {
    let n = zoom_scale(zoom);
    let nw = tile_point(x, y, n, 0.0, 0.0);
    let sw = tile_point(x, y, n, 0.0, 1.0);
    let se = tile_point(x, y, n, 1.0, 1.0);
    let ne = tile_point(x, y, n, 1.0, 0.0);
    [nw, sw, se, ne, nw]
}

/// Builds the tile outline as a `geo_types::Polygon` with x = lon, y = lat.
pub fn create_tile_polygon(x: i64, y: i64, zoom: u8) -> Polygon<f64> {
    let coords: Vec<Coord<f64>> = tile_box_corners(x, y, zoom)
        .iter()
        .map(|&(lat, lon)| Coord { x: lon, y: lat })
        .collect();

    Polygon::new(LineString::from(coords), vec![])
}
