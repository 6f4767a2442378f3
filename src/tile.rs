use crate::coord::Coordinate;
use crate::error::TileError;
use crate::geom::{TileSize, create_tile_polygon, tile_box_corners, tile_size_meters};
use crate::grid::TileGrid;
use crate::index::{MAX_ZOOM_LEVEL, deg_to_tile, tile_center, zoom_scale};
use crate::io::arrow::TilesToArrow;
use crate::io::parquet::TilesToGeoParquet;
use crate::membership::GeoWithin;
use arrow_array::RecordBatch;
use geo_types::{Geometry, Point, Polygon};
use serde::Serialize;
use std::collections::HashSet;
use std::path::Path;

/// A single slippy-map tile.
///
/// Indices run from `0` to `2^zoom - 1` on both axes, with `(0, 0)` in the
/// north-west corner. An index only means something together with its zoom.
///
/// # Example
///
/// ```
/// use nearby_tiles_rs::Tile;
///
/// // (lon, lat) of central London
/// let tile = Tile::from_wgs84(&(-0.1, 51.5), 19);
/// println!("{} centered at {:?}", tile, tile.center());
///
/// // Outline for drawing on a map
/// let polygon = tile.to_polygon();
/// assert_eq!(polygon.exterior().coords().count(), 5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Tile {
    /// Column index, growing eastwards
    pub x: u32,
    /// Row index, growing southwards
    pub y: u32,
    /// Zoom level (0-22)
    pub zoom: u8,
}

impl Tile {
    pub(crate) fn new(x: u32, y: u32, zoom: u8) -> Self {
        Self { x, y, zoom }
    }

    /// Creates a tile from raw indices, saturating zoom and indices onto the grid.
    pub fn from_index(x: i64, y: i64, zoom: u8) -> Self {
        let zoom = zoom.min(MAX_ZOOM_LEVEL);
        let last = zoom_scale(zoom) as i64 - 1;
        Self::new(x.clamp(0, last) as u32, y.clamp(0, last) as u32, zoom)
    }

    /// Creates the tile containing a WGS84 `(lon, lat)` coordinate.
    ///
    /// # Example
    /// ```
    /// use nearby_tiles_rs::Tile;
    /// use geo_types::Point;
    ///
    /// let from_tuple = Tile::from_wgs84(&(-2.248, 53.481), 12);
    /// let from_point = Tile::from_wgs84(&Point::new(-2.248, 53.481), 12);
    /// assert_eq!(from_tuple, from_point);
    /// ```
    pub fn from_wgs84(coord: &impl Coordinate, zoom: u8) -> Self {
        Self::from_lat_lon(coord.lat(), coord.lon(), zoom)
    }

    pub fn from_lat_lon(lat: f64, lon: f64, zoom: u8) -> Self {
        let zoom = zoom.min(MAX_ZOOM_LEVEL);
        let (x, y) = deg_to_tile(lat, lon, zoom);
        Self::new(x, y, zoom)
    }

    /// Creates tiles from an arbitrary lon/lat `geo_types::Geometry`.
    ///
    /// Points map to their containing tile. Polygons map to every tile whose
    /// center lies inside them. Collections are flattened and repeated tiles
    /// dropped.
    pub fn from_geometry(geom: Geometry<f64>, zoom: u8) -> Result<Vec<Self>, TileError> {
        let mut seen = HashSet::new();
        let mut tiles = Vec::new();
        collect_geometry_tiles(geom, zoom, &mut seen, &mut tiles)?;
        Ok(tiles)
    }

    fn x_index(&self) -> i64 {
        i64::from(self.x)
    }

    fn y_index(&self) -> i64 {
        i64::from(self.y)
    }

    /// Returns the tile center as a `Point` with x = lon, y = lat.
    pub fn center(&self) -> Point<f64> {
        let (lat, lon) = self.center_lat_lon();
        Point::new(lon, lat)
    }

    pub fn center_lat_lon(&self) -> (f64, f64) {
        tile_center(self.x_index(), self.y_index(), self.zoom)
    }

    /// Closed NW, SW, SE, NE outline as `(lat, lon)` pairs.
    pub fn box_corners(&self) -> [(f64, f64); 5] {
        tile_box_corners(self.x_index(), self.y_index(), self.zoom)
    }

    /// Converts this tile to its square (in Mercator) outline polygon.
    pub fn to_polygon(&self) -> Polygon<f64> {
        create_tile_polygon(self.x_index(), self.y_index(), self.zoom)
    }

    /// Physical size of this tile on the ground.
    pub fn size_meters(&self) -> TileSize {
        tile_size_meters(Some(self.center()), self.zoom)
    }

    /// Converts this tile to an Arrow RecordBatch with all attributes.
    pub fn to_record_batch(&self) -> Result<RecordBatch, TileError> {
        std::slice::from_ref(self).to_record_batch()
    }

    /// Writes this tile to a GeoParquet file.
    pub fn to_geoparquet(&self, path: impl AsRef<Path>) -> Result<(), TileError> {
        std::slice::from_ref(self).to_geoparquet(path)
    }
}

impl std::fmt::Display for Tile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.zoom, self.x, self.y)
    }
}

fn collect_geometry_tiles(
    geom: Geometry<f64>,
    zoom: u8,
    seen: &mut HashSet<Tile>,
    tiles: &mut Vec<Tile>,
) -> Result<(), TileError> {
    match geom {
        Geometry::Point(pt) => push_unique(Tile::from_wgs84(&pt, zoom), seen, tiles),
        Geometry::MultiPoint(mp) => {
            for pt in mp.0 {
                push_unique(Tile::from_wgs84(&pt, zoom), seen, tiles);
            }
        }
        Geometry::Polygon(poly) => collect_polygon_tiles(&poly, zoom, seen, tiles)?,
        Geometry::MultiPolygon(mp) => {
            for poly in mp.0 {
                collect_polygon_tiles(&poly, zoom, seen, tiles)?;
            }
        }
        Geometry::Rect(rect) => collect_polygon_tiles(&rect.to_polygon(), zoom, seen, tiles)?,
        Geometry::GeometryCollection(gc) => {
            for g in gc.0 {
                collect_geometry_tiles(g, zoom, seen, tiles)?;
            }
        }
        _ => {
            return Err(TileError::GeometryParseError(
                "Unsupported geometry type".to_string(),
            ));
        }
    }
    Ok(())
}

fn collect_polygon_tiles(
    poly: &Polygon<f64>,
    zoom: u8,
    seen: &mut HashSet<Tile>,
    tiles: &mut Vec<Tile>,
) -> Result<(), TileError> {
    let grid = TileGrid::covering_polygon(poly, zoom)?;
    for tile in grid.within(poly, &GeoWithin) {
        push_unique(tile, seen, tiles);
    }
    Ok(())
}

fn push_unique(tile: Tile, seen: &mut HashSet<Tile>, tiles: &mut Vec<Tile>) {
    if seen.insert(tile) {
        tiles.push(tile);
    }
}
