//! # nearby-tiles-rs
//!
//! Web-Mercator slippy-map tiling and radius search over tiles.
//!
//! There are currently four main entry points.
//!
//! ### 1. `Tile` - Single Tile Operations
//!
//! ```
//! use nearby_tiles_rs::Tile;
//!
//! // (lon, lat) of central London
//! let tile = Tile::from_wgs84(&(-0.1276, 51.5072), 10);
//! assert_eq!((tile.x, tile.y), (511, 340));
//!
//! let polygon = tile.to_polygon();
//! println!("{} has {} outline vertices", tile, polygon.exterior().coords().count());
//! ```
//!
//! ### 2. `nearby_tiles` - Radius Search
//!
//! Every tile whose center is within the radius of a point's own tile center:
//!
//! ```
//! use nearby_tiles_rs::{IndexedPoint, NearbySearch};
//!
//! # fn main() -> Result<(), nearby_tiles_rs::TileError> {
//! let points = vec![
//!     IndexedPoint::new(0, 51.5237, -0.1183),
//!     IndexedPoint::new(1, 51.5018, -0.0537),
//! ];
//!
//! let rows = NearbySearch::new(17, 250.0)?.run(&points);
//! for row in rows.iter().filter(|r| r.coord_id == 1) {
//!     println!("{}", row.tile(17));
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ### 3. `TileGrid` - Tiles Inside a Polygon
//!
//! ```
//! use nearby_tiles_rs::{GeoWithin, TileGrid};
//! use geo_types::polygon;
//!
//! # fn main() -> Result<(), nearby_tiles_rs::TileError> {
//! let area = polygon![
//!     (x: -0.20, y: 51.45),
//!     (x: -0.05, y: 51.45),
//!     (x: -0.05, y: 51.55),
//!     (x: -0.20, y: 51.45),
//! ];
//! let inside = TileGrid::covering_polygon(&area, 14)?.within(&area, &GeoWithin);
//! assert!(!inside.is_empty());
//! # Ok(())
//! # }
//! ```
//!
//! ### 4. `CsvToNearbyTiles` - CSV File Conversion
//!
//! ```no_run
//! use nearby_tiles_rs::{CsvNearbyConfig, CsvPointConfig, CsvToNearbyTiles, GeometryFormat};
//!
//! let config = CsvNearbyConfig::new(CsvPointConfig::from_geometry("geometry"), 17, 500.0)
//!     .with_tile_geometry(GeometryFormat::GeoJson);
//!
//! // Using trait method
//! "pubs.csv".to_nearby_tiles_csv("pubs_nearby.csv", &config).unwrap();
//! ```
//!

pub mod coord;
pub mod error;
pub mod geom;
pub mod grid;
pub mod index;
pub mod io;
pub mod membership;
pub mod search;
pub mod tile;

pub use coord::Coordinate;
pub use error::TileError;
pub use geom::{
    TileSize, create_tile_polygon, parse_geojson, parse_geometry, parse_point, parse_polygon,
    parse_wkt, tile_box_corners, tile_size_meters,
};
pub use grid::{TileGrid, TileGridBuilder};
pub use index::{
    CENTER_OFFSET, DEFAULT_CHUNK_SIZE, EARTH_RADIUS_METERS, LARGE_BATCH_WARNING, MAX_LATITUDE,
    MAX_LONGITUDE, MAX_SEARCH_ZOOM, MAX_ZOOM_LEVEL, MIN_SEARCH_ZOOM, deg_to_tile, deg_to_tiles,
    haversine_batch, haversine_meters, tile_center, tile_to_deg, tiles_to_deg, zoom_scale,
};
pub use io::{
    CoordinateSource, CsvNearbyConfig, CsvPointConfig, CsvToNearbyTiles, GeometryFormat,
    TilesToArrow, TilesToGeoParquet, nearby_tiles_csv, nearby_to_record_batch,
    points_from_record_batch, read_points_csv, write_geoparquet, write_nearby_csv,
    write_nearby_geoparquet,
};
pub use membership::{GeoWithin, PointInPolygon};
pub use search::{
    IndexedPoint, NearbySearch, NearbyTile, OffsetTemplate, Quadrant, TileOffset, mirror,
    nearby_tiles, step_count,
};
pub use tile::Tile;

pub use geo_types;
pub use geoarrow_array;
pub use geoarrow_schema;
pub use geoparquet;
