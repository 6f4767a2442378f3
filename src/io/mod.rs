pub mod arrow;
pub mod csv;
pub mod parquet;

pub use arrow::{TilesToArrow, nearby_to_record_batch, points_from_record_batch};
pub use csv::{
    CoordinateSource, CsvNearbyConfig, CsvPointConfig, CsvToNearbyTiles, GeometryFormat,
    nearby_tiles_csv, read_points_csv, write_nearby_csv,
};
pub use parquet::{TilesToGeoParquet, write_geoparquet, write_nearby_geoparquet};
