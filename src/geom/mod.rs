mod parse;
mod size;
mod tile_box;

pub use parse::{parse_geojson, parse_geometry, parse_point, parse_polygon, parse_wkt};
pub(crate) use size::in_grid_neighbour;
pub use size::{TileSize, tile_size_meters};
pub use tile_box::{create_tile_polygon, tile_box_corners};
