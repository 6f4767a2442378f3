pub mod constants;
mod tiling;

pub use constants::{
    CENTER_OFFSET, DEFAULT_CHUNK_SIZE, EARTH_RADIUS_METERS, LARGE_BATCH_WARNING, MAX_LATITUDE,
    MAX_LONGITUDE, MAX_SEARCH_ZOOM, MAX_ZOOM_LEVEL, MIN_SEARCH_ZOOM,
};
pub(crate) use tiling::{check_shape, tile_point, unproject};
pub use tiling::{
    deg_to_tile, deg_to_tiles, haversine_batch, haversine_meters, tile_center, tile_to_deg,
    tiles_to_deg, zoom_scale,
};
