/// Maximum zoom level honoured by the tiling math; larger values are clamped.
pub const MAX_ZOOM_LEVEL: u8 = 22;

/// Latitude clip (degrees) applied before projecting, just inside the Mercator limit.
pub const MAX_LATITUDE: f64 = 85.05;

/// Longitude clip (degrees) applied before projecting.
pub const MAX_LONGITUDE: f64 = 179.999;

/// Mean Earth radius used by the haversine formula.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Smallest zoom accepted by the nearby-tile search.
pub const MIN_SEARCH_ZOOM: u8 = 1;

/// Largest zoom accepted by the nearby-tile search.
pub const MAX_SEARCH_ZOOM: u8 = 23;

/// Point count above which the nearby-tile search logs a warning.
pub const LARGE_BATCH_WARNING: usize = 30_000;

/// Offset inside a tile that selects its center.
pub const CENTER_OFFSET: f64 = 0.5;

/// Points handed to one parallel work item in the nearby-tile search.
pub const DEFAULT_CHUNK_SIZE: usize = 1024;

/// Keeps the step estimate finite when two tile centers coincide.
pub(crate) const STEP_EPSILON: f64 = 1e-4;
