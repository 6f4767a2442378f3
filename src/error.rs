/// Error type for nearby-tiles-rs operations.
#[derive(Debug, PartialEq)]
pub enum TileError {
    /// The zoom level is outside the range accepted by the operation.
    InvalidZoom(u8),
    /// The search radius is not a positive, finite number of meters.
    InvalidRadius(f64),
    /// A required input column (latitude, longitude, id or geometry) is absent.
    MissingColumn(String),
    /// Batch inputs that must be aligned have different lengths.
    ShapeMismatch { expected: usize, found: usize },
    /// A polygon without any boundary vertices was supplied.
    EmptyGeometry,
    /// File I/O or serialization error.
    IoError(String),
    /// CSV parsing or reading error.
    CsvError(String),
    /// Failed to parse geometry from string (GeoJSON or WKT).
    GeometryParseError(String),
}

impl std::fmt::Display for TileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TileError::InvalidZoom(z) => write!(f, "Invalid zoom level: {}", z),
            TileError::InvalidRadius(r) => write!(f, "Invalid radius: {}", r),
            TileError::MissingColumn(name) => write!(f, "Missing column: {}", name),
            TileError::ShapeMismatch { expected, found } => write!(
                f,
                "Shape mismatch: expected {} values, found {}",
                expected, found
            ),
            TileError::EmptyGeometry => write!(f, "Geometry has no coordinates"),
            TileError::IoError(msg) => write!(f, "IO error: {}", msg),
            TileError::CsvError(msg) => write!(f, "CSV error: {}", msg),
            TileError::GeometryParseError(msg) => write!(f, "Geometry parse error: {}", msg),
        }
    }
}

impl std::error::Error for TileError {}
