use crate::error::TileError;
use crate::geom::parse_point;
use crate::search::{IndexedPoint, NearbySearch, NearbyTile};
use std::fs::File;
use std::path::Path;

/// Where point locations are read from.
#[derive(Clone, Copy)]
enum SourceIndices {
    Geometry(usize),
    Coordinates { lat_idx: usize, lon_idx: usize },
}

/// Output format for tile outline geometries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryFormat {
    /// Well-Known Text format (e.g., "POLYGON((...))")
    Wkt,
    /// GeoJSON format
    GeoJson,
}

/// Specifies how to extract point locations from CSV rows.
#[derive(Debug, Clone)]
pub enum CoordinateSource {
    /// A single column containing a WKT or GeoJSON point (lon/lat)
    GeometryColumn(String),
    /// Separate latitude and longitude columns in degrees
    CoordinateColumns {
        lat_column: String,
        lon_column: String,
    },
}

/// Configuration for reading points from a CSV file.
#[derive(Debug, Clone)]
pub struct CsvPointConfig {
    pub source: CoordinateSource,
    /// Integer id column; rows are numbered from 0 when absent.
    pub id_column: Option<String>,
}

impl CsvPointConfig {
    /// Create config for a CSV with separate latitude/longitude columns.
    ///
    /// # Example
    /// ```
    /// use nearby_tiles_rs::CsvPointConfig;
    ///
    /// let config = CsvPointConfig::new("lat", "lon").id_column("pub_id");
    /// ```
    pub fn new(lat_column: impl Into<String>, lon_column: impl Into<String>) -> Self {
        Self {
            source: CoordinateSource::CoordinateColumns {
                lat_column: lat_column.into(),
                lon_column: lon_column.into(),
            },
            id_column: None,
        }
    }

    /// Create config for a CSV with a point geometry column (WKT or GeoJSON).
    pub fn from_geometry(geometry_column: impl Into<String>) -> Self {
        Self {
            source: CoordinateSource::GeometryColumn(geometry_column.into()),
            id_column: None,
        }
    }

    pub fn id_column(mut self, column: impl Into<String>) -> Self {
        self.id_column = Some(column.into());
        self
    }
}

/// Configuration for the CSV-to-nearby-tiles pipeline.
#[derive(Debug, Clone)]
pub struct CsvNearbyConfig {
    pub points: CsvPointConfig,
    pub zoom_level: u8,
    pub radius_meters: f64,
    pub include_tile_geometry: Option<GeometryFormat>,
}

impl CsvNearbyConfig {
    pub fn new(points: CsvPointConfig, zoom_level: u8, radius_meters: f64) -> Self {
        Self {
            points,
            zoom_level,
            radius_meters,
            include_tile_geometry: None,
        }
    }

    /// Include each tile's outline in the output.
    pub fn with_tile_geometry(mut self, format: GeometryFormat) -> Self {
        self.include_tile_geometry = Some(format);
        self
    }
}

pub trait CsvToNearbyTiles {
    fn to_nearby_tiles_csv(
        &self,
        output_path: impl AsRef<Path>,
        config: &CsvNearbyConfig,
    ) -> Result<usize, TileError>;
}

impl<P: AsRef<Path>> CsvToNearbyTiles for P {
    fn to_nearby_tiles_csv(
        &self,
        output_path: impl AsRef<Path>,
        config: &CsvNearbyConfig,
    ) -> Result<usize, TileError> {
        nearby_tiles_csv(self, output_path, config)
    }
}

fn column_index(headers: &csv::StringRecord, name: &str) -> Result<usize, TileError> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| TileError::MissingColumn(name.to_string()))
}

fn field<'a>(record: &'a csv::StringRecord, idx: usize, name: &str) -> Result<&'a str, TileError> {
    record
        .get(idx)
        .map(str::trim)
        .ok_or_else(|| TileError::CsvError(format!("Missing {} value at index {}", name, idx)))
}

fn parse_f64(value: &str, name: &str) -> Result<f64, TileError> {
    value
        .parse()
        .map_err(|_| TileError::CsvError(format!("Invalid {}: '{}'", name, value)))
}

/// Reads points from a CSV file.
///
/// Fails with [`TileError::MissingColumn`] if a configured column is not in
/// the header row.
pub fn read_points_csv(
    csv_path: impl AsRef<Path>,
    config: &CsvPointConfig,
) -> Result<Vec<IndexedPoint>, TileError> {
    let file = File::open(csv_path).map_err(|e| TileError::IoError(e.to_string()))?;
    let mut reader = csv::Reader::from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| TileError::CsvError(e.to_string()))?
        .clone();

    let source_indices = match &config.source {
        CoordinateSource::GeometryColumn(col) => SourceIndices::Geometry(column_index(&headers, col)?),
        CoordinateSource::CoordinateColumns {
            lat_column,
            lon_column,
        } => SourceIndices::Coordinates {
            lat_idx: column_index(&headers, lat_column)?,
            lon_idx: column_index(&headers, lon_column)?,
        },
    };
    let id_idx = match &config.id_column {
        Some(col) => Some(column_index(&headers, col)?),
        None => None,
    };

    let mut points = Vec::new();
    for (row, result) in reader.records().enumerate() {
        let record = result.map_err(|e| TileError::CsvError(e.to_string()))?;

        let (lat, lon) = match source_indices {
            SourceIndices::Geometry(idx) => {
                let pt = parse_point(field(&record, idx, "geometry")?)?;
                (pt.y(), pt.x())
            }
            SourceIndices::Coordinates { lat_idx, lon_idx } => (
                parse_f64(field(&record, lat_idx, "latitude")?, "latitude")?,
                parse_f64(field(&record, lon_idx, "longitude")?, "longitude")?,
            ),
        };

        let id = match id_idx {
            Some(idx) => {
                let value = field(&record, idx, "id")?;
                value
                    .parse()
                    .map_err(|_| TileError::CsvError(format!("Invalid id: '{}'", value)))?
            }
            None => row as i64,
        };

        points.push(IndexedPoint::new(id, lat, lon));
    }

    log::info!("Read {} points", points.len());
    Ok(points)
}

fn tile_geometry(row: &NearbyTile, zoom: u8, format: GeometryFormat) -> String {
    let polygon = row.tile(zoom).to_polygon();
    match format {
        GeometryFormat::Wkt => {
            use wkt::ToWkt;
            polygon.wkt_string()
        }
        GeometryFormat::GeoJson => geojson::Geometry::from(&polygon).to_string(),
    }
}

/// Writes nearby-tile rows as `coord_id,tile_x,tile_y[,tile_geometry]`.
pub fn write_nearby_csv(
    rows: &[NearbyTile],
    zoom: u8,
    output_path: impl AsRef<Path>,
    tile_geometry_format: Option<GeometryFormat>,
) -> Result<(), TileError> {
    let out_file = File::create(output_path).map_err(|e| TileError::IoError(e.to_string()))?;
    let mut writer = csv::Writer::from_writer(out_file);

    let mut header_row = vec!["coord_id", "tile_x", "tile_y"];
    if tile_geometry_format.is_some() {
        header_row.push("tile_geometry");
    }
    writer
        .write_record(&header_row)
        .map_err(|e| TileError::CsvError(e.to_string()))?;

    for row in rows {
        let mut record = vec![
            row.coord_id.to_string(),
            row.tile_x.to_string(),
            row.tile_y.to_string(),
        ];
        if let Some(format) = tile_geometry_format {
            record.push(tile_geometry(row, zoom, format));
        }
        writer
            .write_record(&record)
            .map_err(|e| TileError::CsvError(e.to_string()))?;
    }

    writer
        .flush()
        .map_err(|e| TileError::IoError(e.to_string()))?;

    Ok(())
}

/// Reads points from `csv_path`, searches nearby tiles and writes the result table.
///
/// The search parameters are validated before the input is opened. Returns
/// the number of rows written.
///
/// # Example
///
/// ```no_run
/// use nearby_tiles_rs::{CsvNearbyConfig, CsvPointConfig, GeometryFormat, nearby_tiles_csv};
///
/// let config = CsvNearbyConfig::new(CsvPointConfig::new("lat", "lon"), 17, 500.0)
///     .with_tile_geometry(GeometryFormat::Wkt);
///
/// nearby_tiles_csv("pubs.csv", "pubs_nearby.csv", &config).unwrap();
/// ```
pub fn nearby_tiles_csv(
    csv_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    config: &CsvNearbyConfig,
) -> Result<usize, TileError> {
    let search = NearbySearch::new(config.zoom_level, config.radius_meters)?;
    let points = read_points_csv(csv_path, &config.points)?;
    let rows = search.run(&points);

    write_nearby_csv(
        &rows,
        config.zoom_level,
        output_path,
        config.include_tile_geometry,
    )?;
    log::info!("Wrote {} nearby tile rows", rows.len());
    Ok(rows.len())
}
