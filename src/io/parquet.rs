use crate::error::TileError;
use crate::io::arrow::{TilesToArrow, nearby_to_record_batch};
use crate::search::NearbyTile;
use crate::tile::Tile;
use arrow_array::RecordBatch;
use geoparquet::writer::{
    GeoParquetRecordBatchEncoder, GeoParquetWriterEncoding, GeoParquetWriterOptionsBuilder,
};
use parquet::arrow::ArrowWriter;
use std::fs::File;
use std::path::Path;

/// Writes a RecordBatch with a GeoArrow geometry column as WKB-encoded GeoParquet.
pub fn write_geoparquet(batch: &RecordBatch, path: impl AsRef<Path>) -> Result<(), TileError> {
    let schema = batch.schema();

    let options = GeoParquetWriterOptionsBuilder::default()
        .set_encoding(GeoParquetWriterEncoding::WKB)
        .build();

    let mut encoder = GeoParquetRecordBatchEncoder::try_new(&schema, &options)
        .map_err(|e| TileError::IoError(e.to_string()))?;

    let file = File::create(path).map_err(|e| TileError::IoError(e.to_string()))?;
    let mut writer = ArrowWriter::try_new(file, encoder.target_schema(), None)
        .map_err(|e| TileError::IoError(e.to_string()))?;

    let encoded_batch = encoder
        .encode_record_batch(batch)
        .map_err(|e| TileError::IoError(e.to_string()))?;

    writer
        .write(&encoded_batch)
        .map_err(|e| TileError::IoError(e.to_string()))?;

    let kv_metadata = encoder
        .into_keyvalue()
        .map_err(|e| TileError::IoError(e.to_string()))?;

    writer.append_key_value_metadata(kv_metadata);
    writer
        .finish()
        .map_err(|e| TileError::IoError(e.to_string()))?;

    log::debug!("Wrote {} rows of GeoParquet", batch.num_rows());
    Ok(())
}

/// Writes nearby-tile rows with their tile outlines as GeoParquet.
pub fn write_nearby_geoparquet(
    rows: &[NearbyTile],
    zoom: u8,
    path: impl AsRef<Path>,
) -> Result<(), TileError> {
    let batch = nearby_to_record_batch(rows, Some(zoom))?;
    write_geoparquet(&batch, path)
}

pub trait TilesToGeoParquet: TilesToArrow {
    fn to_geoparquet(&self, path: impl AsRef<Path>) -> Result<(), TileError>;
}

impl TilesToGeoParquet for [Tile] {
    fn to_geoparquet(&self, path: impl AsRef<Path>) -> Result<(), TileError> {
        let batch = self.to_record_batch()?;
        write_geoparquet(&batch, path)
    }
}

impl TilesToGeoParquet for Vec<Tile> {
    fn to_geoparquet(&self, path: impl AsRef<Path>) -> Result<(), TileError> {
        self.as_slice().to_geoparquet(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::{IndexedPoint, nearby_tiles};
    use tempfile::tempdir;

    #[test]
    fn test_tiles_to_geoparquet() -> Result<(), TileError> {
        let tiles = vec![
            Tile::from_lat_lon(51.5, -0.1, 12),
            Tile::from_lat_lon(53.48, -2.24, 12),
        ];

        let dir = tempdir().map_err(|e| TileError::IoError(e.to_string()))?;
        let path = dir.path().join("tiles.parquet");

        tiles.to_geoparquet(&path)?;

        assert!(path.exists());
        let metadata = std::fs::metadata(&path).map_err(|e| TileError::IoError(e.to_string()))?;
        assert!(metadata.len() > 0);
        Ok(())
    }

    #[test]
    fn test_nearby_to_geoparquet() -> Result<(), TileError> {
        let points = vec![IndexedPoint::new(0, 51.5237, -0.1183)];
        let rows = nearby_tiles(&points, 16, 400.0)?;

        let dir = tempdir().map_err(|e| TileError::IoError(e.to_string()))?;
        let path = dir.path().join("nearby.parquet");

        write_nearby_geoparquet(&rows, 16, &path)?;
        assert!(path.exists());
        Ok(())
    }
}
