use crate::error::TileError;
use crate::search::{IndexedPoint, NearbyTile};
use crate::tile::Tile;
use arrow_array::{
    Array, Float64Array, Int64Array, RecordBatch, UInt8Array, UInt32Array,
};
use arrow_schema::{DataType, Field, Schema};
use geoarrow_array::IntoArrow;
use geoarrow_array::array::{PointArray, PolygonArray};
use geoarrow_array::builder::{PointBuilder, PolygonBuilder};
use geoarrow_schema::{Crs, Dimension, Metadata, PointType, PolygonType};
use rayon::prelude::*;
use std::sync::Arc;

fn wgs84_metadata() -> Arc<Metadata> {
    let crs = Crs::from_authority_code("EPSG:4326".to_string());
    Arc::new(Metadata::new(crs, None))
}

fn tile_polygons(tiles: impl IndexedParallelIterator<Item = Tile>) -> PolygonArray {
    let poly = PolygonType::new(Dimension::XY, wgs84_metadata());
    let polygons: Vec<_> = tiles.map(|t| t.to_polygon()).collect();
    PolygonBuilder::from_polygons(&polygons, poly).finish()
}

/// Trait for converting collections of [`Tile`]s to Arrow arrays.
///
/// Implemented for `[Tile]` and `Vec<Tile>`.
pub trait TilesToArrow {
    /// Converts tile centers to an Arrow PointArray.
    fn to_arrow_points(&self) -> PointArray;
    /// Converts tiles to an Arrow PolygonArray of tile outlines.
    fn to_arrow_polygons(&self) -> PolygonArray;
    /// Converts tiles to a RecordBatch with x, y, zoom, lat, lon, and geometry.
    fn to_record_batch(&self) -> Result<RecordBatch, TileError>;
}

impl TilesToArrow for [Tile] {
    fn to_arrow_points(&self) -> PointArray {
        let point = PointType::new(Dimension::XY, wgs84_metadata());
        let mut builder = PointBuilder::with_capacity(point, self.len());

        for tile in self {
            builder.push_point(Some(&tile.center()));
        }
        builder.finish()
    }

    fn to_arrow_polygons(&self) -> PolygonArray {
        tile_polygons(self.par_iter().copied())
    }

    fn to_record_batch(&self) -> Result<RecordBatch, TileError> {
        let polygon_array = self.to_arrow_polygons();
        let centers: Vec<(f64, f64)> = self.par_iter().map(|t| t.center_lat_lon()).collect();

        let xs: UInt32Array = self.iter().map(|t| Some(t.x)).collect();
        let ys: UInt32Array = self.iter().map(|t| Some(t.y)).collect();
        let zooms: UInt8Array = self.iter().map(|t| Some(t.zoom)).collect();
        let lats: Float64Array = centers.iter().map(|c| Some(c.0)).collect();
        let lons: Float64Array = centers.iter().map(|c| Some(c.1)).collect();

        let geometry_field = polygon_array.extension_type().to_field("geometry", false);
        let schema = Schema::new(vec![
            Field::new("x", DataType::UInt32, false),
            Field::new("y", DataType::UInt32, false),
            Field::new("zoom", DataType::UInt8, false),
            Field::new("lat", DataType::Float64, false),
            Field::new("lon", DataType::Float64, false),
            geometry_field,
        ]);

        RecordBatch::try_new(
            Arc::new(schema),
            vec![
                Arc::new(xs),
                Arc::new(ys),
                Arc::new(zooms),
                Arc::new(lats),
                Arc::new(lons),
                Arc::new(polygon_array.into_arrow()),
            ],
        )
        .map_err(|e| TileError::IoError(e.to_string()))
    }
}

impl TilesToArrow for Vec<Tile> {
    fn to_arrow_points(&self) -> PointArray {
        self.as_slice().to_arrow_points()
    }

    fn to_arrow_polygons(&self) -> PolygonArray {
        self.as_slice().to_arrow_polygons()
    }

    fn to_record_batch(&self) -> Result<RecordBatch, TileError> {
        self.as_slice().to_record_batch()
    }
}

/// Converts nearby-tile rows to a RecordBatch with `coord_id`, `tile_x` and `tile_y`.
///
/// With `Some(zoom)` a `geometry` column of tile outlines is appended.
pub fn nearby_to_record_batch(
    rows: &[NearbyTile],
    geometry_zoom: Option<u8>,
) -> Result<RecordBatch, TileError> {
    let ids: Int64Array = rows.iter().map(|r| Some(r.coord_id)).collect();
    let xs: UInt32Array = rows.iter().map(|r| Some(r.tile_x)).collect();
    let ys: UInt32Array = rows.iter().map(|r| Some(r.tile_y)).collect();

    let mut fields = vec![
        Field::new("coord_id", DataType::Int64, false),
        Field::new("tile_x", DataType::UInt32, false),
        Field::new("tile_y", DataType::UInt32, false),
    ];
    let mut columns: Vec<Arc<dyn Array>> = vec![Arc::new(ids), Arc::new(xs), Arc::new(ys)];

    if let Some(zoom) = geometry_zoom {
        let polygon_array = tile_polygons(rows.par_iter().map(|r| r.tile(zoom)));
        fields.push(polygon_array.extension_type().to_field("geometry", false));
        columns.push(Arc::new(polygon_array.into_arrow()));
    }

    RecordBatch::try_new(Arc::new(Schema::new(fields)), columns)
        .map_err(|e| TileError::IoError(e.to_string()))
}

fn float_column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a Float64Array, TileError> {
    batch
        .column_by_name(name)
        .ok_or_else(|| TileError::MissingColumn(name.to_string()))?
        .as_any()
        .downcast_ref::<Float64Array>()
        .ok_or_else(|| TileError::IoError(format!("Column {} is not Float64", name)))
}

fn reject_nulls(array: &dyn Array, name: &str) -> Result<(), TileError> {
    if array.null_count() > 0 {
        return Err(TileError::IoError(format!(
            "Column {} contains {} null values",
            name,
            array.null_count()
        )));
    }
    Ok(())
}

/// Reads points from Float64 latitude/longitude columns of a RecordBatch.
///
/// The optional id column must be Int64; without it rows are numbered from 0.
pub fn points_from_record_batch(
    batch: &RecordBatch,
    lat_column: &str,
    lon_column: &str,
    id_column: Option<&str>,
) -> Result<Vec<IndexedPoint>, TileError> {
    let lats = float_column(batch, lat_column)?;
    let lons = float_column(batch, lon_column)?;
    reject_nulls(lats, lat_column)?;
    reject_nulls(lons, lon_column)?;

    let ids = match id_column {
        Some(name) => {
            let ids = batch
                .column_by_name(name)
                .ok_or_else(|| TileError::MissingColumn(name.to_string()))?
                .as_any()
                .downcast_ref::<Int64Array>()
                .ok_or_else(|| TileError::IoError(format!("Column {} is not Int64", name)))?;
            reject_nulls(ids, name)?;
            Some(ids)
        }
        None => None,
    };

    Ok((0..batch.num_rows())
        .map(|i| {
            let id = ids.map_or(i as i64, |ids| ids.value(i));
            IndexedPoint::new(id, lats.value(i), lons.value(i))
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use geoarrow_array::GeoArrowArray;

    fn sample_tiles() -> Vec<Tile> {
        vec![
            Tile::from_lat_lon(51.5, -0.1, 12),
            Tile::from_lat_lon(51.51, -0.12, 12),
            Tile::from_lat_lon(53.48, -2.24, 12),
        ]
    }

    #[test]
    fn test_tiles_to_arrow_points() {
        let tiles = sample_tiles();
        let point_array = tiles.to_arrow_points();
        assert_eq!(point_array.len(), 3);
    }

    #[test]
    fn test_tiles_to_arrow_polygons() {
        let tiles = sample_tiles();
        let polygon_array = tiles.as_slice().to_arrow_polygons();
        assert_eq!(polygon_array.len(), 3);
    }

    #[test]
    fn test_tiles_to_record_batch() -> Result<(), TileError> {
        let tiles = sample_tiles();
        let batch = tiles.to_record_batch()?;
        assert_eq!(batch.num_rows(), 3);
        assert_eq!(batch.num_columns(), 6);

        let xs = batch
            .column_by_name("x")
            .and_then(|c| c.as_any().downcast_ref::<UInt32Array>())
            .ok_or_else(|| TileError::MissingColumn("x".to_string()))?;
        assert_eq!(xs.value(2), tiles[2].x);
        Ok(())
    }

    #[test]
    fn test_nearby_to_record_batch() -> Result<(), TileError> {
        let rows = vec![
            NearbyTile {
                coord_id: 7,
                tile_x: 1,
                tile_y: 2,
            },
            NearbyTile {
                coord_id: 7,
                tile_x: 2,
                tile_y: 2,
            },
        ];

        let plain = nearby_to_record_batch(&rows, None)?;
        assert_eq!(plain.num_columns(), 3);

        let with_geometry = nearby_to_record_batch(&rows, Some(3))?;
        assert_eq!(with_geometry.num_columns(), 4);
        assert_eq!(with_geometry.num_rows(), 2);
        Ok(())
    }

    #[test]
    fn test_points_from_record_batch() -> Result<(), TileError> {
        let schema = Schema::new(vec![
            Field::new("pub_id", DataType::Int64, false),
            Field::new("lat", DataType::Float64, false),
            Field::new("lon", DataType::Float64, false),
        ]);
        let batch = RecordBatch::try_new(
            Arc::new(schema),
            vec![
                Arc::new(Int64Array::from(vec![10, 11])),
                Arc::new(Float64Array::from(vec![51.5, 48.85])),
                Arc::new(Float64Array::from(vec![-0.1, 2.35])),
            ],
        )
        .map_err(|e| TileError::IoError(e.to_string()))?;

        let points = points_from_record_batch(&batch, "lat", "lon", Some("pub_id"))?;
        assert_eq!(points[1], IndexedPoint::new(11, 48.85, 2.35));

        let numbered = points_from_record_batch(&batch, "lat", "lon", None)?;
        assert_eq!(numbered[1].id, 1);

        let missing = points_from_record_batch(&batch, "latitude", "lon", None);
        assert_eq!(missing, Err(TileError::MissingColumn("latitude".to_string())));
        Ok(())
    }
}
