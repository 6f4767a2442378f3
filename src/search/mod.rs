//! Nearby-tile radius search.
//!
//! For every input point, finds the tiles whose centers lie within a radius of
//! the center of the point's own tile. Only one quadrant of candidate offsets
//! is measured; the other three are obtained by mirroring (see [`Quadrant`]).

mod quadrant;
mod template;

pub use quadrant::{Quadrant, mirror};
pub use template::{OffsetTemplate, TileOffset, step_count};

use crate::coord::Coordinate;
use crate::error::TileError;
use crate::geom::in_grid_neighbour;
use crate::index::{
    CENTER_OFFSET, DEFAULT_CHUNK_SIZE, LARGE_BATCH_WARNING, MAX_SEARCH_ZOOM, MIN_SEARCH_ZOOM,
    check_shape, deg_to_tile, haversine_meters, tile_center, unproject, zoom_scale,
};
use crate::tile::Tile;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashSet;

/// An input point tagged with a caller-assigned id.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndexedPoint {
    pub id: i64,
    pub lat: f64,
    pub lon: f64,
}

impl IndexedPoint {
    pub fn new(id: i64, lat: f64, lon: f64) -> Self {
        Self { id, lat, lon }
    }

    pub fn from_coordinate(id: i64, coord: &impl Coordinate) -> Self {
        Self::new(id, coord.lat(), coord.lon())
    }

    /// Zips aligned id, latitude and longitude columns.
    pub fn from_columns(ids: &[i64], lats: &[f64], lons: &[f64]) -> Result<Vec<Self>, TileError> {
        check_shape(ids.len(), lats.len())?;
        check_shape(ids.len(), lons.len())?;
        Ok(ids
            .iter()
            .zip(lats.iter().zip(lons.iter()))
            .map(|(&id, (&lat, &lon))| Self::new(id, lat, lon))
            .collect())
    }

    /// Like [`IndexedPoint::from_columns`] with ids `0..n` in row order.
    pub fn enumerate(lats: &[f64], lons: &[f64]) -> Result<Vec<Self>, TileError> {
        check_shape(lats.len(), lons.len())?;
        Ok(lats
            .iter()
            .zip(lons.iter())
            .enumerate()
            .map(|(i, (&lat, &lon))| Self::new(i as i64, lat, lon))
            .collect())
    }
}

/// One row of the search result: a tile near the point with id `coord_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NearbyTile {
    pub coord_id: i64,
    pub tile_x: u32,
    pub tile_y: u32,
}

impl NearbyTile {
    pub fn tile(&self, zoom: u8) -> Tile {
        Tile::from_index(i64::from(self.tile_x), i64::from(self.tile_y), zoom)
    }
}

/// A point snapped to the center of its containing tile.
#[derive(Debug, Clone, Copy)]
struct Anchor {
    id: i64,
    x: i64,
    y: i64,
    lat: f64,
    lon: f64,
}

impl Anchor {
    fn locate(point: &IndexedPoint, zoom: u8) -> Self {
        let (x, y) = deg_to_tile(point.lat, point.lon, zoom);
        let (x, y) = (i64::from(x), i64::from(y));
        let (lat, lon) = tile_center(x, y, zoom);
        Self {
            id: point.id,
            x,
            y,
            lat,
            lon,
        }
    }
}

/// Validated parameters of a nearby-tile search.
///
/// # Example
///
/// ```
/// use nearby_tiles_rs::{IndexedPoint, NearbySearch};
///
/// # fn main() -> Result<(), nearby_tiles_rs::TileError> {
/// let points = vec![
///     IndexedPoint::new(0, 51.5074, -0.1278),
///     IndexedPoint::new(1, 51.5033, -0.1196),
/// ];
/// let rows = NearbySearch::new(17, 250.0)?.chunk_size(64).run(&points);
/// assert!(rows.iter().any(|row| row.coord_id == 1));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearbySearch {
    zoom: u8,
    radius: f64,
    chunk_size: usize,
}

impl NearbySearch {
    /// Fails with [`TileError::InvalidZoom`] outside `[1, 23]` and
    /// [`TileError::InvalidRadius`] unless the radius is positive and finite.
    pub fn new(zoom: u8, radius_meters: f64) -> Result<Self, TileError> {
        if !(MIN_SEARCH_ZOOM..=MAX_SEARCH_ZOOM).contains(&zoom) {
            return Err(TileError::InvalidZoom(zoom));
        }
        if !(radius_meters > 0.0 && radius_meters.is_finite()) {
            return Err(TileError::InvalidRadius(radius_meters));
        }
        Ok(Self {
            zoom,
            radius: radius_meters,
            chunk_size: DEFAULT_CHUNK_SIZE,
        })
    }

    /// Number of points handed to each parallel work item.
    pub fn chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Returns the `(point id, tile)` pairs whose tile center lies within the radius.
    ///
    /// Distances are measured from the center of the tile containing each point.
    /// Only offsets south of that center are measured; rows to the north reuse
    /// the verdict of their southern twin. Away from the equator the result can
    /// therefore miss tiles on the poleward side and include a few beyond the
    /// radius on the equatorward side.
    /// Rows come out grouped by point, in input order; no pair is repeated.
    pub fn run(&self, points: &[IndexedPoint]) -> Vec<NearbyTile> {
        if points.is_empty() {
            return Vec::new();
        }
        if points.len() > LARGE_BATCH_WARNING {
            log::warn!(
                "Searching nearby tiles for {} points, this may take a while",
                points.len()
            );
        }

        let n = zoom_scale(self.zoom);
        let anchors: Vec<Anchor> = points
            .par_iter()
            .map(|point| Anchor::locate(point, self.zoom))
            .collect();

        let template = self.build_template(&anchors, n);
        let grid = n as i64;
        let wraps = 2 * template.x_steps() + 1 > grid;
        log::debug!(
            "Offset template of {} offsets ({} x {} steps) at zoom {}",
            template.len(),
            template.x_steps(),
            template.y_steps(),
            self.zoom
        );

        let mut rows: Vec<NearbyTile> = anchors
            .par_chunks(self.chunk_size)
            .flat_map_iter(|chunk| {
                let mut out = Vec::new();
                for anchor in chunk {
                    self.collect_near(anchor, &template, n, wraps, &mut out);
                }
                out
            })
            .collect();

        if has_repeated_ids(points) {
            rows.sort_unstable();
            rows.dedup();
        }

        log::debug!("{} nearby tiles for {} points", rows.len(), points.len());
        rows
    }

    /// Sizes one shared first-quadrant template from the widest per-point need.
    fn build_template(&self, anchors: &[Anchor], n: f64) -> OffsetTemplate {
        let (x_steps, y_steps) = anchors
            .par_iter()
            .map(|anchor| self.step_counts(anchor, n))
            .reduce(|| (0, 0), |a, b| (a.0.max(b.0), a.1.max(b.1)));

        let grid = n as i64;
        OffsetTemplate::new(x_steps.min(grid), y_steps.min(grid))
    }

    fn step_counts(&self, anchor: &Anchor, n: f64) -> (i64, i64) {
        let distance_to = |x: i64, y: i64| {
            let (lat, lon) = tile_center(x, y, self.zoom);
            haversine_meters(anchor.lat, anchor.lon, lat, lon)
        };

        let x_distance = distance_to(in_grid_neighbour(anchor.x, n), anchor.y);
        let y_distance = distance_to(anchor.x, in_grid_neighbour(anchor.y, n));

        (
            step_count(self.radius, x_distance),
            step_count(self.radius, y_distance),
        )
    }

    fn collect_near(
        &self,
        anchor: &Anchor,
        template: &OffsetTemplate,
        n: f64,
        wraps: bool,
        out: &mut Vec<NearbyTile>,
    ) {
        let grid = n as i64;
        let start = out.len();

        for &offset in template.iter() {
            let (lat, lon) = unproject(
                (anchor.x + offset.dx) as f64 + CENTER_OFFSET,
                (anchor.y + offset.dy) as f64 + CENTER_OFFSET,
                n,
            );
            if haversine_meters(anchor.lat, anchor.lon, lat, lon) > self.radius {
                continue;
            }

            for mirrored in mirror(offset) {
                let y = anchor.y + mirrored.dy;
                if y < 0 || y >= grid {
                    continue;
                }
                // Columns wrap across the antimeridian
                let x = (anchor.x + mirrored.dx).rem_euclid(grid);
                out.push(NearbyTile {
                    coord_id: anchor.id,
                    tile_x: x as u32,
                    tile_y: y as u32,
                });
            }
        }

        if wraps {
            let mut own = out.split_off(start);
            own.sort_unstable();
            own.dedup();
            out.extend(own);
        }
    }
}

/// Convenience wrapper: validate, then run a [`NearbySearch`].
pub fn nearby_tiles(
    points: &[IndexedPoint],
    zoom: u8,
    radius_meters: f64,
) -> Result<Vec<NearbyTile>, TileError> {
    Ok(NearbySearch::new(zoom, radius_meters)?.run(points))
}

fn has_repeated_ids(points: &[IndexedPoint]) -> bool {
    let mut seen = HashSet::with_capacity(points.len());
    points.iter().any(|point| !seen.insert(point.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::tile_size_meters;
    use geo_types::Point;

    fn london() -> Vec<IndexedPoint> {
        vec![
            IndexedPoint::new(0, 51.5074, -0.1278),
            IndexedPoint::new(1, 51.5033, -0.1196),
            IndexedPoint::new(2, 51.5155, -0.0922),
        ]
    }

    fn tiles_of(rows: &[NearbyTile], id: i64) -> HashSet<(u32, u32)> {
        rows.iter()
            .filter(|row| row.coord_id == id)
            .map(|row| (row.tile_x, row.tile_y))
            .collect()
    }

    #[test]
    fn test_rejects_invalid_zoom() {
        assert_eq!(NearbySearch::new(0, 100.0), Err(TileError::InvalidZoom(0)));
        assert_eq!(NearbySearch::new(24, 100.0), Err(TileError::InvalidZoom(24)));
        assert!(NearbySearch::new(23, 100.0).is_ok());
    }

    #[test]
    fn test_rejects_invalid_radius() {
        assert_eq!(NearbySearch::new(10, 0.0), Err(TileError::InvalidRadius(0.0)));
        assert_eq!(NearbySearch::new(10, -5.0), Err(TileError::InvalidRadius(-5.0)));
        assert!(NearbySearch::new(10, f64::NAN).is_err());
        assert!(NearbySearch::new(10, f64::INFINITY).is_err());
    }

    #[test]
    fn test_validation_happens_before_work() {
        let result = nearby_tiles(&london(), 30, 100.0);
        assert_eq!(result, Err(TileError::InvalidZoom(30)));
    }

    #[test]
    fn test_small_radius_returns_own_tile() -> Result<(), TileError> {
        let point = IndexedPoint::new(7, 51.5, -0.1);
        let size = tile_size_meters(Some(Point::new(-0.1, 51.5)), 19);
        let radius = size.x_tile_distance_meters.min(size.y_tile_distance_meters) / 2.0 - 1.0;

        let rows = nearby_tiles(&[point], 19, radius)?;
        let (x, y) = deg_to_tile(51.5, -0.1, 19);
        assert_eq!(
            rows,
            vec![NearbyTile {
                coord_id: 7,
                tile_x: x,
                tile_y: y
            }]
        );
        Ok(())
    }

    #[test]
    fn test_empty_input() -> Result<(), TileError> {
        assert!(nearby_tiles(&[], 12, 500.0)?.is_empty());
        Ok(())
    }

    #[test]
    fn test_no_duplicate_rows() -> Result<(), TileError> {
        let rows = nearby_tiles(&london(), 17, 500.0)?;
        let unique: HashSet<_> = rows.iter().copied().collect();
        assert_eq!(unique.len(), rows.len());
        Ok(())
    }

    #[test]
    fn test_rows_grouped_by_point() -> Result<(), TileError> {
        let rows = nearby_tiles(&london(), 17, 300.0)?;
        let ids: Vec<i64> = rows.iter().map(|row| row.coord_id).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);
        Ok(())
    }

    #[test]
    fn test_monotonic_coverage() -> Result<(), TileError> {
        let small = nearby_tiles(&london(), 17, 200.0)?;
        let large = nearby_tiles(&london(), 17, 600.0)?;
        let large: HashSet<_> = large.into_iter().collect();

        assert!(small.len() < large.len());
        assert!(small.iter().all(|row| large.contains(row)));
        Ok(())
    }

    #[test]
    fn test_point_symmetric_offsets() -> Result<(), TileError> {
        let point = IndexedPoint::new(0, 40.4168, -3.7038);
        let rows = nearby_tiles(&[point], 16, 1_500.0)?;
        let (x, y) = deg_to_tile(point.lat, point.lon, 16);

        let offsets: HashSet<(i64, i64)> = rows
            .iter()
            .map(|row| {
                (
                    i64::from(row.tile_x) - i64::from(x),
                    i64::from(row.tile_y) - i64::from(y),
                )
            })
            .collect();
        assert!(offsets.len() > 9);
        for &(dx, dy) in &offsets {
            assert!(offsets.contains(&(-dx, -dy)));
        }
        Ok(())
    }

    #[test]
    fn test_matches_brute_force_away_from_band_edges() -> Result<(), TileError> {
        let zoom = 16;
        let radius = 2_500.0;
        let point = IndexedPoint::new(3, -33.8688, 151.2093);
        let rows = nearby_tiles(&[point], zoom, radius)?;
        let found = tiles_of(&rows, 3);

        let anchor = Anchor::locate(&point, zoom);
        for dy in -20..=20 {
            for dx in -20..=20 {
                let (x, y) = (anchor.x + dx, anchor.y + dy);
                let (lat, lon) = tile_center(x, y, zoom);
                let d = haversine_meters(anchor.lat, anchor.lon, lat, lon);
                let key = (x as u32, y as u32);
                // Mirrored rows are exact in x and approximate in y
                if d <= radius * 0.98 {
                    assert!(found.contains(&key), "missing tile at offset ({dx}, {dy})");
                }
                if d > radius * 1.02 {
                    assert!(!found.contains(&key), "extra tile at offset ({dx}, {dy})");
                }
            }
        }
        Ok(())
    }

    /// Splits a brute-force scan around the anchor into (missing, extra) tiles.
    fn compare_with_scan(
        point: IndexedPoint,
        zoom: u8,
        radius: f64,
        span: i64,
    ) -> Result<(Anchor, Vec<(u32, u32)>, Vec<(u32, u32)>), TileError> {
        let rows = nearby_tiles(&[point], zoom, radius)?;
        let found = tiles_of(&rows, point.id);
        let anchor = Anchor::locate(&point, zoom);
        let grid = zoom_scale(zoom) as i64;

        let mut missing = Vec::new();
        for dy in -span..=span {
            for dx in -span..=span {
                let (x, y) = (anchor.x + dx, anchor.y + dy);
                if y < 0 || y >= grid {
                    continue;
                }
                let (lat, lon) = tile_center(x, y, zoom);
                let key = (x as u32, y as u32);
                if haversine_meters(anchor.lat, anchor.lon, lat, lon) <= radius
                    && !found.contains(&key)
                {
                    missing.push(key);
                }
            }
        }

        let extra = found
            .into_iter()
            .filter(|&(x, y)| {
                let (lat, lon) = tile_center(i64::from(x), i64::from(y), zoom);
                haversine_meters(anchor.lat, anchor.lon, lat, lon) > radius
            })
            .collect();
        Ok((anchor, missing, extra))
    }

    #[test]
    fn test_mid_latitude_matches_scan_exactly() -> Result<(), TileError> {
        let (_, missing, extra) =
            compare_with_scan(IndexedPoint::new(0, 51.5, -0.1), 17, 500.0, 12)?;
        assert!(missing.is_empty());
        assert!(extra.is_empty());
        Ok(())
    }

    #[test]
    fn test_far_north_misses_only_poleward_rows() -> Result<(), TileError> {
        let (anchor, missing, extra) =
            compare_with_scan(IndexedPoint::new(0, 80.0, 10.0), 8, 300_000.0, 30)?;
        assert!(extra.is_empty());
        assert!(!missing.is_empty());
        assert!(missing.iter().all(|&(_, y)| i64::from(y) < anchor.y));
        Ok(())
    }

    #[test]
    fn test_far_south_extras_are_equatorward() -> Result<(), TileError> {
        let (anchor, missing, extra) =
            compare_with_scan(IndexedPoint::new(0, -60.0, 10.0), 10, 200_000.0, 30)?;
        assert!(missing.is_empty());
        assert!(!extra.is_empty());
        assert!(extra.iter().all(|&(_, y)| i64::from(y) < anchor.y));
        Ok(())
    }

    #[test]
    fn test_antimeridian_wraps_columns() -> Result<(), TileError> {
        let zoom = 10;
        let last = zoom_scale(zoom) as u32 - 1;
        let point = IndexedPoint::new(0, 0.0, 179.95);
        let rows = nearby_tiles(&[point], zoom, 100_000.0)?;

        assert!(rows.iter().all(|row| row.tile_x <= last));
        assert!(rows.iter().any(|row| row.tile_x == last));
        assert!(rows.iter().any(|row| row.tile_x == 0));
        Ok(())
    }

    #[test]
    fn test_top_row_drops_rows_off_the_grid() -> Result<(), TileError> {
        let point = IndexedPoint::new(0, 85.05, 10.0);
        let rows = nearby_tiles(&[point], 12, 3_000.0)?;
        let (_, y) = deg_to_tile(85.05, 10.0, 12);

        assert_eq!(y, 0);
        assert!(rows.iter().any(|row| row.tile_y == 0));
        assert!(rows.iter().any(|row| row.tile_y > 0));
        let unique: HashSet<_> = rows.iter().copied().collect();
        assert_eq!(unique.len(), rows.len());
        Ok(())
    }

    #[test]
    fn test_whole_world_at_zoom_one() -> Result<(), TileError> {
        // Just over half the Earth's circumference, so even the antipodal tile counts
        let rows = nearby_tiles(&[IndexedPoint::new(5, 45.0, -90.0)], 1, 20_100_000.0)?;
        let found = tiles_of(&rows, 5);
        assert_eq!(rows.len(), 4);
        assert_eq!(found.len(), 4);
        Ok(())
    }

    #[test]
    fn test_repeated_ids_are_deduplicated() -> Result<(), TileError> {
        let single = nearby_tiles(&[IndexedPoint::new(1, 51.5, -0.1)], 17, 300.0)?;
        let twice = nearby_tiles(
            &[
                IndexedPoint::new(1, 51.5, -0.1),
                IndexedPoint::new(1, 51.5, -0.1),
            ],
            17,
            300.0,
        )?;
        let single: HashSet<_> = single.into_iter().collect();
        let twice_set: HashSet<_> = twice.iter().copied().collect();
        assert_eq!(twice.len(), twice_set.len());
        assert_eq!(single, twice_set);
        Ok(())
    }

    #[test]
    fn test_chunk_size_does_not_change_result() -> Result<(), TileError> {
        let points = london();
        let search = NearbySearch::new(17, 400.0)?;
        let whole = search.run(&points);
        let chunked = search.chunk_size(1).run(&points);
        assert_eq!(whole, chunked);
        Ok(())
    }

    #[test]
    fn test_indexed_point_columns() -> Result<(), TileError> {
        let points = IndexedPoint::from_columns(&[10, 20], &[51.5, 48.85], &[-0.1, 2.35])?;
        assert_eq!(points[1], IndexedPoint::new(20, 48.85, 2.35));

        let points = IndexedPoint::enumerate(&[51.5, 48.85], &[-0.1, 2.35])?;
        assert_eq!(points[1].id, 1);

        let result = IndexedPoint::from_columns(&[1, 2, 3], &[0.0, 0.0, 0.0], &[0.0]);
        assert_eq!(
            result,
            Err(TileError::ShapeMismatch {
                expected: 3,
                found: 1
            })
        );
        Ok(())
    }

    #[test]
    fn test_nearby_tile_to_tile() {
        let row = NearbyTile {
            coord_id: 0,
            tile_x: 3,
            tile_y: 4,
        };
        let tile = row.tile(5);
        assert_eq!((tile.x, tile.y, tile.zoom), (3, 4, 5));
    }
}
