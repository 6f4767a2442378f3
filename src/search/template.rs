use crate::index::constants::STEP_EPSILON;
use std::f64::consts::SQRT_2;

/// Shift from a point's own tile to a candidate tile, in whole tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileOffset {
    pub dx: i64,
    pub dy: i64,
}

impl TileOffset {
    pub fn new(dx: i64, dy: i64) -> Self {
        Self { dx, dy }
    }

    pub fn is_origin(&self) -> bool {
        self.dx == 0 && self.dy == 0
    }

    /// True when the offset lies on either axis (origin included).
    pub fn on_axis(&self) -> bool {
        self.dx == 0 || self.dy == 0
    }
}

/// First-quadrant lattice of candidate offsets shared by every point of a search.
///
/// Covers `0..=x_steps` by `0..=y_steps`, minus the corner offsets whose
/// `dx + dy` exceeds `max(x_steps, y_steps) * sqrt(2)`. That rough bound only
/// trims work; the haversine check decides which tiles are admitted.
#[derive(Debug, Clone, PartialEq)]
pub struct OffsetTemplate {
    x_steps: i64,
    y_steps: i64,
    offsets: Vec<TileOffset>,
}

impl OffsetTemplate {
    pub fn new(x_steps: i64, y_steps: i64) -> Self {
        let x_steps = x_steps.max(0);
        let y_steps = y_steps.max(0);
        let bound = x_steps.max(y_steps) as f64 * SQRT_2;

        let offsets = (0..=y_steps)
            .flat_map(|dy| (0..=x_steps).map(move |dx| TileOffset::new(dx, dy)))
            .filter(|offset| (offset.dx + offset.dy) as f64 <= bound)
            .collect();

        Self {
            x_steps,
            y_steps,
            offsets,
        }
    }

    pub fn x_steps(&self) -> i64 {
        self.x_steps
    }

    pub fn y_steps(&self) -> i64 {
        self.y_steps
    }

    pub fn offsets(&self) -> &[TileOffset] {
        &self.offsets
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TileOffset> {
        self.offsets.iter()
    }
}

/// Tile steps needed along one axis to reach `radius`, plus one tile of margin.
pub fn step_count(radius: f64, tile_distance: f64) -> i64 {
    (radius / (tile_distance + STEP_EPSILON)).ceil() as i64 + 1
}
