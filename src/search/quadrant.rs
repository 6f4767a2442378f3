use crate::search::template::TileOffset;

/// Sign pattern used to reflect a first-quadrant offset onto the full circle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quadrant {
    /// (+dx, +dy): the computed quadrant, axes and origin included.
    PlusPlus,
    /// (-dx, -dy): everything except the origin.
    MinusMinus,
    /// (-dx, +dy): off-axis offsets only.
    MinusPlus,
    /// (+dx, -dy): off-axis offsets only.
    PlusMinus,
}

impl Quadrant {
    /// Order in which mirrored offsets are emitted.
    pub const ALL: [Quadrant; 4] = [
        Quadrant::PlusPlus,
        Quadrant::MinusMinus,
        Quadrant::MinusPlus,
        Quadrant::PlusMinus,
    ];

    pub fn signs(self) -> (i64, i64) {
        match self {
            Quadrant::PlusPlus => (1, 1),
            Quadrant::MinusMinus => (-1, -1),
            Quadrant::MinusPlus => (-1, 1),
            Quadrant::PlusMinus => (1, -1),
        }
    }

    /// Whether this quadrant emits `offset` without repeating an earlier quadrant.
    pub fn admits(self, offset: TileOffset) -> bool {
        match self {
            Quadrant::PlusPlus => true,
            Quadrant::MinusMinus => !offset.is_origin(),
            Quadrant::MinusPlus | Quadrant::PlusMinus => !offset.on_axis(),
        }
    }

    pub fn transform(self, offset: TileOffset) -> TileOffset {
        let (sx, sy) = self.signs();
        TileOffset::new(sx * offset.dx, sy * offset.dy)
    }
}

/// Reflects a first-quadrant offset into every quadrant that admits it.
///
/// The origin yields one offset, axis offsets two and the rest four, so the
/// union over a first-quadrant template never repeats an offset.
pub fn mirror(offset: TileOffset) -> impl Iterator<Item = TileOffset> {
    Quadrant::ALL
        .into_iter()
        .filter(move |quadrant| quadrant.admits(offset))
        .map(move |quadrant| quadrant.transform(offset))
}
