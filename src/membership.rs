use geo::Contains;
use geo_types::{Point, Polygon};
use rayon::prelude::*;

/// Point-in-polygon membership test used to refine candidate tiles.
///
/// Implement this to plug in an external spatial-join service; [`GeoWithin`]
/// covers the common case with the `geo` crate.
pub trait PointInPolygon {
    /// Returns the indices of the `candidates` lying inside `polygon`.
    fn within(&self, candidates: &[Point<f64>], polygon: &Polygon<f64>) -> Vec<usize>;
}

/// Membership through `geo::Contains`: points on the boundary are not inside.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeoWithin;

impl PointInPolygon for GeoWithin {
    fn within(&self, candidates: &[Point<f64>], polygon: &Polygon<f64>) -> Vec<usize> {
        candidates
            .par_iter()
            .enumerate()
            .filter(|(_, point)| polygon.contains(*point))
            .map(|(i, _)| i)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_types::{point, polygon};

    #[test]
    fn test_geo_within() {
        let square = polygon![
            (x: 0.0, y: 0.0),
            (x: 2.0, y: 0.0),
            (x: 2.0, y: 2.0),
            (x: 0.0, y: 2.0),
            (x: 0.0, y: 0.0),
        ];
        let candidates = vec![
            point! { x: 1.0, y: 1.0 },
            point! { x: 3.0, y: 1.0 },
            point! { x: 0.5, y: 1.5 },
            point! { x: 2.0, y: 1.0 },
        ];

        assert_eq!(GeoWithin.within(&candidates, &square), vec![0, 2]);
    }
}
