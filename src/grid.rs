use crate::coord::Coordinate;
use crate::error::TileError;
use crate::index::{MAX_ZOOM_LEVEL, deg_to_tile};
use crate::membership::PointInPolygon;
use crate::tile::Tile;
use geo_types::{Point, Polygon, Rect};

/// A rectangle of tiles at one zoom level.
///
/// Built from a lon/lat extent or from a polygon's boundary. For polygons the
/// rectangle is only a candidate set: use [`TileGrid::within`] to keep the
/// tiles whose centers fall inside the polygon.
///
/// # Example
///
/// ```
/// use nearby_tiles_rs::{GeoWithin, TileGrid};
/// use geo_types::polygon;
///
/// # fn main() -> Result<(), nearby_tiles_rs::TileError> {
/// let area = polygon![
///     (x: -0.20, y: 51.45),
///     (x: -0.05, y: 51.45),
///     (x: -0.12, y: 51.55),
///     (x: -0.20, y: 51.45),
/// ];
/// let candidates = TileGrid::covering_polygon(&area, 14)?;
/// let inside = candidates.within(&area, &GeoWithin);
/// assert!(inside.len() < candidates.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct TileGrid {
    tiles: Vec<Tile>,
    zoom_level: u8,
}

impl TileGrid {
    pub fn builder() -> TileGridBuilder {
        TileGridBuilder::new()
    }

    /// All tiles touching the lon/lat extent; zoom is clamped to 22.
    pub fn from_extent(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64, zoom_level: u8) -> Self {
        let corners = [
            (min_lon, min_lat),
            (max_lon, min_lat),
            (max_lon, max_lat),
            (min_lon, max_lat),
        ];
        Self::from_vertices(&corners[..], zoom_level.min(MAX_ZOOM_LEVEL))
    }

    pub fn from_rect(rect: &Rect<f64>, zoom_level: u8) -> Self {
        Self::from_extent(
            rect.min().x,
            rect.min().y,
            rect.max().x,
            rect.max().y,
            zoom_level,
        )
    }

    /// Candidate tiles for a polygon: the tile rectangle spanned by its exterior ring.
    ///
    /// Fails with [`TileError::InvalidZoom`] above zoom 22 and
    /// [`TileError::EmptyGeometry`] when the exterior has no vertices.
    pub fn covering_polygon(polygon: &Polygon<f64>, zoom_level: u8) -> Result<Self, TileError> {
        Self::covering_boundary(polygon.exterior().0.as_slice(), zoom_level)
    }

    /// Candidate tiles for a boundary given as ordered `(lon, lat)` vertices.
    pub fn covering_boundary<C: Coordinate>(
        vertices: &[C],
        zoom_level: u8,
    ) -> Result<Self, TileError> {
        if zoom_level > MAX_ZOOM_LEVEL {
            return Err(TileError::InvalidZoom(zoom_level));
        }
        if vertices.is_empty() {
            return Err(TileError::EmptyGeometry);
        }

        let grid = Self::from_vertices(vertices, zoom_level);
        log::info!(
            "{} candidate tiles at zoom {} for a boundary of {} vertices",
            grid.len(),
            zoom_level,
            vertices.len()
        );
        Ok(grid)
    }

    fn from_vertices<C: Coordinate>(vertices: &[C], zoom_level: u8) -> Self {
        let indices: Vec<(u32, u32)> = vertices
            .iter()
            .map(|v| deg_to_tile(v.lat(), v.lon(), zoom_level))
            .collect();

        let tiles = match tile_rectangle(&indices) {
            Some((min_x, min_y, max_x, max_y)) => (min_y..=max_y)
                .flat_map(|y| (min_x..=max_x).map(move |x| Tile::new(x, y, zoom_level)))
                .collect(),
            None => Vec::new(),
        };

        Self { tiles, zoom_level }
    }

    pub fn zoom_level(&self) -> u8 {
        self.zoom_level
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }

    /// Each tile paired with its center point (x = lon, y = lat).
    pub fn candidates(&self) -> Vec<(Tile, Point<f64>)> {
        self.tiles.iter().map(|tile| (*tile, tile.center())).collect()
    }

    /// Tiles whose centers the membership test places inside `polygon`.
    pub fn within(&self, polygon: &Polygon<f64>, membership: &impl PointInPolygon) -> Vec<Tile> {
        let centers: Vec<Point<f64>> = self.tiles.iter().map(Tile::center).collect();
        let inside: Vec<Tile> = membership
            .within(&centers, polygon)
            .into_iter()
            .filter_map(|i| self.tiles.get(i).copied())
            .collect();

        log::info!(
            "{} of {} candidate tiles inside polygon",
            inside.len(),
            self.tiles.len()
        );
        inside
    }

    pub fn to_polygons(&self) -> Vec<Polygon<f64>> {
        self.tiles.iter().map(|tile| tile.to_polygon()).collect()
    }
}

#[derive(Debug, Default)]
pub struct TileGridBuilder {
    zoom_level: u8,
    extent: Option<Rect<f64>>,
}

impl TileGridBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn zoom_level(mut self, zoom_level: u8) -> Self {
        self.zoom_level = zoom_level;
        self
    }

    pub fn extent(mut self, min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Self {
        self.extent = Some(Rect::new(
            geo_types::coord! { x: min_lon, y: min_lat },
            geo_types::coord! { x: max_lon, y: max_lat },
        ));
        self
    }

    pub fn rect(mut self, rect: &Rect<f64>) -> Self {
        self.extent = Some(*rect);
        self
    }

    pub fn build(self) -> Result<TileGrid, TileError> {
        if self.zoom_level > MAX_ZOOM_LEVEL {
            return Err(TileError::InvalidZoom(self.zoom_level));
        }
        let rect = self.extent.ok_or(TileError::EmptyGeometry)?;
        Ok(TileGrid::from_rect(&rect, self.zoom_level))
    }
}

/// Inclusive `(min_x, min_y, max_x, max_y)` over tile indices.
fn tile_rectangle(indices: &[(u32, u32)]) -> Option<(u32, u32, u32, u32)> {
    let (first_x, first_y) = *indices.first()?;
    Some(indices.iter().fold(
        (first_x, first_y, first_x, first_y),
        |(min_x, min_y, max_x, max_y), &(x, y)| (min_x.min(x), min_y.min(y), max_x.max(x), max_y.max(y)),
    ))
}
