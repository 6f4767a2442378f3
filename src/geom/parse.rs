use crate::error::TileError;
use geo_types::{Geometry, Point, Polygon};
use geojson::GeoJson;
use std::str::FromStr;
use wkt::Wkt;

/// Parses a geometry string, auto-detecting WKT or GeoJSON format.
///
/// GeoJSON is detected by a leading `{`, everything else is tried as WKT.
pub fn parse_geometry(s: &str) -> Result<Geometry<f64>, TileError> {
    let trimmed = s.trim();
    if trimmed.starts_with('{') {
        parse_geojson(trimmed)
    } else {
        parse_wkt(trimmed)
    }
}

/// Parses a GeoJSON geometry or feature into a `geo_types::Geometry`.
pub fn parse_geojson(s: &str) -> Result<Geometry<f64>, TileError> {
    let geojson: GeoJson = s
        .parse()
        .map_err(|e: geojson::Error| TileError::GeometryParseError(e.to_string()))?;

    let geometry = match geojson {
        GeoJson::Geometry(geom) => geom,
        GeoJson::Feature(feat) => feat
            .geometry
            .ok_or_else(|| TileError::GeometryParseError("Feature has no geometry".to_string()))?,
        GeoJson::FeatureCollection(_) => {
            return Err(TileError::GeometryParseError(
                "FeatureCollection not supported, use individual geometries".to_string(),
            ));
        }
    };

    Geometry::try_from(geometry).map_err(|e| TileError::GeometryParseError(e.to_string()))
}

/// Parses a WKT string into a `geo_types::Geometry`.
pub fn parse_wkt(s: &str) -> Result<Geometry<f64>, TileError> {
    let wkt: Wkt<f64> =
        Wkt::from_str(s).map_err(|e| TileError::GeometryParseError(e.to_string()))?;

    wkt.try_into()
        .map_err(|_| TileError::GeometryParseError("Failed to convert WKT to geometry".to_string()))
}

/// Parses a lon/lat point; a single-member MULTIPOINT is accepted as well.
pub fn parse_point(s: &str) -> Result<Point<f64>, TileError> {
    match parse_geometry(s)? {
        Geometry::Point(pt) => Ok(pt),
        Geometry::MultiPoint(mp) if mp.0.len() == 1 => Ok(mp.0[0]),
        other => Err(TileError::GeometryParseError(format!(
            "Expected a point, found {}",
            geometry_name(&other)
        ))),
    }
}

/// Parses a polygon boundary with lon/lat vertices.
pub fn parse_polygon(s: &str) -> Result<Polygon<f64>, TileError> {
    match parse_geometry(s)? {
        Geometry::Polygon(poly) => Ok(poly),
        Geometry::Rect(rect) => Ok(rect.to_polygon()),
        other => Err(TileError::GeometryParseError(format!(
            "Expected a polygon, found {}",
            geometry_name(&other)
        ))),
    }
}

fn geometry_name(geom: &Geometry<f64>) -> &'static str {
    match geom {
        Geometry::Point(_) => "Point",
        Geometry::Line(_) => "Line",
        Geometry::LineString(_) => "LineString",
        Geometry::Polygon(_) => "Polygon",
        Geometry::MultiPoint(_) => "MultiPoint",
        Geometry::MultiLineString(_) => "MultiLineString",
        Geometry::MultiPolygon(_) => "MultiPolygon",
        Geometry::GeometryCollection(_) => "GeometryCollection",
        Geometry::Rect(_) => "Rect",
        Geometry::Triangle(_) => "Triangle",
    }
}
