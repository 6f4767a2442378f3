use nearby_tiles_rs::{IndexedPoint, NearbySearch, Tile, TileError};

fn main() -> Result<(), TileError> {
    pretty_env_logger::init();

    let lon = -2.2479699500757597;
    let lat = 53.48082746395233;
    let zoom = 16;

    let tile = Tile::from_wgs84(&(lon, lat), zoom);

    println!("Tile: {}", tile);
    println!("Center: {:?}", tile.center_lat_lon());

    let size = serde_json::to_string_pretty(&tile.size_meters())
        .map_err(|e| TileError::IoError(e.to_string()))?;
    println!("Size: {}", size);

    let rows = NearbySearch::new(zoom, 500.0)?.run(&[IndexedPoint::new(0, lat, lon)]);
    println!("{} tiles within 500 m:", rows.len());
    for row in &rows {
        println!("  {}", row.tile(zoom));
    }

    Ok(())
}
