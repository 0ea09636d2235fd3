use incident_reader::Coordinate;

// Mean earth radius in metres
const EARTH_RADIUS: f64 = 6_371_000.0;

/// Great-circle distance between two coordinates in metres (Haversine formula)
pub fn haversine_distance(src: &Coordinate, dst: &Coordinate) -> f64 {
    let lat1 = src.lat.to_radians();
    let lat2 = dst.lat.to_radians();
    let a = ((dst.lat - src.lat).to_radians() / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * ((dst.lon - src.lon).to_radians() / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS * c
}
