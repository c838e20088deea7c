use serde::Deserialize;

/// Mean Earth radius used by the haversine distance unless a scenario
/// overrides it through its space settings.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A WGS84-like coordinate in degrees. No datum transform is applied anywhere
/// in the simulator.
#[derive(Deserialize, Clone, Copy, Debug, Default, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lon)
    }
}

/// Great-circle distance in km between two coordinates, haversine formula.
pub fn distance_km(a: &GeoPoint, b: &GeoPoint) -> f64 {
    distance_km_with_radius(a, b, EARTH_RADIUS_KM)
}

pub fn distance_km_with_radius(a: &GeoPoint, b: &GeoPoint, radius_km: f64) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lon = (b.lon - a.lon).to_radians();
    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    radius_km * c
}

/// Initial compass bearing from `from` towards `to`, normalized to [0, 360).
/// 0 is north, 90 is east. Coincident points yield 0.
pub fn bearing_degrees(from: &GeoPoint, to: &GeoPoint) -> f64 {
    let d_lon = (to.lon - from.lon).to_radians();
    let lat1 = from.lat.to_radians();
    let lat2 = to.lat.to_radians();

    let y = d_lon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * d_lon.cos();
    let bearing = y.atan2(x).to_degrees();

    (bearing + 360.0) % 360.0
}

/// Linear interpolation of latitude and longitude by fraction `t`. Not
/// geodesically correct, acceptable at the sub-kilometre scale of a road
/// sub-segment.
pub fn interpolate(from: &GeoPoint, to: &GeoPoint, t: f64) -> GeoPoint {
    GeoPoint {
        lat: from.lat + (to.lat - from.lat) * t,
        lon: from.lon + (to.lon - from.lon) * t,
    }
}
