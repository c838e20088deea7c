use haulsim_core::geo::GeoPoint;
use haulsim_core::truck::{RouteId, TruckId, TruckRecord, TruckStatus};
use haulsim_models::waypoints::{Waypoint, WaypointCache};

/// Three stops forming a small triangle, roughly 100 m apart. Legs wrap
/// around: 0 -> 1, 1 -> 2, 2 -> 0.
pub fn triangle_route() -> Vec<Waypoint> {
    vec![
        stop("Ward depot", 0.0, 0.0),
        stop("Market corner", 0.0, 0.001),
        stop("Transfer point", 0.001, 0.001),
    ]
}

pub fn stop(name: &str, lat: f64, lon: f64) -> Waypoint {
    Waypoint::builder()
        .name(name.to_string())
        .pos(GeoPoint::new(lat, lon))
        .build()
}

pub fn waypoint_cache_with(route_id: RouteId, stops: Vec<Waypoint>) -> WaypointCache {
    let mut cache = WaypointCache::default();
    cache.insert_route(route_id, stops);
    cache
}

pub fn truck(id: u64, route_id: Option<u32>, status: TruckStatus, speed_kmph: f64) -> TruckRecord {
    TruckRecord::builder()
        .id(TruckId::from(id))
        .route_id(route_id.map(RouteId::from))
        .status(status)
        .speed_kmph(speed_kmph)
        .position(GeoPoint::new(0.0, 0.0))
        .build()
}
