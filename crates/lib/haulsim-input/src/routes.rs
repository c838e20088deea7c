use std::path::Path;

use hashbrown::HashMap;
use log::{info, warn};
use serde::Deserialize;

use haulsim_core::geo::GeoPoint;
use haulsim_core::truck::RouteId;
use haulsim_models::waypoints::{Waypoint, WaypointCache};

/// One stop row from the route provider's export:
/// `route_id,stop_order,name,latitude,longitude`.
#[derive(Deserialize, Debug)]
struct StopRow {
    route_id: u32,
    stop_order: u32,
    name: String,
    latitude: f64,
    longitude: f64,
}

/// Builds the per-route waypoint cache from the stop export. Rows with
/// unusable coordinates are skipped; routes without any usable stop are
/// omitted and their trucks simply not simulated. A missing or unreadable
/// file yields an empty cache for the same reason.
pub fn read_route_stops(path: &Path) -> WaypointCache {
    let mut reader = match csv::Reader::from_path(path) {
        Ok(reader) => reader,
        Err(e) => {
            warn!("route stops {} unavailable: {}", path.display(), e);
            return WaypointCache::default();
        }
    };

    let mut grouped: HashMap<RouteId, Vec<(u32, Waypoint)>> = HashMap::new();
    for row in reader.deserialize::<StopRow>() {
        let row = match row {
            Ok(row) => row,
            Err(e) => {
                warn!("skipping malformed stop row: {}", e);
                continue;
            }
        };
        if !row.latitude.is_finite() || !row.longitude.is_finite() {
            warn!("skipping stop {} with unusable coordinates", row.name);
            continue;
        }
        let waypoint = Waypoint::builder()
            .name(row.name)
            .pos(GeoPoint::new(row.latitude, row.longitude))
            .build();
        grouped
            .entry(RouteId::from(row.route_id))
            .or_default()
            .push((row.stop_order, waypoint));
    }

    let mut cache = WaypointCache::default();
    for (route_id, mut stops) in grouped {
        stops.sort_by_key(|(order, _)| *order);
        let waypoints = stops.into_iter().map(|(_, waypoint)| waypoint).collect();
        cache.insert_route(route_id, waypoints);
    }
    info!("loaded stop points for {} routes", cache.route_count());
    cache
}
