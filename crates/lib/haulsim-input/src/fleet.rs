use std::path::Path;

use log::{info, warn};
use serde::Deserialize;

use haulsim_core::geo::GeoPoint;
use haulsim_core::truck::{RouteId, TruckId, TruckRecord, TruckStatus};

/// One roster row:
/// `truck_id,route_id,status,speed_kmph,latitude,longitude`.
/// `route_id` may be empty for unassigned trucks; latitude/longitude is the
/// last externally reported position.
#[derive(Deserialize, Debug)]
struct FleetRow {
    truck_id: u64,
    route_id: Option<u32>,
    status: TruckStatus,
    speed_kmph: f64,
    latitude: f64,
    longitude: f64,
}

/// Reads the truck roster. Unlike the road network, a roster is not optional:
/// there is nothing to simulate without one, so an unreadable file panics at
/// startup. Individual malformed rows are skipped with a log line.
pub fn read_fleet(path: &Path) -> Vec<TruckRecord> {
    let mut reader = match csv::Reader::from_path(path) {
        Ok(reader) => reader,
        Err(e) => panic!("failed to read fleet roster {}: {}", path.display(), e),
    };

    let mut roster = Vec::new();
    for row in reader.deserialize::<FleetRow>() {
        let row = match row {
            Ok(row) => row,
            Err(e) => {
                warn!("skipping malformed roster row: {}", e);
                continue;
            }
        };
        roster.push(
            TruckRecord::builder()
                .id(TruckId::from(row.truck_id))
                .route_id(row.route_id.map(RouteId::from))
                .status(row.status)
                .speed_kmph(row.speed_kmph)
                .position(GeoPoint::new(row.latitude, row.longitude))
                .build(),
        );
    }
    info!("loaded {} trucks from the roster", roster.len());
    roster
}
