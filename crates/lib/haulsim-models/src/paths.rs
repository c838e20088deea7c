use std::collections::VecDeque;

use hashbrown::HashMap;
use log::debug;

use haulsim_core::geo::GeoPoint;
use haulsim_core::truck::RouteId;

use crate::roads::{MatchedPath, RoadNetwork};
use crate::waypoints::WaypointCache;

/// Memoized road paths per route leg. Leg `i` connects waypoint `i` to
/// waypoint `(i + 1) mod N`, so every route with at least two waypoints
/// contributes N legs including the wrap-around.
///
/// Construction is budgeted across ticks: until a leg is resolved the tick
/// loop must leave trucks on that leg untouched. Entries are never
/// invalidated; a route-data change replaces the whole cache instance.
#[derive(Clone, Debug, Default)]
pub struct PathCache {
    paths: HashMap<(RouteId, u32), MatchedPath>,
    pending: VecDeque<(RouteId, u32, GeoPoint, GeoPoint)>,
}

impl PathCache {
    pub fn for_routes(waypoints: &WaypointCache) -> Self {
        let mut pending = VecDeque::new();
        for (route_id, stops) in waypoints.routes() {
            if stops.len() < 2 {
                continue;
            }
            for (leg, stop) in stops.iter().enumerate() {
                let next = &stops[(leg + 1) % stops.len()];
                pending.push_back((*route_id, leg as u32, stop.pos, next.pos));
            }
        }
        Self {
            paths: HashMap::new(),
            pending,
        }
    }

    /// Resolves up to `budget` pending legs against the road network.
    /// Returns true once every leg has a cached path.
    pub fn build_step(&mut self, network: &RoadNetwork, budget: u32) -> bool {
        for _ in 0..budget {
            let (route_id, leg, from, to) = match self.pending.pop_front() {
                Some(entry) => entry,
                None => break,
            };
            let path = network.matched_path(&from, &to);
            debug!("path {}-{}: {} vertices", route_id, leg, path.len());
            self.paths.insert((route_id, leg), path);
        }
        self.is_complete()
    }

    pub fn get(&self, route_id: RouteId, leg: u32) -> Option<&MatchedPath> {
        self.paths.get(&(route_id, leg))
    }

    pub fn is_complete(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}
