use hashbrown::HashMap;
use typed_builder::TypedBuilder;

use haulsim_core::geo::GeoPoint;
use haulsim_core::truck::RouteId;

/// A named stop on a route, in visit order. A route's waypoint list is a
/// cycle: after the last stop the truck returns to the first.
#[derive(Clone, Debug, PartialEq, TypedBuilder)]
pub struct Waypoint {
    pub name: String,
    pub pos: GeoPoint,
}

/// Ordered stop points per route, extracted once from the route provider's
/// data. Rebuilt wholesale whenever that data changes and treated as an
/// immutable snapshot by the tick loop.
#[derive(Clone, Debug, Default)]
pub struct WaypointCache {
    routes: HashMap<RouteId, Vec<Waypoint>>,
}

impl WaypointCache {
    /// Routes that end up with no usable stops are omitted entirely; their
    /// trucks are simply not simulated.
    pub fn insert_route(&mut self, route_id: RouteId, waypoints: Vec<Waypoint>) {
        if !waypoints.is_empty() {
            self.routes.insert(route_id, waypoints);
        }
    }

    pub fn waypoints_of(&self, route_id: RouteId) -> Option<&[Waypoint]> {
        self.routes.get(&route_id).map(|points| points.as_slice())
    }

    pub fn routes(&self) -> impl Iterator<Item = (&RouteId, &Vec<Waypoint>)> {
        self.routes.iter()
    }

    pub fn route_count(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
