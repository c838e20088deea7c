use hashbrown::HashMap;
use log::{debug, info};
use typed_builder::TypedBuilder;

use haulsim_core::bucket::TimeMS;
use haulsim_core::truck::{RouteId, TruckDisplay, TruckId, TruckRecord, TruckStatus};
use haulsim_models::motion::{LegProgress, MotionState};
use haulsim_models::paths::PathCache;
use haulsim_models::roads::{MatchedPath, RoadNetwork};
use haulsim_models::status::DwellModel;
use haulsim_models::waypoints::WaypointCache;

/// Owns all mutable simulation state for one fleet: the roster snapshot, the
/// route and path caches, the dwell model and the per-truck motion map.
///
/// Trucks are processed in isolation: a truck whose roster status is not
/// simulated, whose route has fewer than two stops, or whose current leg has
/// no cached path yet is left untouched for the tick. It still appears in the
/// snapshot, carrying its raw roster values.
#[derive(TypedBuilder)]
pub struct FleetSession {
    roster: Vec<TruckRecord>,
    waypoints: WaypointCache,
    network: RoadNetwork,
    path_cache: PathCache,
    dwell: DwellModel,
    step_size: TimeMS,
    #[builder(default)]
    motions: HashMap<TruckId, MotionState>,
}

impl FleetSession {
    /// Creates fresh motion state for every truck that can be simulated:
    /// an eligible status, an assigned route and at least one stop on it.
    /// Each one starts parked at its route's first stop. A single-stop route
    /// never ticks, but its truck is still displayed at the stop rather than
    /// at its roster position.
    pub fn init_motion(&mut self) {
        for truck in self.roster.iter() {
            if !truck.status.is_simulated() {
                continue;
            }
            let route_id = match truck.route_id {
                Some(route_id) => route_id,
                None => continue,
            };
            let stops = match self.waypoints.waypoints_of(route_id) {
                Some(stops) if !stops.is_empty() => stops,
                _ => {
                    debug!("truck {} has no usable route, not simulating", truck.id);
                    continue;
                }
            };
            let hold = self.dwell.initial_hold();
            self.motions.insert(
                truck.id,
                MotionState::at_waypoint(truck.id, stops[0].pos, hold),
            );
        }
        info!("simulating {} of {} trucks", self.motions.len(), self.roster.len());
    }

    /// Swaps in a new roster and route snapshot. All derived state is
    /// replaced wholesale; nothing from the previous generation survives.
    pub fn rebuild(&mut self, roster: Vec<TruckRecord>, waypoints: WaypointCache) {
        self.path_cache = PathCache::for_routes(&waypoints);
        self.roster = roster;
        self.waypoints = waypoints;
        self.motions.clear();
        self.init_motion();
    }

    /// Resolves up to `budget` route legs against the road network. Until a
    /// leg is resolved, trucks on it sit out their ticks.
    pub fn warm_up(&mut self, budget: u32) -> bool {
        self.path_cache.build_step(&self.network, budget)
    }

    /// Advances every simulable truck by one tick: run the dwell state
    /// machine, then walk the remaining distance along the cached path while
    /// the truck is moving. Exhausting the path snaps the truck to the next
    /// stop and cycles the leg; any overshoot is discarded at the snap.
    pub fn tick(&mut self) {
        let radius_km = self.network.settings().earth_radius_km;
        let hours = self.step_size.as_hours();
        for truck in self.roster.iter() {
            if !truck.status.is_simulated() {
                continue;
            }
            let route_id = match truck.route_id {
                Some(route_id) => route_id,
                None => continue,
            };
            let motion = match self.motions.get_mut(&truck.id) {
                Some(motion) => motion,
                None => continue,
            };
            let stops = match self.waypoints.waypoints_of(route_id) {
                Some(stops) if stops.len() >= 2 => stops,
                _ => continue,
            };
            let path = match self.path_cache.get(route_id, motion.leg_index) {
                Some(path) if path.len() >= 2 => path,
                _ => continue,
            };

            let (status, hold) = self.dwell.step(motion.status, motion.hold_ticks);
            motion.status = status;
            motion.hold_ticks = hold;
            motion.speed_kmph = if status == TruckStatus::Moving {
                truck.speed_kmph
            } else {
                0.0
            };
            if status != TruckStatus::Moving {
                continue;
            }

            let distance_km = motion.speed_kmph * hours;
            match motion.walk(path, distance_km, radius_km) {
                LegProgress::EndOfPath => {
                    let next_leg = (motion.leg_index + 1) % stops.len() as u32;
                    motion.snap_to(stops[next_leg as usize].pos, next_leg);
                }
                LegProgress::OnPath => motion.place_on(path),
            }
        }
    }

    /// The per-tick view handed to the rendering layer: one entry per roster
    /// truck in roster order. Simulated trucks carry their motion state,
    /// everything else passes through the raw roster values.
    pub fn snapshot(&self) -> Vec<TruckDisplay> {
        let mut view = Vec::with_capacity(self.roster.len());
        for truck in self.roster.iter() {
            let display = match self.motions.get(&truck.id) {
                Some(motion) if truck.status.is_simulated() => TruckDisplay::builder()
                    .id(truck.id)
                    .position(motion.position)
                    .heading(motion.heading)
                    .speed_kmph(motion.speed_kmph)
                    .status(motion.status)
                    .build(),
                _ => TruckDisplay::builder()
                    .id(truck.id)
                    .position(truck.position)
                    .heading(0.0)
                    .speed_kmph(truck.speed_kmph)
                    .status(truck.status)
                    .build(),
            };
            view.push(display);
        }
        view
    }

    /// The matched path of one route leg, for consumers rendering the road
    /// geometry a truck is following.
    pub fn matched_path(&self, route_id: RouteId, leg: u32) -> Option<&MatchedPath> {
        self.path_cache.get(route_id, leg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use haulsim_core::geo::{GeoPoint, EARTH_RADIUS_KM};
    use haulsim_models::roads::{RoadSegment, SpaceSettings};
    use haulsim_models::status::DwellSettings;
    use haulsim_models::waypoints::Waypoint;
    use haulsim_testutils::fixtures::{stop, triangle_route, truck, waypoint_cache_with};

    fn session_with(stops: Vec<Waypoint>, roster: Vec<TruckRecord>) -> FleetSession {
        let waypoints = waypoint_cache_with(RouteId::from(1), stops);
        let path_cache = PathCache::for_routes(&waypoints);
        FleetSession::builder()
            .roster(roster)
            .waypoints(waypoints)
            .network(RoadNetwork::new(Vec::new(), SpaceSettings::default()))
            .path_cache(path_cache)
            .dwell(DwellModel::new(DwellSettings::default(), 42))
            .step_size(TimeMS::from(2000u64))
            .build()
    }

    fn degrees_for_km(km: f64) -> f64 {
        km / EARTH_RADIUS_KM * 180.0 / std::f64::consts::PI
    }

    #[test]
    fn leg_completes_on_the_third_tick() {
        // 36 km/h over 2000 ms ticks is 0.02 km per tick; a 0.05 km leg is
        // exhausted on the third tick with 0.01 km of discarded overshoot.
        let leg_deg = degrees_for_km(0.05);
        let stops = vec![
            stop("Depot", 0.0, 0.0),
            stop("Market", 0.0, leg_deg),
            stop("Transfer", 0.0, 2.0 * leg_deg),
        ];
        let second_stop = stops[1].pos;
        let mut session = session_with(stops, vec![truck(1, Some(1), TruckStatus::Moving, 36.0)]);
        session.init_motion();
        assert!(session.warm_up(100));

        session.tick();
        session.tick();
        let motion = session.motions.get(&TruckId::from(1)).expect("no motion");
        assert_eq!(motion.leg_index, 0);
        assert!((motion.vertex_progress - 0.8).abs() < 1e-9);

        session.tick();
        let motion = session.motions.get(&TruckId::from(1)).expect("no motion");
        assert_eq!(motion.leg_index, 1);
        assert_eq!(motion.position, second_stop);
        assert_eq!(motion.vertex_index, 0);
        assert_eq!(motion.vertex_progress, 0.0);
    }

    #[test]
    fn motion_invariants_hold_over_many_ticks() {
        // A road near the triangle makes every leg match a multi-vertex path
        // with duplicated anchors, so the walk crosses vertices, skips
        // zero-length sub-segments and cycles legs many times over.
        let road = RoadSegment {
            coords: vec![
                GeoPoint::new(0.0, 0.0),
                GeoPoint::new(0.0, 0.0005),
                GeoPoint::new(0.0, 0.001),
            ],
        };
        let route = RouteId::from(1);
        let waypoints = waypoint_cache_with(route, triangle_route());
        let path_cache = PathCache::for_routes(&waypoints);
        let mut session = FleetSession::builder()
            .roster(vec![truck(1, Some(1), TruckStatus::Moving, 36.0)])
            .waypoints(waypoints)
            .network(RoadNetwork::new(vec![road], SpaceSettings::default()))
            .path_cache(path_cache)
            .dwell(DwellModel::new(DwellSettings::default(), 42))
            .step_size(TimeMS::from(2000u64))
            .build();
        session.init_motion();
        assert!(session.warm_up(100));

        let mut legs_seen = [false; 3];
        for _ in 0..300 {
            session.tick();
            let motion = session.motions.get(&TruckId::from(1)).expect("no motion");
            assert!(
                (0.0..1.0).contains(&motion.vertex_progress),
                "vertex_progress {}",
                motion.vertex_progress
            );
            assert!((motion.leg_index as usize) < 3);
            let path = session
                .matched_path(route, motion.leg_index)
                .expect("missing leg path");
            assert!(motion.vertex_index < path.len());
            legs_seen[motion.leg_index as usize] = true;
        }
        assert!(legs_seen.iter().all(|seen| *seen), "legs {:?}", legs_seen);
    }

    #[test]
    fn offline_trucks_are_passed_through() {
        let roster = vec![truck(1, Some(1), TruckStatus::Offline, 0.0)];
        let parked_at = roster[0].position;
        let mut session = session_with(triangle_route(), roster);
        session.init_motion();
        assert!(session.motions.is_empty());
        session.warm_up(100);
        session.tick();

        let view = session.snapshot();
        assert_eq!(view.len(), 1);
        assert_eq!(view[0].status, TruckStatus::Offline);
        assert_eq!(view[0].position, parked_at);
        assert_eq!(view[0].heading, 0.0);
    }

    #[test]
    fn unrouted_trucks_are_not_simulated() {
        let mut session = session_with(
            triangle_route(),
            vec![truck(1, None, TruckStatus::Moving, 30.0)],
        );
        session.init_motion();
        assert!(session.motions.is_empty());
    }

    #[test]
    fn single_stop_route_trucks_park_at_their_stop() {
        // One stop away from the roster position: the truck never ticks but
        // is still overlaid at its waypoint, not at its roster coordinate.
        let only_stop = stop("Transfer point", 0.001, 0.001);
        let parked_at = only_stop.pos;
        let mut session = session_with(
            vec![only_stop],
            vec![truck(1, Some(1), TruckStatus::Moving, 30.0)],
        );
        session.init_motion();
        assert!(session.motions.contains_key(&TruckId::from(1)));

        assert!(session.warm_up(100));
        session.tick();
        let motion = session.motions.get(&TruckId::from(1)).expect("no motion");
        assert_eq!(motion.position, parked_at);
        assert_eq!(motion.vertex_progress, 0.0);

        let view = session.snapshot();
        assert_eq!(view[0].position, parked_at);
        assert_ne!(view[0].position, session.roster[0].position);
        assert_eq!(view[0].status, TruckStatus::Moving);
    }

    #[test]
    fn trucks_sit_out_ticks_until_their_leg_is_cached() {
        let mut session = session_with(
            triangle_route(),
            vec![truck(1, Some(1), TruckStatus::Moving, 36.0)],
        );
        session.init_motion();
        session.tick();
        let motion = session.motions.get(&TruckId::from(1)).expect("no motion");
        assert_eq!(motion.vertex_progress, 0.0);

        assert!(session.warm_up(100));
        session.tick();
        let motion = session.motions.get(&TruckId::from(1)).expect("no motion");
        assert!(motion.vertex_progress > 0.0);
    }

    #[test]
    fn dwelling_trucks_hold_their_position() {
        let mut session = session_with(
            triangle_route(),
            vec![truck(1, Some(1), TruckStatus::Moving, 36.0)],
        );
        session.init_motion();
        session.warm_up(100);
        let motion = session.motions.get_mut(&TruckId::from(1)).expect("no motion");
        motion.status = TruckStatus::Idle;
        motion.hold_ticks = 5;
        let before = motion.position;

        session.tick();
        let motion = session.motions.get(&TruckId::from(1)).expect("no motion");
        assert_eq!(motion.status, TruckStatus::Idle);
        assert_eq!(motion.hold_ticks, 4);
        assert_eq!(motion.speed_kmph, 0.0);
        assert_eq!(motion.position, before);
    }

    #[test]
    fn snapshot_overlays_simulated_trucks() {
        let mut session = session_with(
            triangle_route(),
            vec![
                truck(1, Some(1), TruckStatus::Moving, 36.0),
                truck(2, None, TruckStatus::Moving, 25.0),
            ],
        );
        session.init_motion();
        session.warm_up(100);
        session.tick();

        let view = session.snapshot();
        assert_eq!(view.len(), 2);
        let motion = session.motions.get(&TruckId::from(1)).expect("no motion");
        assert_eq!(view[0].position, motion.position);
        assert_eq!(view[0].speed_kmph, 36.0);
        assert_eq!(view[1].position, session.roster[1].position);
        assert_eq!(view[1].speed_kmph, 25.0);
    }

    #[test]
    fn rebuild_replaces_the_whole_generation() {
        let mut session = session_with(
            triangle_route(),
            vec![truck(1, Some(1), TruckStatus::Moving, 36.0)],
        );
        session.init_motion();
        session.warm_up(100);
        session.tick();
        assert!(session.motions.contains_key(&TruckId::from(1)));

        let new_waypoints = waypoint_cache_with(RouteId::from(2), triangle_route());
        session.rebuild(vec![truck(7, Some(2), TruckStatus::Moving, 30.0)], new_waypoints);
        assert!(!session.motions.contains_key(&TruckId::from(1)));
        assert!(session.motions.contains_key(&TruckId::from(7)));
        assert!(!session.warm_up(0));
        assert!(session.matched_path(RouteId::from(1), 0).is_none());
    }

    #[test]
    fn matched_paths_are_exposed_per_leg() {
        let stops = triangle_route();
        let first = stops[0].pos;
        let second = stops[1].pos;
        let mut session = session_with(stops, Vec::new());
        session.warm_up(100);
        let path = session
            .matched_path(RouteId::from(1), 0)
            .expect("missing leg path");
        assert_eq!(path[0], first);
        assert_eq!(path[path.len() - 1], second);
    }
}
