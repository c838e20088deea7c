use typed_builder::TypedBuilder;

use haulsim_core::geo::{
    bearing_degrees, distance_km_with_radius, interpolate, GeoPoint,
};
use haulsim_core::truck::{TruckId, TruckStatus};

/// Outcome of walking a matched path for one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LegProgress {
    /// Still between two path vertices; position should be re-interpolated.
    OnPath,
    /// The walk exhausted the path; the caller snaps to the next waypoint
    /// and cycles the leg index.
    EndOfPath,
}

/// Simulated kinematic state of one truck. Exists only for trucks that are
/// eligible for simulation; everything else is passed through from the
/// roster untouched.
///
/// Invariants: `vertex_progress` stays in `[0, 1)` and `vertex_index` is a
/// valid index into the current leg's matched path. Reaching the end of the
/// path always snaps to the next waypoint instead of indexing past it.
#[derive(Clone, Debug, TypedBuilder)]
pub struct MotionState {
    pub truck_id: TruckId,
    pub position: GeoPoint,
    pub heading: f64,
    pub speed_kmph: f64,
    pub status: TruckStatus,
    pub hold_ticks: u32,
    pub leg_index: u32,
    pub vertex_index: usize,
    pub vertex_progress: f64,
    pub last_position: GeoPoint,
}

impl MotionState {
    /// Fresh state parked at a route's first waypoint, about to start moving.
    pub fn at_waypoint(truck_id: TruckId, start: GeoPoint, hold_ticks: u32) -> Self {
        MotionState::builder()
            .truck_id(truck_id)
            .position(start)
            .heading(0.0)
            .speed_kmph(0.0)
            .status(TruckStatus::Moving)
            .hold_ticks(hold_ticks)
            .leg_index(0)
            .vertex_index(0)
            .vertex_progress(0.0)
            .last_position(start)
            .build()
    }

    /// Consumes `distance_km` along the path starting at the current vertex
    /// and progress. Sub-segments of zero length are stepped over so the
    /// walk never divides by zero.
    pub fn walk(&mut self, path: &[GeoPoint], distance_km: f64, radius_km: f64) -> LegProgress {
        let mut remaining = distance_km.max(0.0);
        while self.vertex_index < path.len() - 1 {
            let segment_km = distance_km_with_radius(
                &path[self.vertex_index],
                &path[self.vertex_index + 1],
                radius_km,
            );
            if segment_km <= 0.0 {
                self.vertex_index += 1;
                self.vertex_progress = 0.0;
                continue;
            }
            if remaining <= 0.0 {
                break;
            }
            let left_on_segment = segment_km * (1.0 - self.vertex_progress);
            if remaining >= left_on_segment {
                remaining -= left_on_segment;
                self.vertex_index += 1;
                self.vertex_progress = 0.0;
            } else {
                self.vertex_progress += remaining / segment_km;
                remaining = 0.0;
            }
        }
        if self.vertex_index >= path.len() - 1 {
            LegProgress::EndOfPath
        } else {
            LegProgress::OnPath
        }
    }

    /// Re-interpolates position and heading on the current sub-segment.
    pub fn place_on(&mut self, path: &[GeoPoint]) {
        let current = &path[self.vertex_index];
        let next = &path[self.vertex_index + 1];
        self.position = interpolate(current, next, self.vertex_progress);
        self.heading = bearing_degrees(current, next);
        self.last_position = self.position;
    }

    /// Snaps to the next waypoint at the end of a leg. Heading is carried
    /// over from the previous tick; no bearing is computed at the snap
    /// instant, which can show as a small rotation pop on the map.
    pub fn snap_to(&mut self, waypoint: GeoPoint, next_leg: u32) {
        self.position = waypoint;
        self.last_position = waypoint;
        self.leg_index = next_leg;
        self.vertex_index = 0;
        self.vertex_progress = 0.0;
    }
}
