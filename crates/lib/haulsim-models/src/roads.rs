use log::debug;
use serde::Deserialize;

use haulsim_core::geo::{distance_km_with_radius, GeoPoint, EARTH_RADIUS_KM};

/// An ordered sequence of road vertices approximating the real-world path of
/// one route leg. Falls back to `[from, to]` when no road is close enough.
pub type MatchedPath = Vec<GeoPoint>;

fn default_proximity_km() -> f64 {
    1.0
}

fn default_earth_radius_km() -> f64 {
    EARTH_RADIUS_KM
}

#[derive(Deserialize, Debug, Clone, Copy)]
pub struct SpaceSettings {
    #[serde(default = "default_proximity_km")]
    pub proximity_km: f64,
    #[serde(default = "default_earth_radius_km")]
    pub earth_radius_km: f64,
}

impl Default for SpaceSettings {
    fn default() -> Self {
        Self {
            proximity_km: default_proximity_km(),
            earth_radius_km: default_earth_radius_km(),
        }
    }
}

/// One continuous stretch of road with at least two vertices, as delivered by
/// the road network provider.
#[derive(Clone, Debug)]
pub struct RoadSegment {
    pub coords: Vec<GeoPoint>,
}

impl RoadSegment {
    fn endpoint_distance_km(&self, point: &GeoPoint, radius_km: f64) -> f64 {
        let first = distance_km_with_radius(point, &self.coords[0], radius_km);
        let last = distance_km_with_radius(
            point,
            &self.coords[self.coords.len() - 1],
            radius_km,
        );
        first.min(last)
    }
}

/// Static index over the road network, loaded once per process. Matching is a
/// best-effort heuristic, not shortest-path routing: the produced path may
/// overshoot along a segment before bridging towards the destination. That is
/// an accepted simplification of this simulator.
#[derive(Clone, Debug, Default)]
pub struct RoadNetwork {
    segments: Vec<RoadSegment>,
    settings: SpaceSettings,
}

impl RoadNetwork {
    /// Segments with fewer than two vertices carry no walkable geometry and
    /// are discarded at load.
    pub fn new(segments: Vec<RoadSegment>, settings: SpaceSettings) -> Self {
        let segments = segments
            .into_iter()
            .filter(|segment| segment.coords.len() >= 2)
            .collect();
        Self { segments, settings }
    }

    pub fn settings(&self) -> &SpaceSettings {
        &self.settings
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Matches a route leg onto the road network.
    ///
    /// Candidate segments are those with an endpoint within the proximity
    /// threshold of the respective leg endpoint. The closest vertex across
    /// all candidates anchors each side; disjoint segments are bridged with a
    /// synthetic midpoint. When either side has no candidate, the leg
    /// degrades to a straight line, which is a policy rather than an error.
    pub fn matched_path(&self, from: &GeoPoint, to: &GeoPoint) -> MatchedPath {
        let start_candidates = self.candidates_near(from);
        let end_candidates = self.candidates_near(to);
        if start_candidates.is_empty() || end_candidates.is_empty() {
            debug!("no road near leg {} -> {}, using straight line", from, to);
            return vec![*from, *to];
        }

        let (start_seg, start_vertex) = self.closest_vertex(&start_candidates, from);
        let (end_seg, end_vertex) = self.closest_vertex(&end_candidates, to);

        let mut path: MatchedPath = vec![*from];
        path.extend(Self::span_from(&self.segments[start_seg], start_vertex));
        if start_seg != end_seg {
            let best_start = self.segments[start_seg].coords[start_vertex];
            let best_end = self.segments[end_seg].coords[end_vertex];
            path.push(GeoPoint::new(
                (best_start.lat + best_end.lat) / 2.0,
                (best_start.lon + best_end.lon) / 2.0,
            ));
        }
        path.extend(Self::span_to(&self.segments[end_seg], end_vertex));
        path.push(*to);

        debug_assert!(path.len() >= 2);
        path
    }

    fn candidates_near(&self, point: &GeoPoint) -> Vec<usize> {
        let radius = self.settings.earth_radius_km;
        self.segments
            .iter()
            .enumerate()
            .filter(|(_, segment)| {
                segment.endpoint_distance_km(point, radius) < self.settings.proximity_km
            })
            .map(|(idx, _)| idx)
            .collect()
    }

    /// The single closest vertex to `point` across all candidate segments.
    /// Strict comparison keeps the first-encountered vertex on ties.
    fn closest_vertex(&self, candidates: &[usize], point: &GeoPoint) -> (usize, usize) {
        let radius = self.settings.earth_radius_km;
        let mut best = (candidates[0], 0usize);
        let mut best_distance =
            distance_km_with_radius(point, &self.segments[candidates[0]].coords[0], radius);
        for seg_idx in candidates.iter() {
            for (vertex_idx, vertex) in self.segments[*seg_idx].coords.iter().enumerate() {
                let distance = distance_km_with_radius(point, vertex, radius);
                if distance < best_distance {
                    best_distance = distance;
                    best = (*seg_idx, vertex_idx);
                }
            }
        }
        best
    }

    /// Sub-sequence starting at `vertex`, oriented away from the nearer
    /// segment end so the anchor vertex comes first.
    fn span_from(segment: &RoadSegment, vertex: usize) -> Vec<GeoPoint> {
        if vertex < segment.coords.len() / 2 {
            segment.coords[vertex..].to_vec()
        } else {
            segment.coords[..=vertex].iter().rev().copied().collect()
        }
    }

    /// Sub-sequence ending at `vertex`, mirrored orientation of `span_from`.
    fn span_to(segment: &RoadSegment, vertex: usize) -> Vec<GeoPoint> {
        if vertex < segment.coords.len() / 2 {
            segment.coords[vertex..].iter().rev().copied().collect()
        } else {
            segment.coords[..=vertex].to_vec()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 0.001 degrees of latitude is roughly 111 m.
    fn east_west_road() -> RoadSegment {
        RoadSegment {
            coords: vec![
                GeoPoint::new(0.0, 0.0),
                GeoPoint::new(0.0, 0.002),
                GeoPoint::new(0.0, 0.004),
                GeoPoint::new(0.0, 0.006),
            ],
        }
    }

    fn parallel_road() -> RoadSegment {
        RoadSegment {
            coords: vec![
                GeoPoint::new(0.004, 0.0),
                GeoPoint::new(0.004, 0.003),
                GeoPoint::new(0.004, 0.006),
            ],
        }
    }

    fn network(segments: Vec<RoadSegment>) -> RoadNetwork {
        RoadNetwork::new(segments, SpaceSettings::default())
    }

    #[test]
    fn empty_network_falls_back_to_straight_line() {
        let net = network(Vec::new());
        let from = GeoPoint::new(0.0, 0.0);
        let to = GeoPoint::new(0.01, 0.01);
        assert_eq!(net.matched_path(&from, &to), vec![from, to]);
    }

    #[test]
    fn remote_leg_falls_back_to_straight_line() {
        let net = network(vec![east_west_road()]);
        // Both endpoints several degrees away from the only road.
        let from = GeoPoint::new(5.0, 5.0);
        let to = GeoPoint::new(5.1, 5.1);
        assert_eq!(net.matched_path(&from, &to), vec![from, to]);
    }

    #[test]
    fn one_missing_candidate_side_falls_back() {
        let net = network(vec![east_west_road()]);
        let from = GeoPoint::new(0.0005, 0.0);
        let to = GeoPoint::new(5.0, 5.0);
        assert_eq!(net.matched_path(&from, &to), vec![from, to]);
    }

    #[test]
    fn degenerate_segments_are_discarded() {
        let net = network(vec![RoadSegment {
            coords: vec![GeoPoint::new(0.0, 0.0)],
        }]);
        assert_eq!(net.segment_count(), 0);
    }

    #[test]
    fn path_starts_and_ends_at_leg_endpoints() {
        let net = network(vec![east_west_road()]);
        let from = GeoPoint::new(0.0005, 0.0);
        let to = GeoPoint::new(0.0005, 0.006);
        let path = net.matched_path(&from, &to);
        assert!(path.len() >= 2);
        assert_eq!(path[0], from);
        assert_eq!(path[path.len() - 1], to);
    }

    #[test]
    fn same_segment_leg_has_no_bridge_point() {
        let net = network(vec![east_west_road()]);
        let from = GeoPoint::new(0.0005, 0.0);
        let to = GeoPoint::new(0.0005, 0.006);
        let path = net.matched_path(&from, &to);
        // [from] + forward span from vertex 0 + span ending at vertex 3 + [to]
        let road = east_west_road().coords;
        assert_eq!(path.len(), 2 + road.len() * 2);
        assert_eq!(&path[1..1 + road.len()], road.as_slice());
    }

    #[test]
    fn disjoint_segments_are_bridged_with_midpoint() {
        let net = network(vec![east_west_road(), parallel_road()]);
        let from = GeoPoint::new(0.0005, 0.0);
        let to = GeoPoint::new(0.0045, 0.006);
        let path = net.matched_path(&from, &to);
        // Closest vertices: (0.0, 0.0) on the first road, (0.004, 0.006) on
        // the second. Their midpoint must appear between the two spans.
        let bridge = GeoPoint::new(0.002, 0.003);
        assert!(path.contains(&bridge), "missing bridge point in {:?}", path);
    }

    #[test]
    fn start_span_is_reversed_when_anchor_is_near_far_end() {
        let net = network(vec![east_west_road()]);
        // Anchor the start near the last vertex of the road.
        let from = GeoPoint::new(0.0005, 0.006);
        let to = GeoPoint::new(0.0005, 0.0);
        let path = net.matched_path(&from, &to);
        // Span away from the far end: the vertex after `from` must be the
        // road's last vertex, walking backwards.
        assert_eq!(path[1], GeoPoint::new(0.0, 0.006));
        assert_eq!(path[2], GeoPoint::new(0.0, 0.004));
    }
}
