use std::fs;
use std::path::Path;

use log::{info, warn};
use serde::Deserialize;

use haulsim_core::geo::GeoPoint;
use haulsim_models::roads::{RoadNetwork, RoadSegment, SpaceSettings};

/// Minimal GeoJSON shape for the road network export: a FeatureCollection
/// whose LineString features carry the road polylines. Everything else in the
/// file is ignored.
#[derive(Deserialize, Debug)]
struct FeatureCollection {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Deserialize, Debug)]
struct Feature {
    geometry: Option<Geometry>,
}

#[derive(Deserialize, Debug)]
struct Geometry {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    coordinates: serde_json::Value,
}

/// Loads the road network once. Any failure here - missing file, malformed
/// JSON, unexpected GeoJSON shape - degrades to an empty network, which makes
/// every leg match fall back to a straight line. The tick loop never sees an
/// error from this path.
pub fn read_road_network(path: &Path, settings: SpaceSettings) -> RoadNetwork {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            warn!(
                "road network {} unavailable, legs degrade to straight lines: {}",
                path.display(),
                e
            );
            return RoadNetwork::new(Vec::new(), settings);
        }
    };
    let collection: FeatureCollection = match serde_json::from_str(&text) {
        Ok(collection) => collection,
        Err(e) => {
            warn!("road network {} is malformed: {}", path.display(), e);
            return RoadNetwork::new(Vec::new(), settings);
        }
    };
    if collection.kind != "FeatureCollection" {
        warn!(
            "road network {} is not a FeatureCollection",
            path.display()
        );
        return RoadNetwork::new(Vec::new(), settings);
    }

    let mut segments = Vec::new();
    for feature in collection.features {
        let geometry = match feature.geometry {
            Some(geometry) if geometry.kind == "LineString" => geometry,
            _ => continue,
        };
        // GeoJSON positions are [lon, lat, ...]; extra ordinates are dropped.
        let positions: Vec<Vec<f64>> = match serde_json::from_value(geometry.coordinates) {
            Ok(positions) => positions,
            Err(_) => continue,
        };
        let coords: Vec<GeoPoint> = positions
            .iter()
            .filter(|position| position.len() >= 2)
            .map(|position| GeoPoint::new(position[1], position[0]))
            .collect();
        if coords.len() >= 2 {
            segments.push(RoadSegment { coords });
        }
    }

    info!("loaded {} road segments", segments.len());
    RoadNetwork::new(segments, settings)
}
