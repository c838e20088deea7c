use std::fmt;
use std::fmt::Debug;
use std::str::FromStr;

use serde::Deserialize;
use typed_builder::TypedBuilder;

use crate::geo::GeoPoint;

/// A unique ID that is a property of every truck in the fleet.
#[derive(Deserialize, Default, Clone, Copy, PartialOrd, Ord, PartialEq, Eq, Hash)]
pub struct TruckId(u64);

impl fmt::Display for TruckId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Debug for TruckId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TruckId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = s.parse::<u64>()?;
        Ok(Self(id))
    }
}

impl From<u64> for TruckId {
    fn from(f: u64) -> Self {
        Self(f)
    }
}

impl TruckId {
    pub fn as_u64(&self) -> u64 {
        self.0
    }
    pub fn as_i64(&self) -> i64 {
        self.0 as i64
    }
}

/// Identifier of a collection route. Routes are owned by the route provider;
/// the simulator only keys its caches by them.
#[derive(Deserialize, Default, Clone, Copy, PartialOrd, Ord, PartialEq, Eq, Hash)]
pub struct RouteId(u32);

impl fmt::Display for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Debug for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RouteId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = s.parse::<u32>()?;
        Ok(Self(id))
    }
}

impl From<u32> for RouteId {
    fn from(f: u32) -> Self {
        Self(f)
    }
}

impl RouteId {
    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

/// Operational status of a truck. `Moving`, `Idle` and `Dumping` are the
/// states the dwell model cycles through; `Offline` and `Breakdown` come from
/// the roster provider and gate simulation eligibility.
#[derive(Deserialize, Debug, Hash, Copy, Default, Clone, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TruckStatus {
    #[default]
    Moving,
    Idle,
    Dumping,
    Offline,
    Breakdown,
}

impl fmt::Display for TruckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TruckStatus::Moving => write!(f, "moving"),
            TruckStatus::Idle => write!(f, "idle"),
            TruckStatus::Dumping => write!(f, "dumping"),
            TruckStatus::Offline => write!(f, "offline"),
            TruckStatus::Breakdown => write!(f, "breakdown"),
        }
    }
}

impl TruckStatus {
    /// Offline and broken-down trucks are never simulated; their position is
    /// whatever the roster provider last reported.
    pub fn is_simulated(&self) -> bool {
        !matches!(self, TruckStatus::Offline | TruckStatus::Breakdown)
    }

    pub fn is_dwelling(&self) -> bool {
        matches!(self, TruckStatus::Idle | TruckStatus::Dumping)
    }
}

/// One roster row from the truck roster provider: identity, route assignment,
/// last reported state and nominal speed. Read-only input to the simulator.
#[derive(Clone, Debug, TypedBuilder)]
pub struct TruckRecord {
    pub id: TruckId,
    pub route_id: Option<RouteId>,
    pub status: TruckStatus,
    pub speed_kmph: f64,
    pub position: GeoPoint,
}

/// The per-tick view of a truck handed to the rendering layer: simulated
/// values overlaid on the roster record, or the roster record passed through
/// untouched when the truck is not simulated.
#[derive(Clone, Debug, TypedBuilder)]
pub struct TruckDisplay {
    pub id: TruckId,
    pub position: GeoPoint,
    pub heading: f64,
    pub speed_kmph: f64,
    pub status: TruckStatus,
}
