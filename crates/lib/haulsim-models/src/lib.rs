#![forbid(unsafe_code)]

pub mod motion;
pub mod paths;
pub mod roads;
pub mod status;
pub mod waypoints;
