#![forbid(unsafe_code)]

pub mod fleet;
pub mod roads;
pub mod routes;
