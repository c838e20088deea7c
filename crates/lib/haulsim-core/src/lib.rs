#![forbid(unsafe_code)]

pub use hashbrown;

pub mod bucket;
pub mod geo;
pub mod scheduler;
pub mod truck;
