#![forbid(unsafe_code)]

pub mod fixtures;
