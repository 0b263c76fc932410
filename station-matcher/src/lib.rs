//! Nearest-station matching for tide gauges and marine observation posts.
//!
//! Answers: "for each tide gauge, which observation posts are closest, and
//! what do they measure?" Distances are great-circle (Haversine) distances
//! on a spherical Earth.

pub mod config;
pub mod domain;
pub mod matcher;
pub mod regions;
pub mod run;
pub mod sink;
pub mod sources;
