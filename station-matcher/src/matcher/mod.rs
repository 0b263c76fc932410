//! Nearest-station matching.
//!
//! Given source points (e.g. tide gauges) and a pool of candidate points
//! (e.g. marine observation posts), this module ranks the candidates for
//! each source point by great-circle distance.
//!
//! Every query is independent and pure: the candidate set is built once,
//! then only read.

mod candidates;
mod config;
mod distance;
mod proximity;
mod rank;

#[cfg(test)]
mod match_tests;

pub use candidates::{Candidate, CandidateSet};
pub use config::{DEFAULT_TOP_N, MatchConfig};
pub use distance::{EARTH_RADIUS_KM, distance, haversine_km};
pub use proximity::Proximity;
pub use rank::{MatchResult, MatchSet, RankedCandidate, Ranking, match_all, match_point, rank};
