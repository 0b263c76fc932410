//! Forecast region resolution.
//!
//! Maps a station's place name onto a forecast agency's region list. Lookup
//! tables and the region list are data files; the similarity measure used
//! as a fallback is pluggable.

mod error;
mod mapping;
mod overlap;
mod resolve;
mod similarity;
mod taxonomy;

pub use error::RegionError;
pub use mapping::RegionMapping;
pub use overlap::{OverlapReport, PairOverlap, SetSummary, TaxonomyOverlap, read_codes};
pub use resolve::{DEFAULT_SIMILARITY_THRESHOLD, MatchCriteria, RegionMatch, RegionResolver};
pub use similarity::{Levenshtein, SimilarityScorer};
pub use taxonomy::{Region, RegionTaxonomy};
