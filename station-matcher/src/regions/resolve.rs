//! Resolving place names to forecast regions.

use std::fmt;

use serde::Serialize;
use tracing::debug;

use super::mapping::RegionMapping;
use super::similarity::{Levenshtein, SimilarityScorer};
use super::taxonomy::{Region, RegionTaxonomy};

/// Minimum similarity score accepted when no mapping entry applies.
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.3;

/// Which rule produced a resolution.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "criterion", rename_all = "snake_case")]
pub enum MatchCriteria {
    /// The whole name is a mapping key.
    Exact { key: String },
    /// A mapping key occurs inside the name.
    Contains { key: String },
    /// The closest region name by similarity score.
    Similarity { score: f64 },
    /// Nothing matched; the configured default region was used.
    Default,
    /// Nothing matched and there is no default.
    Unresolved,
}

impl fmt::Display for MatchCriteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchCriteria::Exact { key } => write!(f, "exact({key})"),
            MatchCriteria::Contains { key } => write!(f, "contains({key})"),
            MatchCriteria::Similarity { score } => write!(f, "similarity({score:.2})"),
            MatchCriteria::Default => f.write_str("default"),
            MatchCriteria::Unresolved => f.write_str("unresolved"),
        }
    }
}

/// The outcome of resolving one name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionMatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<Region>,
    #[serde(flatten)]
    pub criterion: MatchCriteria,
}

impl RegionMatch {
    pub fn is_resolved(&self) -> bool {
        self.region.is_some()
    }
}

/// Resolves place names against a [`RegionTaxonomy`].
///
/// Rules are tried in order:
///
/// 1. the name is a mapping key whose target region exists;
/// 2. the longest mapping key contained in the name whose target exists;
/// 3. the region name scoring highest against the name, if the score
///    reaches the threshold (ties keep the earlier region);
/// 4. the default region, if one is configured and exists.
///
/// Otherwise the name is unresolved.
#[derive(Debug, Clone)]
pub struct RegionResolver<S = Levenshtein> {
    taxonomy: RegionTaxonomy,
    mapping: RegionMapping,
    scorer: S,
    threshold: f64,
    default_region: Option<String>,
}

impl RegionResolver<Levenshtein> {
    pub fn new(taxonomy: RegionTaxonomy) -> Self {
        Self {
            taxonomy,
            mapping: RegionMapping::new(),
            scorer: Levenshtein,
            threshold: DEFAULT_SIMILARITY_THRESHOLD,
            default_region: None,
        }
    }
}

impl<S: SimilarityScorer> RegionResolver<S> {
    pub fn with_mapping(mut self, mapping: RegionMapping) -> Self {
        self.mapping = mapping;
        self
    }

    pub fn with_scorer<T: SimilarityScorer>(self, scorer: T) -> RegionResolver<T> {
        RegionResolver {
            taxonomy: self.taxonomy,
            mapping: self.mapping,
            scorer,
            threshold: self.threshold,
            default_region: self.default_region,
        }
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Fall back to this region (by name, or failing that by code).
    pub fn with_default(mut self, region: impl Into<String>) -> Self {
        self.default_region = Some(region.into());
        self
    }

    pub fn taxonomy(&self) -> &RegionTaxonomy {
        &self.taxonomy
    }

    /// Resolve one place name.
    pub fn resolve(&self, name: &str) -> RegionMatch {
        let name = name.trim();
        let resolved = self.resolve_inner(name);
        debug!(name, criterion = %resolved.criterion, "resolved region");
        resolved
    }

    fn resolve_inner(&self, name: &str) -> RegionMatch {
        if let Some(region) = self.mapping.get(name).and_then(|t| self.taxonomy.by_name(t)) {
            return RegionMatch {
                region: Some(region.clone()),
                criterion: MatchCriteria::Exact {
                    key: name.to_string(),
                },
            };
        }

        for (key, target) in self.mapping.contained_in(name) {
            if let Some(region) = self.taxonomy.by_name(target) {
                return RegionMatch {
                    region: Some(region.clone()),
                    criterion: MatchCriteria::Contains {
                        key: key.to_string(),
                    },
                };
            }
        }

        if let Some((region, score)) = self.most_similar(name) {
            if score >= self.threshold {
                return RegionMatch {
                    region: Some(region.clone()),
                    criterion: MatchCriteria::Similarity { score },
                };
            }
        }

        let fallback = self.default_region.as_deref().and_then(|d| {
            self.taxonomy
                .by_name(d)
                .or_else(|| self.taxonomy.by_code(d))
        });
        match fallback {
            Some(region) => RegionMatch {
                region: Some(region.clone()),
                criterion: MatchCriteria::Default,
            },
            None => RegionMatch {
                region: None,
                criterion: MatchCriteria::Unresolved,
            },
        }
    }

    fn most_similar(&self, name: &str) -> Option<(&Region, f64)> {
        let mut best: Option<(&Region, f64)> = None;
        for region in self.taxonomy.iter() {
            let score = self.scorer.score(name, &region.name);
            if score.is_nan() {
                continue;
            }
            match best {
                Some((_, top)) if score <= top => {}
                _ => best = Some((region, score)),
            }
        }
        best
    }
}
