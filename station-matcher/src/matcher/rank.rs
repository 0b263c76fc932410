//! Distance ranking of candidates.
//!
//! Every query is a linear scan over the candidate set followed by a stable
//! sort. Candidate pools are a few hundred stations, so there is no spatial
//! index.

use tracing::debug;

use super::candidates::{Candidate, CandidateSet};
use super::distance::distance;
use crate::domain::{GeoPoint, StationId};

/// A candidate together with its distance from the source point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedCandidate<'a> {
    pub candidate: &'a Candidate,
    pub distance_km: f64,
}

/// The complete distance ordering of a candidate set for one source point.
///
/// Useful for diagnostics such as reporting the farthest candidate next to
/// the nearest. Use [`Ranking::top`] to get a [`MatchResult`].
#[derive(Debug, Clone)]
pub struct Ranking<'a> {
    source: &'a GeoPoint,
    entries: Vec<RankedCandidate<'a>>,
}

impl<'a> Ranking<'a> {
    pub fn source(&self) -> &'a GeoPoint {
        self.source
    }

    /// All candidates, nearest first.
    pub fn entries(&self) -> &[RankedCandidate<'a>] {
        &self.entries
    }

    pub fn nearest(&self) -> Option<&RankedCandidate<'a>> {
        self.entries.first()
    }

    pub fn farthest(&self) -> Option<&RankedCandidate<'a>> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keep the `n` nearest candidates.
    ///
    /// If `n` exceeds the number of candidates, all of them are kept.
    pub fn top(mut self, n: usize) -> MatchResult<'a> {
        self.entries.truncate(n);
        MatchResult {
            source: self.source,
            matches: self.entries,
        }
    }
}

/// The nearest candidates for one source point, nearest first.
#[derive(Debug, Clone)]
pub struct MatchResult<'a> {
    source: &'a GeoPoint,
    matches: Vec<RankedCandidate<'a>>,
}

impl<'a> MatchResult<'a> {
    pub fn source(&self) -> &'a GeoPoint {
        self.source
    }

    pub fn matches(&self) -> &[RankedCandidate<'a>] {
        &self.matches
    }

    pub fn nearest(&self) -> Option<&RankedCandidate<'a>> {
        self.matches.first()
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }
}

/// Rank every candidate by distance from `source`.
///
/// Ties keep candidate insertion order.
pub fn rank<'a>(source: &'a GeoPoint, candidates: &'a CandidateSet) -> Ranking<'a> {
    let mut entries: Vec<RankedCandidate<'a>> = candidates
        .iter()
        .map(|candidate| RankedCandidate {
            candidate,
            distance_km: distance(source, &candidate.point),
        })
        .collect();

    // sort_by is stable, so equal distances stay in insertion order
    entries.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));

    Ranking { source, entries }
}

/// Find the `top_n` nearest candidates to `source`.
///
/// An empty candidate set yields an empty result rather than an error.
///
/// # Examples
///
/// ```
/// use station_matcher::domain::{Capabilities, GeoPoint};
/// use station_matcher::matcher::{CandidateSet, match_point};
///
/// let mut posts = CandidateSet::new();
/// posts.insert(GeoPoint::parse("21229", "울릉도", 37.4554, 131.1144).unwrap(), Capabilities::new());
/// posts.insert(GeoPoint::parse("530350", "목포", 34.77805556, 126.3925).unwrap(), Capabilities::new());
///
/// let gauge = GeoPoint::parse("DT_0007", "목포", 34.7797222, 126.375556).unwrap();
/// let result = match_point(&gauge, &posts, 1);
///
/// assert_eq!(result.len(), 1);
/// assert_eq!(result.nearest().unwrap().candidate.id().as_str(), "530350");
/// ```
pub fn match_point<'a>(
    source: &'a GeoPoint,
    candidates: &'a CandidateSet,
    top_n: usize,
) -> MatchResult<'a> {
    let result = rank(source, candidates).top(top_n);

    if let Some(nearest) = result.nearest() {
        debug!(
            source = %source.id(),
            nearest = %nearest.candidate.id(),
            distance_km = nearest.distance_km,
            "matched source point"
        );
    }

    result
}

/// Match every source point independently.
///
/// Results come back in source order. Source points are never merged, even
/// when two share an id or coordinates.
pub fn match_all<'a, I>(sources: I, candidates: &'a CandidateSet, top_n: usize) -> MatchSet<'a>
where
    I: IntoIterator<Item = &'a GeoPoint>,
{
    let results: Vec<MatchResult<'a>> = sources
        .into_iter()
        .map(|source| match_point(source, candidates, top_n))
        .collect();

    debug!(
        sources = results.len(),
        candidates = candidates.len(),
        top_n,
        "matching complete"
    );

    MatchSet { results }
}

/// Match results for a batch of source points, in source order.
#[derive(Debug, Clone, Default)]
pub struct MatchSet<'a> {
    results: Vec<MatchResult<'a>>,
}

impl<'a> MatchSet<'a> {
    /// Results in source insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, MatchResult<'a>> {
        self.results.iter()
    }

    /// Result for the first source point with this id.
    pub fn get(&self, id: &StationId) -> Option<&MatchResult<'a>> {
        self.results.iter().find(|r| r.source.id() == id)
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

impl<'s, 'a> IntoIterator for &'s MatchSet<'a> {
    type Item = &'s MatchResult<'a>;
    type IntoIter = std::slice::Iter<'s, MatchResult<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Capabilities;

    fn point(id: &str, lat: f64, lon: f64) -> GeoPoint {
        GeoPoint::parse(id, id, lat, lon).unwrap()
    }

    fn set(points: &[(&str, f64, f64)]) -> CandidateSet {
        points
            .iter()
            .map(|(id, lat, lon)| (point(id, *lat, *lon), Capabilities::new()))
            .collect()
    }

    fn ids<'a>(result: &'a MatchResult<'_>) -> Vec<&'a str> {
        result
            .matches()
            .iter()
            .map(|m| m.candidate.id().as_str())
            .collect()
    }

    #[test]
    fn ranks_ascending() {
        let candidates = set(&[("far", 3.0, 0.0), ("near", 1.0, 0.0), ("mid", 2.0, 0.0)]);
        let source = point("S", 0.0, 0.0);

        let result = match_point(&source, &candidates, 10);
        assert_eq!(ids(&result), vec!["near", "mid", "far"]);
    }

    #[test]
    fn truncates_to_top_n() {
        let candidates = set(&[("a", 1.0, 0.0), ("b", 2.0, 0.0), ("c", 3.0, 0.0)]);
        let source = point("S", 0.0, 0.0);

        let result = match_point(&source, &candidates, 2);
        assert_eq!(ids(&result), vec!["a", "b"]);
    }

    #[test]
    fn top_n_larger_than_set_returns_all() {
        let candidates = set(&[("a", 1.0, 0.0), ("b", 2.0, 0.0)]);
        let source = point("S", 0.0, 0.0);

        assert_eq!(match_point(&source, &candidates, 50).len(), 2);
    }

    #[test]
    fn ties_keep_insertion_order() {
        // Exactly one degree north and south of the origin
        let candidates = set(&[("north", 1.0, 0.0), ("south", -1.0, 0.0)]);
        let source = point("S", 0.0, 0.0);
        assert_eq!(ids(&match_point(&source, &candidates, 2)), vec!["north", "south"]);

        let reversed = set(&[("south", -1.0, 0.0), ("north", 1.0, 0.0)]);
        assert_eq!(ids(&match_point(&source, &reversed, 2)), vec!["south", "north"]);
    }

    #[test]
    fn empty_candidates_give_empty_result() {
        let candidates = CandidateSet::new();
        let source = point("S", 37.0, 126.0);

        let result = match_point(&source, &candidates, 5);
        assert!(result.is_empty());
        assert!(result.nearest().is_none());
    }

    #[test]
    fn ranking_exposes_nearest_and_farthest() {
        let candidates = set(&[("b", 2.0, 0.0), ("c", 5.0, 0.0), ("a", 1.0, 0.0)]);
        let source = point("S", 0.0, 0.0);

        let ranking = rank(&source, &candidates);
        assert_eq!(ranking.len(), 3);
        assert_eq!(ranking.nearest().unwrap().candidate.id().as_str(), "a");
        assert_eq!(ranking.farthest().unwrap().candidate.id().as_str(), "c");
        assert_eq!(ranking.source().id().as_str(), "S");
    }

    #[test]
    fn match_all_keeps_source_order_and_duplicates() {
        let candidates = set(&[("a", 1.0, 0.0)]);
        let sources = vec![
            point("Z", 0.0, 0.0),
            point("A", 0.0, 0.0),
            point("Z", 0.0, 0.0),
        ];

        let matched = match_all(&sources, &candidates, 1);
        assert_eq!(matched.len(), 3);
        let order: Vec<_> = matched.iter().map(|r| r.source().id().as_str()).collect();
        assert_eq!(order, vec!["Z", "A", "Z"]);
    }

    #[test]
    fn match_all_lookup_by_id() {
        let candidates = set(&[("a", 1.0, 0.0), ("b", 10.0, 0.0)]);
        let sources = vec![point("S1", 0.0, 0.0), point("S2", 11.0, 0.0)];

        let matched = match_all(&sources, &candidates, 1);
        let s2 = matched.get(&StationId::parse("S2").unwrap()).unwrap();
        assert_eq!(ids(s2), vec!["b"]);
        assert!(matched.get(&StationId::parse("S3").unwrap()).is_none());
    }

    #[test]
    fn match_all_with_no_sources() {
        let candidates = set(&[("a", 1.0, 0.0)]);
        let matched = match_all(std::iter::empty::<&GeoPoint>(), &candidates, 3);
        assert!(matched.is_empty());
    }
}
