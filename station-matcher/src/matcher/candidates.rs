//! Candidate station pool.

use std::collections::HashMap;

use crate::domain::{Capabilities, GeoPoint, StationId};

/// A station that can be matched against, with the data types it provides.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub point: GeoPoint,
    pub capabilities: Capabilities,
}

impl Candidate {
    pub fn new(point: GeoPoint, capabilities: Capabilities) -> Self {
        Self {
            point,
            capabilities,
        }
    }

    pub fn id(&self) -> &StationId {
        self.point.id()
    }
}

/// The pool of candidates searched for each source point.
///
/// Candidates keep the order in which their ids were first seen. Adding a
/// candidate whose id is already present does not replace it: the existing
/// name and coordinates are kept and the capability tags are unioned. This
/// is how several raw sources describing the same post (one listing wave
/// data, another wind data) end up as a single entry.
#[derive(Debug, Clone, Default)]
pub struct CandidateSet {
    candidates: Vec<Candidate>,
    index: HashMap<StationId, usize>,
}

impl CandidateSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a candidate, merging with any existing entry of the same id.
    ///
    /// Returns true if the id was new.
    pub fn insert(&mut self, point: GeoPoint, capabilities: Capabilities) -> bool {
        match self.index.get(point.id()) {
            Some(&idx) => {
                self.candidates[idx].capabilities.extend_from(&capabilities);
                false
            }
            None => {
                self.index.insert(point.id().clone(), self.candidates.len());
                self.candidates.push(Candidate::new(point, capabilities));
                true
            }
        }
    }

    /// Merge every candidate of `other` into this set, in `other`'s order.
    pub fn merge(&mut self, other: CandidateSet) {
        for candidate in other.candidates {
            self.insert(candidate.point, candidate.capabilities);
        }
    }

    /// Look up a candidate by id.
    pub fn get(&self, id: &StationId) -> Option<&Candidate> {
        self.index.get(id).map(|&idx| &self.candidates[idx])
    }

    /// Candidates in first-insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Candidate> {
        self.candidates.iter()
    }

    pub fn as_slice(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

impl FromIterator<(GeoPoint, Capabilities)> for CandidateSet {
    fn from_iter<I: IntoIterator<Item = (GeoPoint, Capabilities)>>(iter: I) -> Self {
        let mut set = CandidateSet::new();
        for (point, caps) in iter {
            set.insert(point, caps);
        }
        set
    }
}

impl<'a> IntoIterator for &'a CandidateSet {
    type Item = &'a Candidate;
    type IntoIter = std::slice::Iter<'a, Candidate>;

    fn into_iter(self) -> Self::IntoIter {
        self.candidates.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(id: &str, name: &str, lat: f64, lon: f64) -> GeoPoint {
        GeoPoint::parse(id, name, lat, lon).unwrap()
    }

    fn caps(tags: &[&str]) -> Capabilities {
        tags.iter().copied().collect()
    }

    fn sid(s: &str) -> StationId {
        StationId::parse(s).unwrap()
    }

    #[test]
    fn empty_set() {
        let set = CandidateSet::new();
        assert!(set.is_empty());
        assert_eq!(set.len(), 0);
        assert!(set.get(&sid("22185")).is_none());
    }

    #[test]
    fn insert_and_lookup() {
        let mut set = CandidateSet::new();
        assert!(set.insert(point("22185", "인천", 37.0917, 125.4289), caps(&["wt"])));

        let c = set.get(&sid("22185")).unwrap();
        assert_eq!(c.point.name(), "인천");
        assert!(c.capabilities.contains("wt"));
    }

    #[test]
    fn duplicate_id_unions_capabilities() {
        let mut set = CandidateSet::new();
        set.insert(point("X", "first", 37.0, 126.0), caps(&["a"]));
        let added = set.insert(point("X", "second", 35.0, 129.0), caps(&["b"]));

        assert!(!added);
        assert_eq!(set.len(), 1);

        let x = set.get(&sid("X")).unwrap();
        assert_eq!(x.capabilities, caps(&["a", "b"]));
        // First-seen attributes win
        assert_eq!(x.point.name(), "first");
        assert_eq!(x.point.lat(), 37.0);
        assert_eq!(x.point.lon(), 126.0);
    }

    #[test]
    fn merge_wave_and_wind_sources() {
        let wave: CandidateSet = vec![
            (point("22101", "덕적도", 37.2361, 126.0188), caps(&["wt", "swh"])),
            (point("22185", "인천", 37.0917, 125.4289), caps(&["wt", "swh"])),
        ]
        .into_iter()
        .collect();
        let wind: CandidateSet = vec![
            (point("22185", "인천", 37.0917, 125.4289), caps(&["at", "wd", "ws"])),
            (point("955", "서수도", 34.1, 126.2), caps(&["at", "wd", "ws"])),
        ]
        .into_iter()
        .collect();

        let mut merged = wave;
        merged.merge(wind);

        assert_eq!(merged.len(), 3);
        let ids: Vec<_> = merged.iter().map(|c| c.id().as_str()).collect();
        assert_eq!(ids, vec!["22101", "22185", "955"]);
        assert_eq!(
            merged.get(&sid("22185")).unwrap().capabilities.join(","),
            "at,swh,wd,ws,wt"
        );
        assert_eq!(
            merged.get(&sid("22101")).unwrap().capabilities.join(","),
            "swh,wt"
        );
    }
}
