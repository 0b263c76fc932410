//! Capability tags describing what an observation post measures.

use std::collections::BTreeSet;

use serde::Serialize;

/// Water temperature.
pub const WATER_TEMPERATURE: &str = "wt";
/// Significant wave height.
pub const WAVE_HEIGHT: &str = "swh";
/// Air temperature.
pub const AIR_TEMPERATURE: &str = "at";
/// Wind direction.
pub const WIND_DIRECTION: &str = "wd";
/// Wind speed.
pub const WIND_SPEED: &str = "ws";

/// An ordered set of capability tags.
///
/// Tags are free-form strings; sources name them however they like. The set
/// only ever grows: merging two sets is a union.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Capabilities(BTreeSet<String>);

impl Capabilities {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a delimited tag list such as `"wt, swh"` or `"wt+swh"`.
    ///
    /// Empty items are dropped.
    pub fn parse_list(s: &str) -> Self {
        s.split([',', '+'])
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect()
    }

    /// Add one tag. Blank tags are ignored.
    pub fn insert(&mut self, tag: impl Into<String>) {
        let tag = tag.into();
        let trimmed = tag.trim();
        if !trimmed.is_empty() {
            self.0.insert(trimmed.to_string());
        }
    }

    /// Union another set into this one.
    pub fn extend_from(&mut self, other: &Capabilities) {
        self.0.extend(other.0.iter().cloned());
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.0.contains(tag)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Join the tags with `sep`, in sorted order.
    pub fn join(&self, sep: &str) -> String {
        self.iter().collect::<Vec<_>>().join(sep)
    }
}

impl<S: Into<String>> FromIterator<S> for Capabilities {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut caps = Capabilities::new();
        for tag in iter {
            caps.insert(tag);
        }
        caps
    }
}
