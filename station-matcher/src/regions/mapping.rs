//! Name to region lookup tables.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use super::error::RegionError;

/// A table mapping place names (or name fragments) to region names.
///
/// Loaded from a JSON object such as `{"가덕도": "부산", "마산": "창원"}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct RegionMapping(BTreeMap<String, String>);

impl RegionMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(path: &Path) -> Result<Self, RegionError> {
        let text = std::fs::read_to_string(path).map_err(|e| RegionError::from_io(path, e))?;
        let mapping = Self::from_json(&text)?;
        tracing::info!(source = %path.display(), entries = mapping.len(), "loaded region mapping");
        Ok(mapping)
    }

    pub fn from_json(text: &str) -> Result<Self, RegionError> {
        Ok(serde_json::from_str(text.trim_start_matches('\u{feff}'))?)
    }

    pub fn with_entry(mut self, key: impl Into<String>, target: impl Into<String>) -> Self {
        self.0.insert(key.into(), target.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Keys contained in `name`, longest first.
    ///
    /// Keys of equal length come in key order.
    pub fn contained_in<'a>(&'a self, name: &str) -> Vec<(&'a str, &'a str)> {
        let mut found: Vec<(&str, &str)> = self
            .0
            .iter()
            .filter(|(key, _)| !key.is_empty() && name.contains(key.as_str()))
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        found.sort_by(|a, b| b.0.chars().count().cmp(&a.0.chars().count()));
        found
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_json_object() {
        let mapping = RegionMapping::from_json(r#"{"마산": "창원", "가덕도": "부산"}"#).unwrap();
        assert_eq!(mapping.len(), 2);
        assert_eq!(mapping.get("마산"), Some("창원"));
        assert_eq!(mapping.get("진해"), None);
    }

    #[test]
    fn rejects_non_string_values() {
        assert!(matches!(
            RegionMapping::from_json(r#"{"마산": 1}"#),
            Err(RegionError::Json(_))
        ));
    }

    #[test]
    fn contained_keys_longest_first() {
        let mapping = RegionMapping::new()
            .with_entry("서천", "서천")
            .with_entry("서천마량", "서천")
            .with_entry("마량", "완도")
            .with_entry("", "nowhere");

        let keys: Vec<_> = mapping
            .contained_in("서천마량항")
            .into_iter()
            .map(|(k, _)| k)
            .collect();
        assert_eq!(keys, vec!["서천마량", "마량", "서천"]);
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mapping.json");
        std::fs::write(&path, r#"{"연평도": "인천"}"#).unwrap();
        assert_eq!(RegionMapping::load(&path).unwrap().get("연평도"), Some("인천"));

        assert!(matches!(
            RegionMapping::load(&dir.path().join("absent.json")),
            Err(RegionError::MissingFile { .. })
        ));
    }
}
