//! Column naming conventions for station CSV files.

use serde::Deserialize;

/// Names of the columns a CSV loader reads.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ColumnMap {
    pub id: String,
    pub name: String,
    pub latitude: String,
    pub longitude: String,
    /// Optional column listing capability tags, e.g. `"wt, swh"`.
    #[serde(default)]
    pub capabilities: Option<String>,
}

impl ColumnMap {
    /// Tide gauge convention: `Code`, `Name`, `Latitude`, `Longitude`.
    pub fn tide() -> Self {
        Self {
            id: "Code".to_string(),
            name: "Name".to_string(),
            latitude: "Latitude".to_string(),
            longitude: "Longitude".to_string(),
            capabilities: None,
        }
    }

    /// Observation post convention used by the marine observation exports.
    pub fn observation() -> Self {
        Self {
            id: "STN ID".to_string(),
            name: "지역명(한글)".to_string(),
            latitude: "위도(LAT)".to_string(),
            longitude: "경도(LON)".to_string(),
            capabilities: Some("제공 정보".to_string()),
        }
    }

    /// Prefix every column name, e.g. `a_` turns `STN ID` into `a_STN ID`.
    pub fn with_prefix(mut self, prefix: &str) -> Self {
        let add = |s: &mut String| s.insert_str(0, prefix);
        add(&mut self.id);
        add(&mut self.name);
        add(&mut self.latitude);
        add(&mut self.longitude);
        if let Some(caps) = self.capabilities.as_mut() {
            add(caps);
        }
        self
    }
}

/// A named column preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnPreset {
    Tide,
    Observation,
}

/// How a run file names its columns: a preset or an explicit map.
///
/// ```toml
/// columns = "observation"
/// # or
/// columns = { id = "a_STN ID", name = "a_지역명(한글)", latitude = "a_위도(LAT)", longitude = "a_경도(LON)" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ColumnSpec {
    Preset(ColumnPreset),
    Custom(ColumnMap),
}

impl ColumnSpec {
    /// Resolve to a concrete map, applying an optional prefix.
    pub fn resolve(&self, prefix: Option<&str>) -> ColumnMap {
        let map = match self {
            ColumnSpec::Preset(ColumnPreset::Tide) => ColumnMap::tide(),
            ColumnSpec::Preset(ColumnPreset::Observation) => ColumnMap::observation(),
            ColumnSpec::Custom(map) => map.clone(),
        };
        match prefix {
            Some(p) => map.with_prefix(p),
            None => map,
        }
    }
}

impl Default for ColumnSpec {
    fn default() -> Self {
        ColumnSpec::Preset(ColumnPreset::Tide)
    }
}
