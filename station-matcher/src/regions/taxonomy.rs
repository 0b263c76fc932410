//! Forecast region taxonomy.

use std::collections::{BTreeSet, HashMap};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::RegionError;

/// One forecast region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Region {
    pub code: String,
    pub name: String,
    /// Region kind as the agency labels it (land, city, marine...), if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl Region {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            kind: None,
        }
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }
}

#[derive(Debug, Deserialize)]
struct RegionRow {
    #[serde(rename = "REG_ID")]
    code: String,
    #[serde(rename = "REG_NAME")]
    name: String,
    #[serde(rename = "REG_SP", default)]
    kind: Option<String>,
}

/// The set of regions a name can resolve to.
///
/// Names are unique: when a name appears twice, the first region keeps it.
#[derive(Debug, Clone, Default)]
pub struct RegionTaxonomy {
    regions: Vec<Region>,
    by_name: HashMap<String, usize>,
}

impl RegionTaxonomy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a taxonomy CSV with `REG_ID` and `REG_NAME` columns (and an
    /// optional `REG_SP` kind column).
    pub fn load(path: &Path) -> Result<Self, RegionError> {
        let file = File::open(path).map_err(|e| RegionError::from_io(path, e))?;
        let taxonomy = Self::from_reader(file)?;
        tracing::info!(
            source = %path.display(),
            regions = taxonomy.len(),
            "loaded region taxonomy"
        );
        Ok(taxonomy)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, RegionError> {
        let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

        // deserialize matches by header name, so strip a BOM off the first one
        let headers = rdr.headers()?.clone();
        if headers.get(0).is_some_and(|h| h.starts_with('\u{feff}')) {
            let fixed: csv::StringRecord = headers
                .iter()
                .enumerate()
                .map(|(i, h)| if i == 0 { h.trim_start_matches('\u{feff}') } else { h })
                .collect();
            rdr.set_headers(fixed);
        }

        let mut taxonomy = Self::new();
        for row in rdr.deserialize() {
            let row: RegionRow = row?;
            if row.code.is_empty() || row.name.is_empty() {
                continue;
            }
            let mut region = Region::new(row.code, row.name);
            region.kind = row.kind.filter(|k| !k.is_empty());
            taxonomy.insert(region);
        }
        Ok(taxonomy)
    }

    /// Add a region. Returns false if the name was already taken.
    pub fn insert(&mut self, region: Region) -> bool {
        if self.by_name.contains_key(&region.name) {
            return false;
        }
        self.by_name.insert(region.name.clone(), self.regions.len());
        self.regions.push(region);
        true
    }

    pub fn by_name(&self, name: &str) -> Option<&Region> {
        self.by_name.get(name).map(|&idx| &self.regions[idx])
    }

    pub fn by_code(&self, code: &str) -> Option<&Region> {
        self.regions.iter().find(|r| r.code == code)
    }

    /// Regions in load order.
    pub fn iter(&self) -> std::slice::Iter<'_, Region> {
        self.regions.iter()
    }

    /// Distinct region codes.
    pub fn codes(&self) -> BTreeSet<String> {
        self.regions.iter().map(|r| r.code.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

impl FromIterator<Region> for RegionTaxonomy {
    fn from_iter<I: IntoIterator<Item = Region>>(iter: I) -> Self {
        let mut taxonomy = Self::new();
        for region in iter {
            taxonomy.insert(region);
        }
        taxonomy
    }
}
