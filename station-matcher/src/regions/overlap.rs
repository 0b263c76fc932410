//! Overlap between region code sets from different forecast products.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Serialize;

use super::error::RegionError;

/// Codes shared by two named sets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PairOverlap {
    pub left: String,
    pub right: String,
    pub shared: BTreeSet<String>,
}

/// One input set in an [`OverlapReport`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SetSummary {
    pub name: String,
    pub count: usize,
    pub codes: BTreeSet<String>,
}

/// Everything [`TaxonomyOverlap`] knows, ready to write out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverlapReport {
    pub sets: Vec<SetSummary>,
    pub pairwise: Vec<PairOverlap>,
    pub common: BTreeSet<String>,
}

/// Named sets of region codes to compare.
#[derive(Debug, Clone, Default)]
pub struct TaxonomyOverlap {
    sets: Vec<(String, BTreeSet<String>)>,
}

impl TaxonomyOverlap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_set<I, S>(mut self, name: impl Into<String>, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sets
            .push((name.into(), codes.into_iter().map(Into::into).collect()));
        self
    }

    /// Add a set read from a forecast product file. See [`read_codes`].
    pub fn load_set(self, name: impl Into<String>, path: &Path) -> Result<Self, RegionError> {
        let name = name.into();
        let file = File::open(path).map_err(|e| RegionError::from_io(path, e))?;
        let codes = read_codes(file)?;
        tracing::info!(
            set = %name,
            source = %path.display(),
            codes = codes.len(),
            "loaded region codes"
        );
        Ok(self.with_set(name, codes))
    }

    /// Intersections of every pair, in the order the sets were added.
    pub fn pairwise(&self) -> Vec<PairOverlap> {
        let mut pairs = Vec::new();
        for (i, (left, a)) in self.sets.iter().enumerate() {
            for (right, b) in &self.sets[i + 1..] {
                pairs.push(PairOverlap {
                    left: left.clone(),
                    right: right.clone(),
                    shared: a.intersection(b).cloned().collect(),
                });
            }
        }
        pairs
    }

    /// Codes present in every set. Empty when there are no sets.
    pub fn common(&self) -> BTreeSet<String> {
        let mut iter = self.sets.iter().map(|(_, codes)| codes);
        let Some(first) = iter.next() else {
            return BTreeSet::new();
        };
        iter.fold(first.clone(), |acc, codes| {
            acc.intersection(codes).cloned().collect()
        })
    }

    pub fn report(&self) -> OverlapReport {
        OverlapReport {
            sets: self
                .sets
                .iter()
                .map(|(name, codes)| SetSummary {
                    name: name.clone(),
                    count: codes.len(),
                    codes: codes.clone(),
                })
                .collect(),
            pairwise: self.pairwise(),
            common: self.common(),
        }
    }
}

/// Region codes from raw forecast product lines.
///
/// The code is the first field of each comma-separated line. There is no
/// header; lines starting with `#` are skipped, as are blank codes.
pub fn read_codes<R: Read>(reader: R) -> Result<BTreeSet<String>, RegionError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .comment(Some(b'#'))
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut codes = BTreeSet::new();
    for record in rdr.records() {
        let record = record?;
        let code = record
            .get(0)
            .unwrap_or_default()
            .trim_start_matches('\u{feff}')
            .trim();
        // a BOM hides the comment marker from the reader
        if !code.is_empty() && !code.starts_with('#') {
            codes.insert(code.to_string());
        }
    }
    Ok(codes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overlap() -> TaxonomyOverlap {
        TaxonomyOverlap::new()
            .with_set("temperature", ["11B10101", "11B20201", "11H20201"])
            .with_set("land", ["11B00000", "11B20201", "11H20201"])
            .with_set("marine", ["12A20000", "11H20201"])
    }

    #[test]
    fn pairs_in_order() {
        let pairs = overlap().pairwise();
        assert_eq!(pairs.len(), 3);
        assert_eq!((pairs[0].left.as_str(), pairs[0].right.as_str()), ("temperature", "land"));
        assert_eq!(pairs[0].shared.len(), 2);
        assert_eq!((pairs[2].left.as_str(), pairs[2].right.as_str()), ("land", "marine"));
        assert_eq!(pairs[2].shared.iter().collect::<Vec<_>>(), vec!["11H20201"]);
    }

    #[test]
    fn common_to_all() {
        assert_eq!(
            overlap().common().into_iter().collect::<Vec<_>>(),
            vec!["11H20201".to_string()]
        );
    }

    #[test]
    fn empty() {
        let none = TaxonomyOverlap::new();
        assert!(none.pairwise().is_empty());
        assert!(none.common().is_empty());
    }

    #[test]
    fn report_serializes_sets_pairs_and_common() {
        let json = serde_json::to_value(overlap().report()).unwrap();
        assert_eq!(json["sets"][2]["name"], "marine");
        assert_eq!(json["sets"][2]["count"], 2);
        assert_eq!(json["pairwise"].as_array().unwrap().len(), 3);
        assert_eq!(json["pairwise"][1]["right"], "marine");
        assert_eq!(json["common"], serde_json::json!(["11H20201"]));
    }

    #[test]
    fn codes_from_product_lines() {
        let data = "\u{feff}#START7777\n\
                    # REG_ID TM_FC TM_EF\n\
                    12A10000,202508280600,202509010000,A02,109,2,1.0,2.0,=\n\
                    12A10000,202508280600,202509011200,A02,109,2,1.0,2.0,=\n\
                    \n\
                    ,202508280600\n\
                    12B20000,202508280600,202509020000,=\n";
        let codes = read_codes(data.as_bytes()).unwrap();
        assert_eq!(codes.into_iter().collect::<Vec<_>>(), vec!["12A10000", "12B20000"]);
    }

    #[test]
    fn load_set_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("land.csv");
        std::fs::write(&path, "11B00000,202508280600\n11B20201,202508280600\n").unwrap();

        let overlap = TaxonomyOverlap::new()
            .load_set("land", &path)
            .unwrap()
            .with_set("temperature", ["11B20201"]);
        assert_eq!(
            overlap.common().into_iter().collect::<Vec<_>>(),
            vec!["11B20201".to_string()]
        );
    }

    #[test]
    fn missing_set_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = TaxonomyOverlap::new()
            .load_set("land", &dir.path().join("absent.csv"))
            .unwrap_err();
        assert!(matches!(err, RegionError::MissingFile { .. }));
    }
}
