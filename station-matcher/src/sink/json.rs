//! Keyed JSON match report.

use std::collections::HashSet;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::{Serialize, Serializer};
use tracing::warn;

use super::{SinkError, create_file};
use crate::domain::Capabilities;
use crate::matcher::{MatchSet, RankedCandidate};
use crate::regions::RegionMatch;

/// One nearby candidate in a report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NearestEntry {
    pub station_id: String,
    pub name: String,
    /// Rounded to two decimals.
    pub distance_km: f64,
    pub latitude: f64,
    pub longitude: f64,
    pub provides: Capabilities,
}

impl From<&RankedCandidate<'_>> for NearestEntry {
    fn from(ranked: &RankedCandidate<'_>) -> Self {
        let point = &ranked.candidate.point;
        Self {
            station_id: point.id().to_string(),
            name: point.name().to_string(),
            distance_km: round2(ranked.distance_km),
            latitude: point.lat(),
            longitude: point.lon(),
            provides: ranked.candidate.capabilities.clone(),
        }
    }
}

/// Report entry for one source point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportEntry {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    /// The marine forecast zone the source itself names, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marine_reg_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<RegionMatch>,
    pub nearest: Vec<NearestEntry>,
}

/// Match results keyed by source id, in source order.
///
/// Serializes as a JSON object. When several source points share an id,
/// only the first is reported.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JsonReport {
    entries: Vec<(String, ReportEntry)>,
}

impl JsonReport {
    pub fn from_matches(matches: &MatchSet<'_>) -> Self {
        let mut seen = HashSet::new();
        let mut entries = Vec::with_capacity(matches.len());

        for result in matches {
            let source = result.source();
            let key = source.id().to_string();
            if !seen.insert(key.clone()) {
                warn!(source = %key, "duplicate source id, keeping first");
                continue;
            }
            entries.push((
                key,
                ReportEntry {
                    name: source.name().to_string(),
                    latitude: source.lat(),
                    longitude: source.lon(),
                    marine_reg_name: None,
                    region: None,
                    nearest: result.matches().iter().map(NearestEntry::from).collect(),
                },
            ));
        }

        Self { entries }
    }

    /// Attach a region resolution to each entry.
    pub fn resolve_regions<F>(&mut self, mut resolve: F)
    where
        F: FnMut(&str, &ReportEntry) -> Option<RegionMatch>,
    {
        for (key, entry) in &mut self.entries {
            entry.region = resolve(key, entry);
        }
    }

    /// Set each entry's marine zone name. Blank names are dropped.
    pub fn attach_marine_regions<F>(&mut self, mut lookup: F)
    where
        F: FnMut(&str) -> Option<String>,
    {
        for (key, entry) in &mut self.entries {
            entry.marine_reg_name = lookup(key)
                .map(|name| name.trim().to_string())
                .filter(|name| !name.is_empty());
        }
    }

    pub fn get(&self, id: &str) -> Option<&ReportEntry> {
        self.entries.iter().find(|(k, _)| k == id).map(|(_, e)| e)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ReportEntry)> {
        self.entries.iter().map(|(k, e)| (k.as_str(), e))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Write pretty-printed JSON.
    pub fn write_to<W: Write>(&self, writer: W) -> Result<(), SinkError> {
        write_pretty(writer, self)
    }

    pub fn write_file(&self, path: &Path) -> Result<(), SinkError> {
        write_json_file(path, self)?;
        tracing::info!(output = %path.display(), entries = self.len(), "wrote JSON report");
        Ok(())
    }
}

/// Write any serializable value to `path` as pretty-printed JSON.
pub fn write_json_file<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), SinkError> {
    write_pretty(BufWriter::new(create_file(path)?), value)
}

fn write_pretty<W: Write, T: Serialize + ?Sized>(mut writer: W, value: &T) -> Result<(), SinkError> {
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

impl Serialize for JsonReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.entries.iter().map(|(k, e)| (k, e)))
    }
}

fn round2(km: f64) -> f64 {
    (km * 100.0).round() / 100.0
}
