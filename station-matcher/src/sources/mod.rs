//! Point source loaders.
//!
//! Turns flat files (CSV exports and the tide gauge XML listing) into
//! validated [`GeoPoint`]s. A missing file or a missing required column
//! stops the load; a record with an unusable id or coordinate is skipped
//! with a warning and counted.

mod columns;
mod csv_file;
mod error;
mod xml_file;

use crate::domain::{Capabilities, GeoPoint};
use crate::matcher::CandidateSet;

pub use columns::{ColumnMap, ColumnPreset, ColumnSpec};
pub use csv_file::{CsvSource, read_csv};
pub use error::SourceError;
pub use xml_file::{MARINE_REGION_FIELD, XmlSource, read_xml};

/// One usable record from a source file.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceRecord {
    pub point: GeoPoint,
    pub capabilities: Capabilities,
    /// The raw field values, aligned with [`LoadReport::headers`].
    pub fields: Vec<String>,
}

/// Everything a loader read from one file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    pub headers: Vec<String>,
    pub records: Vec<SourceRecord>,
    /// Number of records dropped because they could not be used.
    pub skipped: usize,
}

impl LoadReport {
    /// Points in file order.
    pub fn points(&self) -> impl Iterator<Item = &GeoPoint> {
        self.records.iter().map(|r| &r.point)
    }

    /// Build a candidate set from this file's records.
    pub fn to_candidates(&self) -> CandidateSet {
        candidates_from(std::slice::from_ref(self))
    }
}

/// Merge the records of several loads into one candidate set.
///
/// Reports are merged in order; a station id seen again keeps its first
/// name and coordinates and gains the later record's capability tags.
pub fn candidates_from(reports: &[LoadReport]) -> CandidateSet {
    reports
        .iter()
        .flat_map(|r| r.records.iter())
        .map(|r| (r.point.clone(), r.capabilities.clone()))
        .collect()
}

/// Something that can produce station records.
///
/// This abstraction lets a run be driven from any file format, and lets
/// tests supply records directly.
pub trait PointSource {
    /// Read every record.
    fn load(&self) -> Result<LoadReport, SourceError>;

    /// Human-readable description for logs.
    fn describe(&self) -> String;
}
