//! CSV station loader.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord};
use tracing::{info, warn};

use super::columns::ColumnMap;
use super::error::SourceError;
use super::{LoadReport, PointSource, SourceRecord};
use crate::domain::{Capabilities, DomainError, GeoPoint};

/// Why a single record was skipped.
#[derive(Debug, thiserror::Error)]
enum RecordError {
    #[error("missing value for {0:?}")]
    MissingField(String),

    #[error("{column:?} is not a number: {value:?}")]
    InvalidNumber { column: String, value: String },

    #[error("field {field} is not valid UTF-8")]
    InvalidUtf8 { field: usize },

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Resolved header positions.
struct ColumnIndex {
    id: usize,
    name: usize,
    latitude: usize,
    longitude: usize,
    capabilities: Option<usize>,
}

/// A CSV file of stations.
#[derive(Debug, Clone)]
pub struct CsvSource {
    path: PathBuf,
    columns: ColumnMap,
    provides: Capabilities,
}

impl CsvSource {
    /// Create a source reading `path` with the given column names.
    pub fn new(path: impl Into<PathBuf>, columns: ColumnMap) -> Self {
        Self {
            path: path.into(),
            columns,
            provides: Capabilities::new(),
        }
    }

    /// Tag every record from this file with these capabilities.
    pub fn with_provides(mut self, provides: Capabilities) -> Self {
        self.provides = provides;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PointSource for CsvSource {
    fn load(&self) -> Result<LoadReport, SourceError> {
        let file = File::open(&self.path).map_err(|e| SourceError::from_io(&self.path, e))?;
        let report = read_csv(file, &self.path, &self.columns, &self.provides)?;

        info!(
            source = %self.path.display(),
            records = report.records.len(),
            skipped = report.skipped,
            "loaded CSV stations"
        );

        Ok(report)
    }

    fn describe(&self) -> String {
        format!("CSV {}", self.path.display())
    }
}

/// Read stations from CSV data.
///
/// `origin` only labels errors and log lines. A leading UTF-8 byte order
/// mark on the header is ignored. Rows may be ragged; short rows are padded
/// with empty fields.
pub fn read_csv<R: Read>(
    reader: R,
    origin: &Path,
    columns: &ColumnMap,
    provides: &Capabilities,
) -> Result<LoadReport, SourceError> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_reader(reader);

    let headers: Vec<String> = rdr
        .headers()?
        .iter()
        .enumerate()
        .map(|(i, h)| {
            if i == 0 {
                h.trim_start_matches('\u{feff}').to_string()
            } else {
                h.to_string()
            }
        })
        .collect();

    let index = resolve_columns(&headers, origin, columns)?;

    let mut report = LoadReport {
        headers,
        records: Vec::new(),
        skipped: 0,
    };

    for result in rdr.byte_records() {
        let raw = result?;
        let line = raw.position().map(|p| p.line()).unwrap_or(0);

        let parsed = StringRecord::from_byte_record(raw)
            .map_err(|e| RecordError::InvalidUtf8 {
                field: e.utf8_error().field(),
            })
            .and_then(|record| {
                parse_record(&record, &index, columns, provides, report.headers.len())
            });

        match parsed {
            Ok(parsed) => report.records.push(parsed),
            Err(reason) => {
                warn!(
                    source = %origin.display(),
                    line,
                    %reason,
                    "skipping record"
                );
                report.skipped += 1;
            }
        }
    }

    Ok(report)
}

fn resolve_columns(
    headers: &[String],
    origin: &Path,
    columns: &ColumnMap,
) -> Result<ColumnIndex, SourceError> {
    let find = |column: &str| {
        headers
            .iter()
            .position(|h| h == column)
            .ok_or_else(|| SourceError::MissingColumn {
                path: origin.to_path_buf(),
                column: column.to_string(),
            })
    };

    let capabilities = match &columns.capabilities {
        Some(column) => {
            let found = headers.iter().position(|h| h == column);
            if found.is_none() {
                warn!(
                    source = %origin.display(),
                    column = %column,
                    "capability column not present, using static tags only"
                );
            }
            found
        }
        None => None,
    };

    Ok(ColumnIndex {
        id: find(&columns.id)?,
        name: find(&columns.name)?,
        latitude: find(&columns.latitude)?,
        longitude: find(&columns.longitude)?,
        capabilities,
    })
}

fn parse_record(
    record: &StringRecord,
    index: &ColumnIndex,
    columns: &ColumnMap,
    provides: &Capabilities,
    width: usize,
) -> Result<SourceRecord, RecordError> {
    let id = required(record, index.id, &columns.id)?;
    let name = record.get(index.name).map(str::trim).unwrap_or_default();
    let lat = number(record, index.latitude, &columns.latitude)?;
    let lon = number(record, index.longitude, &columns.longitude)?;

    let point = GeoPoint::parse(id, name, lat, lon)?;

    let mut capabilities = provides.clone();
    if let Some(idx) = index.capabilities {
        let listed = Capabilities::parse_list(record.get(idx).unwrap_or_default());
        capabilities.extend_from(&listed);
    }

    let mut fields: Vec<String> = record.iter().map(str::to_string).collect();
    if fields.len() < width {
        fields.resize(width, String::new());
    }

    Ok(SourceRecord {
        point,
        capabilities,
        fields,
    })
}

fn required<'r>(record: &'r StringRecord, idx: usize, column: &str) -> Result<&'r str, RecordError> {
    record
        .get(idx)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| RecordError::MissingField(column.to_string()))
}

fn number(record: &StringRecord, idx: usize, column: &str) -> Result<f64, RecordError> {
    let value = required(record, idx, column)?;
    value.parse::<f64>().map_err(|_| RecordError::InvalidNumber {
        column: column.to_string(),
        value: value.to_string(),
    })
}
