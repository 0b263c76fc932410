//! Flattened CSV output: each source row extended with its nearest
//! candidate from every candidate set.

use std::io::{BufWriter, Write};
use std::path::Path;

use super::{SinkError, create_file};
use crate::matcher::MatchSet;
use crate::sources::{ColumnMap, LoadReport};

const BOM: &[u8] = "\u{feff}".as_bytes();

/// Joins capability tags in the capability column.
const TAG_SEPARATOR: &str = "+";

/// One labelled candidate set's matches, aligned with the source records.
#[derive(Debug, Clone, Copy)]
pub struct FlatSet<'r, 'a> {
    /// Column prefix, e.g. `a` gives `a_STN ID`.
    pub label: &'r str,
    /// Column names used for the candidate's fields.
    pub columns: &'r ColumnMap,
    pub matches: &'r MatchSet<'a>,
}

impl FlatSet<'_, '_> {
    fn headers(&self) -> [String; 6] {
        let l = self.label;
        [
            format!("{l}_{}", self.columns.id),
            format!("{l}_{}", self.columns.name),
            format!("{l}_{}", self.columns.latitude),
            format!("{l}_{}", self.columns.longitude),
            format!(
                "{l}_{}",
                self.columns.capabilities.as_deref().unwrap_or("provides")
            ),
            format!("{l}_distance_km"),
        ]
    }
}

/// Write the source rows with the nearest candidate of each set appended.
///
/// A source row whose set has no candidates gets empty fields. The output
/// starts with a UTF-8 byte order mark.
pub fn write_flat_csv<W: Write>(
    mut writer: W,
    source: &LoadReport,
    sets: &[FlatSet<'_, '_>],
) -> Result<(), SinkError> {
    for set in sets {
        if set.matches.len() != source.records.len() {
            return Err(SinkError::Misaligned {
                records: source.records.len(),
                results: set.matches.len(),
            });
        }
    }

    writer.write_all(BOM)?;
    let mut wtr = csv::Writer::from_writer(writer);

    let mut header: Vec<String> = source.headers.clone();
    for set in sets {
        header.extend(set.headers());
    }
    wtr.write_record(&header)?;

    let mut results: Vec<_> = sets.iter().map(|set| set.matches.iter()).collect();

    for record in &source.records {
        let mut fields: Vec<String> = record.fields.clone();
        fields.resize(source.headers.len(), String::new());

        for row in results.iter_mut() {
            match row.next().and_then(|r| r.nearest()) {
                Some(ranked) => {
                    let point = &ranked.candidate.point;
                    fields.push(point.id().to_string());
                    fields.push(point.name().to_string());
                    fields.push(point.lat().to_string());
                    fields.push(point.lon().to_string());
                    fields.push(ranked.candidate.capabilities.join(TAG_SEPARATOR));
                    fields.push(format!("{:.2}", ranked.distance_km));
                }
                None => fields.extend(std::iter::repeat_n(String::new(), 6)),
            }
        }

        wtr.write_record(&fields)?;
    }

    wtr.flush()?;
    Ok(())
}

/// [`write_flat_csv`] to a file.
pub fn write_flat_csv_file(
    path: &Path,
    source: &LoadReport,
    sets: &[FlatSet<'_, '_>],
) -> Result<(), SinkError> {
    let file = create_file(path)?;
    write_flat_csv(BufWriter::new(file), source, sets)?;
    tracing::info!(
        output = %path.display(),
        rows = source.records.len(),
        sets = sets.len(),
        "wrote flattened CSV"
    );
    Ok(())
}
