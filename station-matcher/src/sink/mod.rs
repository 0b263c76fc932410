//! Match result writers.
//!
//! Two layouts: a JSON report keyed by source id listing the top-N nearest
//! candidates, and a flattened CSV carrying the source rows plus the single
//! nearest candidate from each labelled candidate set.
//! [`write_json_file`] writes any other report, such as a region overlap.

mod csv_file;
mod error;
mod json;

use std::fs::File;
use std::path::Path;

pub use csv_file::{FlatSet, write_flat_csv, write_flat_csv_file};
pub use error::SinkError;
pub use json::{JsonReport, NearestEntry, ReportEntry, write_json_file};

/// Create an output file, creating missing parent directories.
pub(crate) fn create_file(path: &Path) -> Result<File, SinkError> {
    let create = || -> std::io::Result<File> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        File::create(path)
    };
    create().map_err(|source| SinkError::Create {
        path: path.to_path_buf(),
        source,
    })
}
