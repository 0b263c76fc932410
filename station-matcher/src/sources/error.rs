//! Point source error types.

use std::path::PathBuf;

/// Errors that abort loading a point source.
///
/// Bad individual records are not errors; loaders skip them and count them
/// in the load report.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// Input file does not exist
    #[error("input file not found: {}", .path.display())]
    MissingFile { path: PathBuf },

    /// Reading the file failed
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// CSV structure could not be read
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// XML document could not be parsed
    #[error("XML parse error in {}: {message}", .path.display())]
    Xml { path: PathBuf, message: String },

    /// A required column is not in the header
    #[error("column {column:?} not found in {}", .path.display())]
    MissingColumn { path: PathBuf, column: String },
}

impl SourceError {
    /// Map an I/O error, turning "not found" into [`SourceError::MissingFile`].
    pub(crate) fn from_io(path: &std::path::Path, err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            SourceError::MissingFile {
                path: path.to_path_buf(),
            }
        } else {
            SourceError::Io {
                path: path.to_path_buf(),
                source: err,
            }
        }
    }
}
