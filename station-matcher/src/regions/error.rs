use std::path::{Path, PathBuf};

/// Errors loading region tables.
#[derive(Debug, thiserror::Error)]
pub enum RegionError {
    #[error("region file not found: {}", .path.display())]
    MissingFile { path: PathBuf },

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid region mapping: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid region taxonomy: {0}")]
    Csv(#[from] csv::Error),
}

impl RegionError {
    pub(crate) fn from_io(path: &Path, err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            RegionError::MissingFile {
                path: path.to_path_buf(),
            }
        } else {
            RegionError::Io {
                path: path.to_path_buf(),
                source: err,
            }
        }
    }
}
