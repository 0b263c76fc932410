use std::path::PathBuf;

/// Errors writing match results.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("failed to create {}: {source}", .path.display())]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("write failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV write failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON write failed: {0}")]
    Json(#[from] serde_json::Error),

    /// The match set does not line up with the source records.
    #[error("{records} source records but {results} match results")]
    Misaligned { records: usize, results: usize },
}
