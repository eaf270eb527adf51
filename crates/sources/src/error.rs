use storage::error::StorageError;
use storage::models::Federation;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SourceError>;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Failed to parse JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Snapshot for {federation} {year} unavailable: {reason}")]
    SnapshotUnavailable {
        federation: Federation,
        year: i32,
        reason: String,
    },

    #[error("Live query failed: {0}")]
    LiveQuery(String),

    #[error("Export failed: {0}")]
    Export(String),
}

impl SourceError {
    pub fn snapshot_unavailable(federation: Federation, year: i32, reason: impl ToString) -> Self {
        Self::SnapshotUnavailable {
            federation,
            year,
            reason: reason.to_string(),
        }
    }

    /// Expected failure that sends the adapter down the live query path.
    pub fn is_snapshot_unavailable(&self) -> bool {
        matches!(self, Self::SnapshotUnavailable { .. })
    }
}
