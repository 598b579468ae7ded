//! Error types

use std::path::PathBuf;

use thiserror::Error;

/// Failures while building or publishing a rank table.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RankTableError {
    #[error("rank data unavailable: {0}")]
    DataUnavailable(String),
    #[error("rank table already loaded")]
    AlreadyLoaded,
}

/// Failures while reading or writing data files.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parse error in {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },
    #[error("serialization error: {0}")]
    Serialize(String),
}

/// Failures parsing calendar input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalendarError {
    #[error("invalid month '{0}', expected YYYY-MM")]
    InvalidMonth(String),
}
