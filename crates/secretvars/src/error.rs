//! Store errors

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by [`SecretsStore`](crate::SecretsStore) operations
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Secrets path is a directory, not a file: {0}")]
    InvalidPath(PathBuf),

    #[error("Corrupt secrets file {path}: {reason}")]
    CorruptStore { path: PathBuf, reason: String },

    #[error("Invalid key: key cannot be empty")]
    InvalidKey,

    #[error("Variable has no value: {0}")]
    MissingValue(String),

    #[error("Failed to read value for '{key}'")]
    ReadFailed {
        key: String,
        #[source]
        source: io::Error,
    },

    #[error("IO error on {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn corrupt(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        StoreError::CorruptStore {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
