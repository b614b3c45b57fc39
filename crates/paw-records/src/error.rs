// error.rs — Error types for the record store.
//
// Every variant is an infrastructure failure. Validation never happens at
// this layer; the domain crate rejects bad input before it reaches a store.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading or appending records.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Failed to open or create a record log file.
    #[error("failed to open record log at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to read back an existing record log.
    #[error("failed to read record log at {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to write a record to its log.
    #[error("failed to append record: {0}")]
    WriteFailed(#[from] std::io::Error),

    /// A record could not be serialized, or a log line is malformed JSON.
    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// A record log was edited after the fact — its hash chain is broken.
    #[error(
        "integrity check failed in {path} at line {line}: expected hash {expected}, got {actual}"
    )]
    IntegrityViolation {
        path: PathBuf,
        line: usize,
        expected: String,
        actual: String,
    },

    /// Another writer panicked while holding the store lock.
    #[error("record store lock poisoned")]
    Poisoned,
}
