// error.rs — Error types for the domain workflow.
//
// Three families, handled differently by callers:
//   - ValidationError: the submitter can fix it; show it verbatim, no retry.
//   - Not-found: the content is gone; the session falls back to the list.
//   - InvalidTransition: a caller bug; the controller resets to home.
// Store failures pass through untouched.

use paw_records::{AnimalId, StoreError};
use thiserror::Error;

/// A submission broke a field rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A new profile cannot be proposed without a photo.
    #[error("a photo is required when proposing a new animal profile")]
    MissingPhoto,

    #[error("note is {length} characters long; the limit is {limit}")]
    NoteTooLong { length: usize, limit: usize },

    #[error("a location is required")]
    MissingLocation,

    #[error("unknown report category: {0:?}")]
    InvalidCategory(String),

    /// Curator registration without a name.
    #[error("an animal name is required")]
    MissingName,
}

/// Errors returned by registry, intake, timeline and navigation operations.
#[derive(Debug, Error)]
pub enum PawError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The requested animal does not exist.
    #[error("animal not found: {0}")]
    AnimalNotFound(AnimalId),

    /// A selection-list choice matched no option.
    #[error("no animal matches selection {0:?}")]
    UnknownSelection(String),

    /// A navigation request that the state machine does not allow.
    #[error("invalid navigation from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    /// The record store failed; propagated without retry.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A file I/O operation outside the record store failed.
    #[error("I/O error at {path}: {source}")]
    IoError {
        path: String,
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("invalid config at {path}: {source}")]
    ConfigError {
        path: String,
        source: toml::de::Error,
    },
}

impl PawError {
    /// True for the "content unavailable" family.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            PawError::AnimalNotFound(_) | PawError::UnknownSelection(_)
        )
    }

    pub fn validation(&self) -> Option<&ValidationError> {
        match self {
            PawError::Validation(v) => Some(v),
            _ => None,
        }
    }
}
