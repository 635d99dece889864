//! Journal errors
//!
//! Validation and write failures surface to the caller; load-time
//! corruption never does (it is logged and degrades to an empty journal).

use thiserror::Error;

use crate::storage::BackendError;

/// Errors returned by the Entry Store
#[derive(Error, Debug)]
pub enum JournalError {
    /// The store configuration breaks one or more rules
    #[error("Invalid configuration: {}", .0.join(" "))]
    ConfigInvalid(Vec<String>),

    /// The submitted entry failed validation
    #[error("Invalid entry: {}", .0.join(" "))]
    EntryInvalid(Vec<String>),

    /// The storage backend rejected a write
    #[error("Could not save the journal under '{key}': {source}")]
    StorageWriteFailed {
        key: String,
        #[source]
        source: BackendError,
    },

    /// An import payload is not a JSON array
    #[error("Import file must contain a JSON array of entries: {0}")]
    ImportMalformed(String),

    /// An import payload held no usable entry
    #[error("No valid entry was found in the import file")]
    ImportEmpty,

    /// Entries could not be encoded as JSON
    #[error("Failed to serialize entries: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl JournalError {
    /// Structured detail messages, empty for kinds that carry none
    pub fn details(&self) -> &[String] {
        match self {
            JournalError::ConfigInvalid(details) | JournalError::EntryInvalid(details) => details,
            _ => &[],
        }
    }
}

/// Result type for journal operations
pub type JournalResult<T> = Result<T, JournalError>;
