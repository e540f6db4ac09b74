//! Unified error type for all store operations.

use crate::record::{Collection, CHIRP_TOO_LONG};
use thiserror::Error;

/// Domain rule a record failed before it was assigned an id.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Chirp body is over the byte limit. Displays the fixed client message.
    #[error("{}", CHIRP_TOO_LONG)]
    ChirpTooLong {
        /// Length of the rejected body in bytes.
        len: usize,
    },
}

/// Things that can go wrong when using the store.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Request body could not be parsed into the record's input shape.
    #[error("malformed input: {0}")]
    MalformedInput(String),
    /// Input parsed but broke a domain rule.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// No record with this id in the collection.
    #[error("{collection} record {id} not found")]
    NotFound {
        /// Collection that was searched.
        collection: Collection,
        /// Requested id.
        id: u64,
    },
    /// File system problem (open, read, write, rename).
    #[error("i/o error: {0}")]
    Io(String),
    /// Database file exists but does not hold a valid document.
    #[error("corrupt database file: {0}")]
    Corrupt(String),
    /// Failed to serialize the document to bytes.
    #[error("serialization error: {0}")]
    Serialize(String),
}

impl Error {
    /// `true` when the caller caused the failure and a 4xx response fits.
    /// Everything else is a server-side condition worth logging.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::MalformedInput(_) | Error::Validation(_) | Error::NotFound { .. }
        )
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        if err.is_io() {
            Error::Io(err.to_string())
        } else if err.is_syntax() || err.is_eof() || err.is_data() {
            Error::Corrupt(err.to_string())
        } else {
            Error::Serialize(err.to_string())
        }
    }
}

/// Result alias using our [`Error`] type.
pub type Result<T> = std::result::Result<T, Error>;
