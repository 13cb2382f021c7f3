//! Unified error type for all store operations.

use serde::{Deserialize, Serialize};

/// Things that can go wrong when using a collection.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// No record carries the requested identifier.
    #[error("no record with id {0}")]
    NotFound(String),
    /// The supplied value can't become a record (it isn't a JSON object).
    #[error("record must be a JSON object, got {0}")]
    InvalidRecord(String),
    /// File system problem (read, write, rename).
    #[error("i/o error: {0}")]
    Io(String),
    /// Failed to serialize the collection to bytes.
    #[error("serialization error: {0}")]
    Serialize(String),
    /// Failed to deserialize bytes back into the collection.
    #[error("deserialization error: {0}")]
    Deserialize(String),
    /// Bad configuration (invalid path, policy name, env value, etc.).
    #[error("config error: {0}")]
    Config(String),
}

impl Error {
    /// `true` for a missing identifier.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }

    /// `true` when reading or rewriting the backing file failed. After a
    /// mutating call returns one of these, memory already holds the change
    /// while the file may not.
    pub fn is_persistence(&self) -> bool {
        matches!(self, Error::Io(_) | Error::Serialize(_) | Error::Deserialize(_))
    }

    /// HTTP status an outer layer should answer with.
    pub fn status(&self) -> u16 {
        match self {
            Error::NotFound(_) => 404,
            Error::InvalidRecord(_) => 400,
            Error::Io(_) | Error::Serialize(_) | Error::Deserialize(_) | Error::Config(_) => 500,
        }
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
            Error::Deserialize(err.to_string())
        } else {
            Error::Serialize(err.to_string())
        }
    }
}

/// Result alias using our [`Error`] type.
pub type Result<T> = std::result::Result<T, Error>;

/// JSON error body handed back to API clients: `{"erro": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable message.
    pub erro: String,
}

impl ErrorBody {
    /// Wrap a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            erro: message.into(),
        }
    }
}
