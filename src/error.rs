//! Error types for pathgraph

use thiserror::Error;

/// Result type alias for pathgraph operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in pathgraph operations
///
/// A path or value that is simply not there is never an error: lookups and
/// removals report absence with `None`.
#[derive(Error, Debug)]
pub enum Error {
    /// A value could not be converted to or from its structured form
    #[error("Translation error: {0}")]
    Translation(String),

    /// A required input was absent and the receiver does not accept absence
    #[error("Null argument: {0}")]
    NullArgument(String),

    /// A cursor was driven out of sequence
    #[error("Illegal state: {0}")]
    IllegalState(String),

    /// The operation is permanently unsupported by the receiver
    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    /// The backing tree changed underneath a cursor
    #[error("Concurrent modification: expected stamp {expected}, found {found}")]
    ConcurrentModification { expected: u64, found: u64 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("Invalid hash: {0}")]
    InvalidHash(String),

    #[error("Corruption detected: {0}")]
    Corruption(String),

    #[error("Invalid database file: {0}")]
    InvalidFile(String),

    #[error("Version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },

    #[error("Config error: {0}")]
    Config(String),
}

/// Coarse classification of an [`Error`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Translation,
    NullArgument,
    IllegalState,
    Unsupported,
    ConcurrentModification,
    Storage,
}

impl Error {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Translation(_) | Error::Json(_) => ErrorKind::Translation,
            Error::NullArgument(_) => ErrorKind::NullArgument,
            Error::IllegalState(_) => ErrorKind::IllegalState,
            Error::Unsupported(_) => ErrorKind::Unsupported,
            Error::ConcurrentModification { .. } => ErrorKind::ConcurrentModification,
            Error::Io(_)
            | Error::Serialization(_)
            | Error::NotFound(_)
            | Error::InvalidHash(_)
            | Error::Corruption(_)
            | Error::InvalidFile(_)
            | Error::VersionMismatch { .. }
            | Error::Config(_) => ErrorKind::Storage,
        }
    }

    pub(crate) fn translation(msg: impl Into<String>) -> Self {
        Error::Translation(msg.into())
    }

    pub(crate) fn null_argument(msg: impl Into<String>) -> Self {
        Error::NullArgument(msg.into())
    }

    pub(crate) fn unsupported(msg: impl Into<String>) -> Self {
        Error::Unsupported(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds_are_distinct() {
        let kinds = [
            Error::translation("x").kind(),
            Error::null_argument("x").kind(),
            Error::IllegalState("x".into()).kind(),
            Error::unsupported("x").kind(),
        ];
        for (i, a) in kinds.iter().enumerate() {
            for b in &kinds[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_json_error_is_translation() {
        let err: Error = serde_json::from_str::<serde_json::Value>("{").unwrap_err().into();
        assert_eq!(err.kind(), ErrorKind::Translation);
    }
}
