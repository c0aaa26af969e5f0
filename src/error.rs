//! Error types for engine-facing operations.
//!
//! Pure queries that come back empty (no definition cursor, no comment) are
//! `Option`s, not errors. Errors are reserved for explicit-intent operations:
//! parsing or loading a translation unit, saving it, creating a remapping.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the handle layer.
#[derive(Debug, Error)]
pub enum Error {
    /// The engine rejected the arguments of a parse or configuration call.
    #[error("invalid engine arguments specified")]
    InvalidArguments,

    /// The engine reported a fatal, library-level crash. Never retried.
    #[error("native engine crashed")]
    EngineCrashed,

    /// Loading a serialized AST or diagnostic file failed.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// Saving a translation unit failed.
    #[error("failed to save translation unit: {reason}")]
    SaveFailed { reason: &'static str },

    /// An explicit-intent constructor received a null foreign payload.
    #[error("failed to create {0}")]
    CreateFailed(&'static str),

    /// IO error during a file-backed operation.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error codes reported across the engine boundary, mirroring the foreign
/// `enum CXErrorCode` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    Success = 0,
    Failure = 1,
    Crashed = 2,
    InvalidArguments = 3,
    AstReadError = 4,
}

impl ErrorCode {
    /// Translate a non-success code into the host error taxonomy.
    pub(crate) fn into_error(self, what: &'static str) -> Error {
        match self {
            ErrorCode::Crashed => Error::EngineCrashed,
            ErrorCode::InvalidArguments => Error::InvalidArguments,
            ErrorCode::AstReadError => {
                Error::Deserialization(format!("engine could not read {what}"))
            }
            ErrorCode::Success | ErrorCode::Failure => Error::CreateFailed(what),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_mapping() {
        assert!(matches!(
            ErrorCode::Crashed.into_error("unit"),
            Error::EngineCrashed
        ));
        assert!(matches!(
            ErrorCode::InvalidArguments.into_error("unit"),
            Error::InvalidArguments
        ));
        assert!(matches!(
            ErrorCode::AstReadError.into_error("unit"),
            Error::Deserialization(_)
        ));
        assert!(matches!(
            ErrorCode::Failure.into_error("unit"),
            Error::CreateFailed("unit")
        ));
    }
}
