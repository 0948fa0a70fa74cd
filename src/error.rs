//! Error types for profile compilation and evaluator construction

use thiserror::Error;

/// Result type alias for authorization operations
pub type Result<T> = std::result::Result<T, AuthError>;

/// Errors raised when bad data is introduced at construction or compile
/// time.
///
/// Request-time outcomes (unknown authorization object, attribute value
/// not covered by any grant) are ordinary `false` decisions from
/// [`check`](crate::Authorization::check), never errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Identification was empty at construction
    #[error("identification must be a non-empty string")]
    EmptyIdentity,

    /// Compiled profile was empty at construction
    #[error("profile must contain at least one authorization object")]
    EmptyProfile,

    /// A raw grant arrived without an authorization object name
    #[error("raw grant at position {position} is missing its authorization object")]
    MissingAuthObject { position: usize },

    /// Generic internal error
    #[error("internal error: {message}")]
    Internal { message: String },
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        AuthError::Internal {
            message: err.to_string(),
        }
    }
}
