//! Error types for actions.

use thiserror::Error;

use crate::repository::RepositoryError;

/// Error type for action operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    /// A required path parameter was not supplied.
    #[error("missing path parameter: {0}")]
    MissingParam(&'static str),
    /// Request payload has the wrong shape.
    #[error("bad request: {0}")]
    BadRequest(String),
    /// Failure from the controller/repository chain.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    /// Result could not be encoded as JSON.
    #[error("encode failed: {0}")]
    Encode(String),
}

impl ActionError {
    /// Map this error to an HTTP-style status code.
    pub fn status_code(&self) -> u16 {
        match self {
            ActionError::MissingParam(_) => 400,
            ActionError::BadRequest(_) => 400,
            ActionError::Repository(err) => err.status_code(),
            ActionError::Encode(_) => 500,
        }
    }
}
