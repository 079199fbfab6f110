use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    /// Failure raised by the store driver, passed through unchanged.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// Caller-supplied document id is unusable.
    #[error("invalid document id: {0:?}")]
    InvalidId(String),
    /// The write succeeded but the follow-up read found nothing.
    #[error("document {collection}/{id} missing after write")]
    MissingAfterWrite { collection: String, id: String },
}

impl RepositoryError {
    /// Map this error to an HTTP-style status code.
    pub fn status_code(&self) -> u16 {
        match self {
            RepositoryError::Store(StoreError::NotFound { .. }) => 404,
            RepositoryError::Store(StoreError::InvalidQuery(_)) => 400,
            RepositoryError::Store(StoreError::Unavailable(_)) => 503,
            RepositoryError::Store(StoreError::LockPoisoned(_)) => 500,
            RepositoryError::InvalidId(_) => 400,
            RepositoryError::MissingAfterWrite { .. } => 500,
        }
    }
}
