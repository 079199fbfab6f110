mod document_repository;
mod error;
mod repository;

pub use document_repository::DocumentRepository;
pub use error::RepositoryError;
pub use repository::{DeleteResult, Repository};
