use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::error::RepositoryError;
use crate::document::{Attributes, Document};
use crate::query::{FindOptions, Query};

/// Outcome of a delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteResult {
    pub deleted: bool,
}

/// CRUD and query operations over one collection of documents.
///
/// Read-style operations report "no such document" as `None` (or an empty
/// `Vec`), never as an error.
#[async_trait]
pub trait Repository: Send + Sync {
    /// Store a new document under a store-generated id and return it as a
    /// fresh read would.
    async fn create(&self, attributes: Attributes) -> Result<Document, RepositoryError>;

    /// Store a document at `id`, fully replacing any existing one.
    ///
    /// Fails with `InvalidId` when `id` is empty, contains `/` or starts
    /// with `_`.
    async fn create_with_id(
        &self,
        id: &str,
        attributes: Attributes,
    ) -> Result<Document, RepositoryError>;

    /// Create each item in order. The first failure aborts the rest; items
    /// created before it stay created.
    async fn create_many(&self, items: Vec<Attributes>) -> Result<Vec<Document>, RepositoryError>;

    /// All documents matching every constraint of `query`.
    async fn find(&self, query: Query, options: FindOptions)
        -> Result<Vec<Document>, RepositoryError>;

    /// First document matching `query`.
    async fn find_one(
        &self,
        query: Query,
        options: FindOptions,
    ) -> Result<Option<Document>, RepositoryError>;

    /// Direct key lookup.
    async fn find_by_id(
        &self,
        id: &str,
        options: FindOptions,
    ) -> Result<Option<Document>, RepositoryError>;

    /// Merge `attributes` into the document at `id`. `None` if it does not exist.
    async fn update(
        &self,
        id: &str,
        attributes: Attributes,
    ) -> Result<Option<Document>, RepositoryError>;

    /// Update the first match of `query`, or create a new document.
    ///
    /// The lookup and the write are separate round-trips: two concurrent
    /// callers can both miss and both create.
    async fn update_or_create(
        &self,
        query: Query,
        attributes: Attributes,
    ) -> Result<Document, RepositoryError>;

    /// Remove the document at `id`.
    async fn delete(&self, id: &str) -> Result<DeleteResult, RepositoryError>;
}
