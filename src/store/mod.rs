//! Store drivers - the document database behind a repository.
//!
//! A driver exposes keyed CRUD plus a small query builder over named
//! collections. Repositories only talk to drivers through [`DocumentStore`],
//! so a different backend can be dropped in without touching the layers above.
//!
//! ## Example
//!
//! ```ignore
//! use instant_api::{DocumentStore, InMemoryDocumentStore, StoreQuery};
//!
//! let store = InMemoryDocumentStore::new();
//! let id = store.add("users", fields).await?;
//! let admins = store
//!     .query("users", &StoreQuery::new().where_eq("role", "admin".into()).limit(10))
//!     .await?;
//! ```

mod in_memory;
mod query;

use async_trait::async_trait;
use thiserror::Error;

use crate::document::{Fields, StoredDocument};

pub use in_memory::InMemoryDocumentStore;
pub use query::StoreQuery;

/// Error type for store driver operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The addressed document does not exist (merge-update on a missing key).
    #[error("document not found: {collection}/{id}")]
    NotFound { collection: String, id: String },
    /// The driver rejected the query.
    #[error("invalid query: {0}")]
    InvalidQuery(String),
    /// Internal lock poisoned.
    #[error("store lock poisoned during {0}")]
    LockPoisoned(&'static str),
    /// Backend-level failure (network, permissions, ...).
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Abstract document storage, one namespace per collection.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Store a new document under a generated id and return the id.
    async fn add(&self, collection: &str, fields: Fields) -> Result<String, StoreError>;

    /// Write a document at `id`, replacing whatever was there.
    async fn set(&self, collection: &str, id: &str, fields: Fields) -> Result<(), StoreError>;

    /// Overwrite the given fields of an existing document, leaving the rest.
    /// Fails with `NotFound` when nothing exists at `id`.
    async fn merge(&self, collection: &str, id: &str, fields: Fields) -> Result<(), StoreError>;

    /// Remove the document at `id`. Removing a missing document succeeds.
    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError>;

    /// Get a document by id. Returns None if not found.
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Fields>, StoreError>;

    /// Run a query against one collection.
    async fn query(
        &self,
        collection: &str,
        query: &StoreQuery,
    ) -> Result<Vec<StoredDocument>, StoreError>;
}
