//! DocumentRepository - the `Repository` contract over any `DocumentStore`.

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::try_join_all;

use super::error::RepositoryError;
use super::repository::{DeleteResult, Repository};
use crate::document::{Attributes, Document, Fields, PATH_SEPARATOR, RESERVED_PREFIX};
use crate::query::{FindOptions, Query};
use crate::reference::{deserialize_references, flatten_references, ReferenceSerializer};
use crate::store::{DocumentStore, StoreError};

/// Caller-chosen ids must be non-empty, fit in one path segment and not
/// start with the reserved `_` prefix.
fn is_valid_id(id: &str) -> bool {
    !id.is_empty() && !id.contains(PATH_SEPARATOR) && !id.starts_with(RESERVED_PREFIX)
}

/// Repository bound to one collection of a store.
///
/// Holds no document state: every read goes back to the store.
pub struct DocumentRepository<S: ?Sized> {
    store: Arc<S>,
    collection: String,
}

impl<S: ?Sized> Clone for DocumentRepository<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            collection: self.collection.clone(),
        }
    }
}

impl<S: DocumentStore + ?Sized> DocumentRepository<S> {
    pub fn new(store: Arc<S>, collection: impl Into<String>) -> Self {
        Self {
            store,
            collection: collection.into(),
        }
    }

    /// The collection this repository is bound to.
    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    fn logged<T>(
        &self,
        operation: &'static str,
        result: Result<T, RepositoryError>,
    ) -> Result<T, RepositoryError> {
        if let Err(err) = &result {
            tracing::error!(
                collection = %self.collection,
                operation,
                error = %err,
                "repository operation failed"
            );
        }
        result
    }

    async fn serialize(
        &self,
        id: &str,
        fields: &Fields,
        options: &FindOptions,
    ) -> Result<Document, StoreError> {
        if options.resolve_references {
            ReferenceSerializer::new(&*self.store)
                .serialize_references(id, fields)
                .await
        } else {
            Ok(flatten_references(id, fields))
        }
    }

    async fn read_by_id(
        &self,
        id: &str,
        options: &FindOptions,
    ) -> Result<Option<Document>, RepositoryError> {
        match self.store.get(&self.collection, id).await? {
            Some(fields) => Ok(Some(self.serialize(id, &fields, options).await?)),
            None => Ok(None),
        }
    }

    // Re-read after a write so callers see exactly what `find_by_id` returns.
    async fn read_back(&self, id: &str) -> Result<Document, RepositoryError> {
        self.read_by_id(id, &FindOptions::default())
            .await?
            .ok_or_else(|| RepositoryError::MissingAfterWrite {
                collection: self.collection.clone(),
                id: id.to_string(),
            })
    }

    async fn insert(&self, attributes: Attributes) -> Result<Document, RepositoryError> {
        let fields = deserialize_references(attributes);
        let id = self.store.add(&self.collection, fields).await?;
        tracing::debug!(collection = %self.collection, %id, "document created");
        self.read_back(&id).await
    }

    async fn insert_with_id(
        &self,
        id: &str,
        attributes: Attributes,
    ) -> Result<Document, RepositoryError> {
        if !is_valid_id(id) {
            return Err(RepositoryError::InvalidId(id.to_string()));
        }
        let fields = deserialize_references(attributes);
        self.store.set(&self.collection, id, fields).await?;
        self.read_back(id).await
    }

    async fn insert_many(&self, items: Vec<Attributes>) -> Result<Vec<Document>, RepositoryError> {
        let mut documents = Vec::with_capacity(items.len());
        for attributes in items {
            documents.push(self.insert(attributes).await?);
        }
        Ok(documents)
    }

    async fn search(
        &self,
        query: &Query,
        options: &FindOptions,
    ) -> Result<Vec<Document>, RepositoryError> {
        let results = self
            .store
            .query(&self.collection, &query.to_store_query(options))
            .await?;
        let documents = try_join_all(
            results
                .iter()
                .map(|doc| self.serialize(&doc.id, &doc.fields, options)),
        )
        .await?;
        Ok(documents)
    }

    async fn search_one(
        &self,
        query: &Query,
        options: FindOptions,
    ) -> Result<Option<Document>, RepositoryError> {
        let options = FindOptions {
            limit: Some(1),
            ..options
        };
        Ok(self.search(query, &options).await?.into_iter().next())
    }

    async fn merge(
        &self,
        id: &str,
        attributes: Attributes,
    ) -> Result<Option<Document>, RepositoryError> {
        let fields = deserialize_references(attributes);
        match self.store.merge(&self.collection, id, fields).await {
            Ok(()) => {}
            Err(StoreError::NotFound { .. }) => return Ok(None),
            Err(err) => return Err(err.into()),
        }
        self.read_by_id(id, &FindOptions::default()).await
    }

    async fn upsert(
        &self,
        query: &Query,
        attributes: Attributes,
    ) -> Result<Document, RepositoryError> {
        if let Some(existing) = self.search_one(query, FindOptions::default()).await? {
            // Deleted between lookup and merge: fall through to create.
            if let Some(updated) = self.merge(&existing.id, attributes.clone()).await? {
                return Ok(updated);
            }
        }
        self.insert(attributes).await
    }

    async fn remove(&self, id: &str) -> Result<DeleteResult, RepositoryError> {
        let existed = self.store.get(&self.collection, id).await?.is_some();
        self.store.delete(&self.collection, id).await?;
        Ok(DeleteResult { deleted: existed })
    }
}

#[async_trait]
impl<S: DocumentStore + ?Sized> Repository for DocumentRepository<S> {
    async fn create(&self, attributes: Attributes) -> Result<Document, RepositoryError> {
        let result = self.insert(attributes).await;
        self.logged("create", result)
    }

    async fn create_with_id(
        &self,
        id: &str,
        attributes: Attributes,
    ) -> Result<Document, RepositoryError> {
        let result = self.insert_with_id(id, attributes).await;
        self.logged("create_with_id", result)
    }

    async fn create_many(&self, items: Vec<Attributes>) -> Result<Vec<Document>, RepositoryError> {
        let result = self.insert_many(items).await;
        self.logged("create_many", result)
    }

    async fn find(
        &self,
        query: Query,
        options: FindOptions,
    ) -> Result<Vec<Document>, RepositoryError> {
        let result = self.search(&query, &options).await;
        self.logged("find", result)
    }

    async fn find_one(
        &self,
        query: Query,
        options: FindOptions,
    ) -> Result<Option<Document>, RepositoryError> {
        let result = self.search_one(&query, options).await;
        self.logged("find_one", result)
    }

    async fn find_by_id(
        &self,
        id: &str,
        options: FindOptions,
    ) -> Result<Option<Document>, RepositoryError> {
        let result = self.read_by_id(id, &options).await;
        self.logged("find_by_id", result)
    }

    async fn update(
        &self,
        id: &str,
        attributes: Attributes,
    ) -> Result<Option<Document>, RepositoryError> {
        let result = self.merge(id, attributes).await;
        self.logged("update", result)
    }

    async fn update_or_create(
        &self,
        query: Query,
        attributes: Attributes,
    ) -> Result<Document, RepositoryError> {
        let result = self.upsert(&query, attributes).await;
        self.logged("update_or_create", result)
    }

    async fn delete(&self, id: &str) -> Result<DeleteResult, RepositoryError> {
        let result = self.remove(id).await;
        self.logged("delete", result)
    }
}
