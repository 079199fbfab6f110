//! Controller - the seam between actions and persistence.
//!
//! Every method forwards to the bound repository and returns its outcome
//! unchanged, success or failure. Swapping the repository behind a controller
//! never touches the action layer.

use std::sync::Arc;

use crate::document::{Attributes, Document};
use crate::query::{FindOptions, Query};
use crate::repository::{DeleteResult, Repository, RepositoryError};

pub struct Controller<R: ?Sized> {
    repository: Arc<R>,
}

impl<R: ?Sized> Clone for Controller<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R: Repository + ?Sized> Controller<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub fn repository(&self) -> &Arc<R> {
        &self.repository
    }

    fn trace<T>(
        operation: &'static str,
        result: Result<T, RepositoryError>,
    ) -> Result<T, RepositoryError> {
        if let Err(err) = &result {
            tracing::debug!(operation, error = %err, "controller passing failure through");
        }
        result
    }

    pub async fn create(&self, attributes: Attributes) -> Result<Document, RepositoryError> {
        Self::trace("create", self.repository.create(attributes).await)
    }

    pub async fn create_with_id(
        &self,
        id: &str,
        attributes: Attributes,
    ) -> Result<Document, RepositoryError> {
        Self::trace(
            "create_with_id",
            self.repository.create_with_id(id, attributes).await,
        )
    }

    pub async fn create_many(
        &self,
        items: Vec<Attributes>,
    ) -> Result<Vec<Document>, RepositoryError> {
        Self::trace("create_many", self.repository.create_many(items).await)
    }

    pub async fn find(
        &self,
        query: Query,
        options: FindOptions,
    ) -> Result<Vec<Document>, RepositoryError> {
        Self::trace("find", self.repository.find(query, options).await)
    }

    pub async fn find_one(
        &self,
        query: Query,
        options: FindOptions,
    ) -> Result<Option<Document>, RepositoryError> {
        Self::trace("find_one", self.repository.find_one(query, options).await)
    }

    pub async fn find_by_id(
        &self,
        id: &str,
        options: FindOptions,
    ) -> Result<Option<Document>, RepositoryError> {
        Self::trace("find_by_id", self.repository.find_by_id(id, options).await)
    }

    pub async fn update(
        &self,
        id: &str,
        attributes: Attributes,
    ) -> Result<Option<Document>, RepositoryError> {
        Self::trace("update", self.repository.update(id, attributes).await)
    }

    pub async fn update_or_create(
        &self,
        query: Query,
        attributes: Attributes,
    ) -> Result<Document, RepositoryError> {
        Self::trace(
            "update_or_create",
            self.repository.update_or_create(query, attributes).await,
        )
    }

    pub async fn delete(&self, id: &str) -> Result<DeleteResult, RepositoryError> {
        Self::trace("delete", self.repository.delete(id).await)
    }
}
