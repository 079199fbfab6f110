//! A repository whose every operation fails with a chosen error.

use std::sync::Arc;

use instant_api::{
    async_trait, Actions, Attributes, DeleteResult, Document, DocumentRepository, FindOptions,
    InMemoryDocumentStore, Query, Repository, RepositoryError,
};
use serde_json::Value;

pub fn attrs(value: Value) -> Attributes {
    match value {
        Value::Object(object) => object,
        other => panic!("expected a JSON object, got {other}"),
    }
}

pub fn users() -> Arc<DocumentRepository<InMemoryDocumentStore>> {
    Arc::new(DocumentRepository::new(
        Arc::new(InMemoryDocumentStore::new()),
        "users",
    ))
}

pub fn user_actions() -> Actions<DocumentRepository<InMemoryDocumentStore>> {
    Actions::for_repository(users())
}

pub struct BrokenRepository(pub RepositoryError);

#[async_trait]
impl Repository for BrokenRepository {
    async fn create(&self, _: Attributes) -> Result<Document, RepositoryError> {
        Err(self.0.clone())
    }

    async fn create_with_id(&self, _: &str, _: Attributes) -> Result<Document, RepositoryError> {
        Err(self.0.clone())
    }

    async fn create_many(&self, _: Vec<Attributes>) -> Result<Vec<Document>, RepositoryError> {
        Err(self.0.clone())
    }

    async fn find(&self, _: Query, _: FindOptions) -> Result<Vec<Document>, RepositoryError> {
        Err(self.0.clone())
    }

    async fn find_one(
        &self,
        _: Query,
        _: FindOptions,
    ) -> Result<Option<Document>, RepositoryError> {
        Err(self.0.clone())
    }

    async fn find_by_id(
        &self,
        _: &str,
        _: FindOptions,
    ) -> Result<Option<Document>, RepositoryError> {
        Err(self.0.clone())
    }

    async fn update(&self, _: &str, _: Attributes) -> Result<Option<Document>, RepositoryError> {
        Err(self.0.clone())
    }

    async fn update_or_create(
        &self,
        _: Query,
        _: Attributes,
    ) -> Result<Document, RepositoryError> {
        Err(self.0.clone())
    }

    async fn delete(&self, _: &str) -> Result<DeleteResult, RepositoryError> {
        Err(self.0.clone())
    }
}
