//! Test helpers: attribute builders and a store that fails on demand.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use instant_api::{
    async_trait, Attributes, DocumentRepository, DocumentStore, Fields, InMemoryDocumentStore,
    StoreError, StoreQuery, StoredDocument,
};
use serde_json::Value;

/// Turn a `json!` object into attributes.
pub fn attrs(value: Value) -> Attributes {
    match value {
        Value::Object(object) => object,
        other => panic!("expected a JSON object, got {other}"),
    }
}

pub fn repo(collection: &str) -> DocumentRepository<InMemoryDocumentStore> {
    DocumentRepository::new(Arc::new(InMemoryDocumentStore::new()), collection)
}

/// In-memory store whose operations can be told to start failing.
#[derive(Default)]
pub struct FlakyStore {
    inner: InMemoryDocumentStore,
    // operation -> successes left before it fails
    budgets: Mutex<HashMap<&'static str, usize>>,
}

impl FlakyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every call to `operation` from now on.
    pub fn fail(&self, operation: &'static str) {
        self.fail_after(operation, 0);
    }

    /// Let `operation` succeed `successes` more times, then fail.
    pub fn fail_after(&self, operation: &'static str, successes: usize) {
        self.budgets.lock().unwrap().insert(operation, successes);
    }

    pub fn heal(&self, operation: &'static str) {
        self.budgets.lock().unwrap().remove(operation);
    }

    pub fn inner(&self) -> &InMemoryDocumentStore {
        &self.inner
    }

    fn check(&self, operation: &'static str) -> Result<(), StoreError> {
        let mut budgets = self.budgets.lock().unwrap();
        match budgets.get_mut(operation) {
            Some(0) => Err(StoreError::Unavailable(format!("{operation} is down"))),
            Some(left) => {
                *left -= 1;
                Ok(())
            }
            None => Ok(()),
        }
    }
}

#[async_trait]
impl DocumentStore for FlakyStore {
    async fn add(&self, collection: &str, fields: Fields) -> Result<String, StoreError> {
        self.check("add")?;
        self.inner.add(collection, fields).await
    }

    async fn set(&self, collection: &str, id: &str, fields: Fields) -> Result<(), StoreError> {
        self.check("set")?;
        self.inner.set(collection, id, fields).await
    }

    async fn merge(&self, collection: &str, id: &str, fields: Fields) -> Result<(), StoreError> {
        self.check("merge")?;
        self.inner.merge(collection, id, fields).await
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        self.check("delete")?;
        self.inner.delete(collection, id).await
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Fields>, StoreError> {
        self.check("get")?;
        self.inner.get(collection, id).await
    }

    async fn query(
        &self,
        collection: &str,
        query: &StoreQuery,
    ) -> Result<Vec<StoredDocument>, StoreError> {
        self.check("query")?;
        self.inner.query(collection, query).await
    }
}
