//! InMemoryDocumentStore - document store kept in process memory, for testing and development.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use uuid::Uuid;

use super::{DocumentStore, StoreError, StoreQuery};
use crate::document::{Fields, StoredDocument};

type Collection = BTreeMap<String, Fields>;

/// In-memory document store.
///
/// Collections are found by name in a `HashMap`; each collection is a
/// `BTreeMap` keyed by document id, so unordered queries come back sorted by
/// id. Clone-friendly via Arc.
#[derive(Clone, Default)]
pub struct InMemoryDocumentStore {
    collections: Arc<RwLock<HashMap<String, Collection>>>,
}

impl InMemoryDocumentStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn generate_id() -> String {
        Uuid::new_v4().simple().to_string()
    }

    fn write<T>(
        &self,
        operation: &'static str,
        f: impl FnOnce(&mut HashMap<String, Collection>) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut collections = self
            .collections
            .write()
            .map_err(|_| StoreError::LockPoisoned(operation))?;
        f(&mut collections)
    }

    fn read<T>(
        &self,
        operation: &'static str,
        f: impl FnOnce(&HashMap<String, Collection>) -> T,
    ) -> Result<T, StoreError> {
        let collections = self
            .collections
            .read()
            .map_err(|_| StoreError::LockPoisoned(operation))?;
        Ok(f(&collections))
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn add(&self, collection: &str, fields: Fields) -> Result<String, StoreError> {
        self.write("add", |collections| {
            let documents = collections.entry(collection.to_string()).or_default();
            let mut id = Self::generate_id();
            while documents.contains_key(&id) {
                id = Self::generate_id();
            }
            documents.insert(id.clone(), fields);
            Ok(id)
        })
    }

    async fn set(&self, collection: &str, id: &str, fields: Fields) -> Result<(), StoreError> {
        self.write("set", |collections| {
            collections
                .entry(collection.to_string())
                .or_default()
                .insert(id.to_string(), fields);
            Ok(())
        })
    }

    async fn merge(&self, collection: &str, id: &str, fields: Fields) -> Result<(), StoreError> {
        self.write("merge", |collections| {
            let existing = collections
                .get_mut(collection)
                .and_then(|documents| documents.get_mut(id))
                .ok_or_else(|| StoreError::NotFound {
                    collection: collection.to_string(),
                    id: id.to_string(),
                })?;
            existing.extend(fields);
            Ok(())
        })
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        self.write("delete", |collections| {
            if let Some(documents) = collections.get_mut(collection) {
                documents.remove(id);
            }
            Ok(())
        })
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Fields>, StoreError> {
        self.read("get", |collections| {
            collections
                .get(collection)
                .and_then(|documents| documents.get(id))
                .cloned()
        })
    }

    async fn query(
        &self,
        collection: &str,
        query: &StoreQuery,
    ) -> Result<Vec<StoredDocument>, StoreError> {
        query.validate()?;
        let scan = self.read("query", |collections| {
            collections
                .get(collection)
                .map(|documents| {
                    documents
                        .iter()
                        .map(|(id, fields)| StoredDocument {
                            id: id.clone(),
                            fields: fields.clone(),
                        })
                        .collect::<Vec<_>>()
                })
                .unwrap_or_default()
        })?;
        Ok(query.apply(scan))
    }
}
