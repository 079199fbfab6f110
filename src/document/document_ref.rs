use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Fields, PATH_SEPARATOR};
use crate::store::{DocumentStore, StoreError};

/// Handle to a document in a named collection.
///
/// Written as `"<collection>/<id>"`. The collection part may contain further
/// separators for nested collections; the id is always the last segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentRef {
    collection: String,
    id: String,
}

impl DocumentRef {
    pub fn new(collection: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            id: id.into(),
        }
    }

    /// Parse a `collection/id` path. Returns `None` when there is no
    /// separator or any segment is empty.
    pub fn parse(path: &str) -> Option<Self> {
        let (collection, id) = path.rsplit_once(PATH_SEPARATOR)?;
        if id.is_empty() || collection.split(PATH_SEPARATOR).any(str::is_empty) {
            return None;
        }
        Some(Self::new(collection, id))
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Render back to `collection/id`.
    pub fn path(&self) -> String {
        format!("{}{}{}", self.collection, PATH_SEPARATOR, self.id)
    }

    /// Dereference the handle against a store.
    pub async fn get<S: DocumentStore + ?Sized>(
        &self,
        store: &S,
    ) -> Result<Option<Fields>, StoreError> {
        store.get(&self.collection, &self.id).await
    }
}

impl fmt::Display for DocumentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.collection, PATH_SEPARATOR, self.id)
    }
}
