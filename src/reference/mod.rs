//! Reference (de)serialization.
//!
//! On the way in, attribute strings that look like `collection/id` become
//! document handles. On the way out, handles are dereferenced and replaced by
//! the serialized target document, recursively, so callers get populated
//! objects instead of paths.

use futures::future::{try_join_all, BoxFuture, FutureExt};
use serde_json::{Map, Value};

use crate::document::{Attributes, Document, FieldValue, Fields};
use crate::store::{DocumentStore, StoreError};

/// How many reference hops are followed before a handle is left as its path.
pub const MAX_REFERENCE_DEPTH: usize = 8;

/// Convert caller attributes into stored fields, resolving path strings into
/// references. Malformed paths stay plain strings.
pub fn deserialize_references(attributes: Attributes) -> Fields {
    attributes
        .into_iter()
        .map(|(field, value)| (field, FieldValue::from(value)))
        .collect()
}

/// Serializes stored documents for callers, dereferencing handles through the store.
pub struct ReferenceSerializer<'a, S: ?Sized> {
    store: &'a S,
    max_depth: usize,
}

impl<'a, S: DocumentStore + ?Sized> ReferenceSerializer<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            max_depth: MAX_REFERENCE_DEPTH,
        }
    }

    /// Follow at most `depth` hops. Zero leaves every reference as a path string.
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Serialize one stored document, resolving its references.
    pub async fn serialize_references(
        &self,
        id: &str,
        fields: &Fields,
    ) -> Result<Document, StoreError> {
        self.serialize_at(id, fields, 0).await
    }

    /// Serialize a single field value. A reference is replaced by its target
    /// document, or `null` when the target does not exist.
    pub async fn serialize_reference(&self, value: &FieldValue) -> Result<Value, StoreError> {
        self.value_at(value, 0).await
    }

    fn serialize_at<'b>(
        &'b self,
        id: &'b str,
        fields: &'b Fields,
        depth: usize,
    ) -> BoxFuture<'b, Result<Document, StoreError>>
    where
        'a: 'b,
    {
        async move {
            let values = try_join_all(fields.values().map(|value| self.value_at(value, depth))).await?;
            let object: Map<String, Value> = fields.keys().cloned().zip(values).collect();
            Ok(Document::from_fields(id, object))
        }
        .boxed()
    }

    fn value_at<'b>(
        &'b self,
        value: &'b FieldValue,
        depth: usize,
    ) -> BoxFuture<'b, Result<Value, StoreError>>
    where
        'a: 'b,
    {
        async move {
            match value {
                FieldValue::Scalar(value) => Ok(value.clone()),
                FieldValue::Path(path) => Ok(Value::String(path.clone())),
                FieldValue::Reference(reference) if depth >= self.max_depth => {
                    Ok(Value::String(reference.path()))
                }
                FieldValue::Reference(reference) => match reference.get(self.store).await? {
                    Some(target) => {
                        let document = self.serialize_at(reference.id(), &target, depth + 1).await?;
                        Ok(document.into_value())
                    }
                    None => Ok(Value::Null),
                },
            }
        }
        .boxed()
    }
}

/// Render stored fields without touching the store: references become paths.
pub fn flatten_references(id: &str, fields: &Fields) -> Document {
    let object = fields
        .iter()
        .map(|(field, value)| {
            let value = match value {
                FieldValue::Scalar(value) => value.clone(),
                FieldValue::Path(path) => Value::String(path.clone()),
                FieldValue::Reference(reference) => Value::String(reference.path()),
            };
            (field.clone(), value)
        })
        .collect();
    Document::from_fields(id, object)
}
