//! Documents - the unit of storage in a collection.
//!
//! A `Document` is what callers see: the store-assigned `id` plus a flat JSON
//! object of fields, with any references already resolved. `Fields` is what
//! the store holds: field values tagged as scalars or document references.
//!
//! ## Example
//!
//! ```ignore
//! use instant_api::{Document, DocumentRef};
//! use serde_json::json;
//!
//! let doc = Document::from_value("u1", json!({ "name": "Ada", "team": "teams/core" }));
//! assert_eq!(doc.id, "u1");
//!
//! let team = DocumentRef::parse("teams/core").unwrap();
//! assert_eq!(team.collection(), "teams");
//! ```

mod document_ref;
mod value;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub use document_ref::DocumentRef;
pub use value::FieldValue;

/// Name of the identity field on every serialized document.
pub const ID_FIELD: &str = "id";

/// Field that keeps a caller-supplied `id` when the store key takes the `id`
/// slot. If the caller also uses it, further `_` are prepended until free.
pub const SHADOWED_ID_FIELD: &str = "_id";

/// Leading character of names reserved for the framework (route segments,
/// shadowed fields). Caller-chosen ids may not start with it.
pub const RESERVED_PREFIX: char = '_';

/// Separator between collection and id in a reference path.
pub const PATH_SEPARATOR: char = '/';

/// Caller-supplied document attributes (insertion ordered).
pub type Attributes = Map<String, Value>;

/// Stored field values of one document, keyed by field name.
pub type Fields = BTreeMap<String, FieldValue>;

/// A document as returned by a repository.
///
/// Serializes as a single flat object with `id` first. `fields` never
/// contains an `id` key; see [`Document::from_fields`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Document {
    /// Build a document from its store key and already-serialized fields.
    ///
    /// A field literally named `id` is moved to `_id` (or `__id`, ... when
    /// taken); the store key wins.
    pub fn from_fields(id: impl Into<String>, mut fields: Map<String, Value>) -> Self {
        if let Some(own_id) = fields.remove(ID_FIELD) {
            let key = shadow_key(&fields);
            fields.insert(key, own_id);
        }
        Self {
            id: id.into(),
            fields,
        }
    }

    /// Build a document from a JSON value. Non-object values yield no fields.
    pub fn from_value(id: impl Into<String>, value: Value) -> Self {
        match value {
            Value::Object(fields) => Self::from_fields(id, fields),
            _ => Self::from_fields(id, Map::new()),
        }
    }

    /// Get a field by name. `"id"` returns the store key.
    pub fn get(&self, field: &str) -> Option<Value> {
        if field == ID_FIELD {
            return Some(Value::String(self.id.clone()));
        }
        self.fields.get(field).cloned()
    }

    /// Convert into a JSON object with `id` first.
    pub fn into_value(self) -> Value {
        let mut object = Map::with_capacity(self.fields.len() + 1);
        object.insert(ID_FIELD.to_string(), Value::String(self.id));
        object.extend(self.fields);
        Value::Object(object)
    }
}

/// First of `_id`, `__id`, ... not already present in `fields`.
fn shadow_key(fields: &Map<String, Value>) -> String {
    let mut key = SHADOWED_ID_FIELD.to_string();
    while fields.contains_key(&key) {
        key.insert(0, RESERVED_PREFIX);
    }
    key
}

/// A stored document as handed back by a driver query.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub id: String,
    pub fields: Fields,
}

/// Look up a possibly dotted field path (`"facebook.id"`) in stored fields.
///
/// The first segment selects a top-level field; further segments descend
/// into nested JSON objects of a scalar value.
pub fn field_at<'a>(fields: &'a Fields, path: &str) -> Option<FieldRef<'a>> {
    if let Some(value) = fields.get(path) {
        return Some(FieldRef::Stored(value));
    }

    let mut segments = path.split('.');
    let head = segments.next()?;
    let FieldValue::Scalar(root) = fields.get(head)? else {
        return None;
    };
    let mut current: &Value = root;
    let mut descended = false;
    for segment in segments {
        current = current.as_object()?.get(segment)?;
        descended = true;
    }
    descended.then_some(FieldRef::Nested(current))
}

/// A borrowed field value, either a top-level stored value or a nested JSON value.
#[derive(Debug, Clone, Copy)]
pub enum FieldRef<'a> {
    Stored(&'a FieldValue),
    Nested(&'a Value),
}

impl FieldRef<'_> {
    /// Equality against a filter value.
    pub fn matches(&self, other: &FieldValue) -> bool {
        match (self, other) {
            (FieldRef::Stored(value), _) => value.loosely_eq(other),
            (FieldRef::Nested(value), FieldValue::Scalar(expected)) => {
                value::scalars_eq(value, expected)
            }
            (FieldRef::Nested(Value::String(s)), FieldValue::Reference(reference)) => {
                reference.path() == *s
            }
            (FieldRef::Nested(Value::String(s)), FieldValue::Path(path)) => path == s,
            (FieldRef::Nested(_), _) => false,
        }
    }

    /// Ordering between two field values of the same path.
    pub fn compare(&self, other: &FieldRef<'_>) -> std::cmp::Ordering {
        value::compare(&self.as_sort_key(), &other.as_sort_key())
    }

    fn as_sort_key(&self) -> value::SortKey<'_> {
        match self {
            FieldRef::Stored(FieldValue::Reference(reference)) => {
                value::SortKey::Reference(reference)
            }
            FieldRef::Stored(FieldValue::Path(path)) => value::SortKey::Path(path),
            FieldRef::Stored(FieldValue::Scalar(value)) => value::SortKey::Scalar(value),
            FieldRef::Nested(value) => value::SortKey::Scalar(value),
        }
    }
}
