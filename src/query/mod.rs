//! Queries - equality constraints normalized into ordered filter triples.
//!
//! A caller query is a JSON object of `field -> value`. It is normalized into
//! `(field, ==, value)` triples in key order; each triple narrows the result,
//! so the whole query is a conjunction.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::document::{field_at, Attributes, FieldValue, Fields};
use crate::store::StoreQuery;

/// Comparison operator of a filter. Only equality is supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Equal,
}

/// One `(field, operator, value)` triple.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub field: String,
    pub op: Operator,
    pub value: FieldValue,
}

impl Filter {
    pub fn matches(&self, fields: &Fields) -> bool {
        match self.op {
            Operator::Equal => field_at(fields, &self.field)
                .is_some_and(|actual| actual.matches(&self.value)),
        }
    }
}

/// A normalized conjunctive query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    filters: Vec<Filter>,
}

impl Query {
    /// The empty query, matching every document.
    pub fn all() -> Self {
        Self::default()
    }

    /// Normalize a query object. Values that look like `collection/id` paths
    /// are resolved to references so they match stored references.
    pub fn from_object(object: Attributes) -> Self {
        let filters = object
            .into_iter()
            .map(|(field, value)| Filter {
                field,
                op: Operator::Equal,
                value: FieldValue::from(value),
            })
            .collect();
        Self { filters }
    }

    /// Add an equality constraint.
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push(Filter {
            field: field.into(),
            op: Operator::Equal,
            value: FieldValue::from(value.into()),
        });
        self
    }

    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Build the driver query for this constraint set and options.
    pub fn to_store_query(&self, options: &FindOptions) -> StoreQuery {
        let mut query = self
            .filters
            .iter()
            .cloned()
            .fold(StoreQuery::new(), StoreQuery::filter);
        if let Some(field) = &options.order_by {
            query = query.order_by(field.clone());
        }
        if let Some(limit) = options.limit {
            query = query.limit(limit);
        }
        query
    }
}

impl From<Attributes> for Query {
    fn from(object: Attributes) -> Self {
        Self::from_object(object)
    }
}

/// Read options shared by `find`, `find_one` and `find_by_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FindOptions {
    /// Order ascending by this field.
    pub order_by: Option<String>,
    /// Keep at most this many results.
    pub limit: Option<usize>,
    /// Resolve references into nested documents (default true).
    pub resolve_references: bool,
}

impl Default for FindOptions {
    fn default() -> Self {
        Self {
            order_by: None,
            limit: None,
            resolve_references: true,
        }
    }
}

impl FindOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn order_by(mut self, field: impl Into<String>) -> Self {
        self.order_by = Some(field.into());
        self
    }

    pub fn limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }

    /// Leave references as `collection/id` strings.
    pub fn shallow(mut self) -> Self {
        self.resolve_references = false;
        self
    }
}
