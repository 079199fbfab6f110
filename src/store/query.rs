//! StoreQuery - chained equality filters, single-field ordering and a limit.

use crate::document::{field_at, FieldValue, Fields, StoredDocument};
use crate::query::{Filter, Operator};

use super::StoreError;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreQuery {
    filters: Vec<Filter>,
    order_by: Option<String>,
    limit: Option<usize>,
}

impl StoreQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Narrow the query to documents whose `field` equals `value`.
    pub fn where_eq(mut self, field: impl Into<String>, value: FieldValue) -> Self {
        self.filters.push(Filter {
            field: field.into(),
            op: Operator::Equal,
            value,
        });
        self
    }

    /// Append an already-built filter.
    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Order results ascending by `field`.
    pub fn order_by(mut self, field: impl Into<String>) -> Self {
        self.order_by = Some(field.into());
        self
    }

    /// Keep at most `n` results (after ordering).
    pub fn limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }

    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    pub fn ordering(&self) -> Option<&str> {
        self.order_by.as_deref()
    }

    pub fn max_results(&self) -> Option<usize> {
        self.limit
    }

    /// Reject filters or orderings on an empty field name.
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.filters.iter().any(|f| f.field.is_empty()) {
            return Err(StoreError::InvalidQuery("empty filter field".into()));
        }
        if self.order_by.as_deref() == Some("") {
            return Err(StoreError::InvalidQuery("empty order field".into()));
        }
        Ok(())
    }

    /// True if every filter matches.
    pub fn matches(&self, fields: &Fields) -> bool {
        self.filters.iter().all(|filter| filter.matches(fields))
    }

    /// Evaluate the query over an id-ordered scan of a collection.
    pub fn apply(&self, documents: impl IntoIterator<Item = StoredDocument>) -> Vec<StoredDocument> {
        let mut results: Vec<StoredDocument> = documents
            .into_iter()
            .filter(|doc| self.matches(&doc.fields))
            .collect();

        if let Some(field) = &self.order_by {
            results.retain(|doc| field_at(&doc.fields, field).is_some());
            results.sort_by(|a, b| match (field_at(&a.fields, field), field_at(&b.fields, field)) {
                (Some(x), Some(y)) => x.compare(&y),
                _ => std::cmp::Ordering::Equal,
            });
        }

        if let Some(limit) = self.limit {
            results.truncate(limit);
        }
        results
    }
}
