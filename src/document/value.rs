use std::cmp::Ordering;

use serde_json::Value;

use super::{DocumentRef, PATH_SEPARATOR};

/// A single field value as the store sees it.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Plain JSON data.
    Scalar(Value),
    /// A string that looks like `collection/id`, not yet resolved.
    Path(String),
    /// A resolved handle to another document.
    Reference(DocumentRef),
}

impl FieldValue {
    /// Tag a raw JSON value. Strings containing `/` become `Path`.
    pub fn classify(value: Value) -> Self {
        match value {
            Value::String(s) if s.contains(PATH_SEPARATOR) => FieldValue::Path(s),
            other => FieldValue::Scalar(other),
        }
    }

    /// Turn a `Path` into a `Reference` when it parses; malformed paths stay plain strings.
    pub fn resolve(self) -> Self {
        match self {
            FieldValue::Path(path) => match DocumentRef::parse(&path) {
                Some(reference) => FieldValue::Reference(reference),
                None => FieldValue::Scalar(Value::String(path)),
            },
            other => other,
        }
    }

    /// Equality used by query filters: numbers compare numerically and a
    /// reference equals its own path string.
    pub fn loosely_eq(&self, other: &FieldValue) -> bool {
        match (self, other) {
            (FieldValue::Scalar(a), FieldValue::Scalar(b)) => scalars_eq(a, b),
            (FieldValue::Reference(a), FieldValue::Reference(b)) => a == b,
            (FieldValue::Reference(r), FieldValue::Path(p))
            | (FieldValue::Path(p), FieldValue::Reference(r)) => r.path() == *p,
            (FieldValue::Reference(r), FieldValue::Scalar(Value::String(s)))
            | (FieldValue::Scalar(Value::String(s)), FieldValue::Reference(r)) => r.path() == *s,
            (FieldValue::Path(a), FieldValue::Path(b)) => a == b,
            (FieldValue::Path(p), FieldValue::Scalar(Value::String(s)))
            | (FieldValue::Scalar(Value::String(s)), FieldValue::Path(p)) => p == s,
            _ => false,
        }
    }
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        FieldValue::classify(value).resolve()
    }
}

impl From<DocumentRef> for FieldValue {
    fn from(reference: DocumentRef) -> Self {
        FieldValue::Reference(reference)
    }
}

pub(crate) fn scalars_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_f64(), y.as_f64()) {
            (Some(x), Some(y)) => x == y,
            _ => x == y,
        },
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| scalars_eq(x, y))
        }
        (Value::Object(xs), Value::Object(ys)) => {
            xs.len() == ys.len()
                && xs
                    .iter()
                    .all(|(k, x)| ys.get(k).is_some_and(|y| scalars_eq(x, y)))
        }
        _ => a == b,
    }
}

/// Borrowed view used for ordering.
pub(crate) enum SortKey<'a> {
    Scalar(&'a Value),
    Path(&'a str),
    Reference(&'a DocumentRef),
}

// null < bool < number < string < reference < array < object
fn rank(key: &SortKey<'_>) -> u8 {
    match key {
        SortKey::Scalar(Value::Null) => 0,
        SortKey::Scalar(Value::Bool(_)) => 1,
        SortKey::Scalar(Value::Number(_)) => 2,
        SortKey::Scalar(Value::String(_)) => 3,
        SortKey::Path(_) | SortKey::Reference(_) => 4,
        SortKey::Scalar(Value::Array(_)) => 5,
        SortKey::Scalar(Value::Object(_)) => 6,
    }
}

pub(crate) fn compare(a: &SortKey<'_>, b: &SortKey<'_>) -> Ordering {
    let by_rank = rank(a).cmp(&rank(b));
    if by_rank != Ordering::Equal {
        return by_rank;
    }
    match (a, b) {
        (SortKey::Scalar(x), SortKey::Scalar(y)) => compare_scalars(x, y),
        _ => reference_path(a).cmp(&reference_path(b)),
    }
}

fn reference_path(key: &SortKey<'_>) -> String {
    match key {
        SortKey::Path(path) => path.to_string(),
        SortKey::Reference(reference) => reference.path(),
        SortKey::Scalar(_) => String::new(),
    }
}

fn compare_scalars(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => {
            let x = x.as_f64().unwrap_or(f64::NAN);
            let y = y.as_f64().unwrap_or(f64::NAN);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Array(xs), Value::Array(ys)) => {
            for (x, y) in xs.iter().zip(ys) {
                let ord = compare(&SortKey::Scalar(x), &SortKey::Scalar(y));
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            xs.len().cmp(&ys.len())
        }
        (Value::Object(xs), Value::Object(ys)) => {
            let mut xs: Vec<_> = xs.iter().collect();
            let mut ys: Vec<_> = ys.iter().collect();
            xs.sort_by(|a, b| a.0.cmp(b.0));
            ys.sort_by(|a, b| a.0.cmp(b.0));
            for ((kx, vx), (ky, vy)) in xs.iter().zip(&ys) {
                let ord = kx
                    .cmp(ky)
                    .then_with(|| compare(&SortKey::Scalar(vx), &SortKey::Scalar(vy)));
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            xs.len().cmp(&ys.len())
        }
        _ => Ordering::Equal,
    }
}
