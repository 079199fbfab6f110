//! Framework-agnostic request/response types for actions.
//!
//! These types bridge HTTP frameworks and the action set. An adapter fills an
//! `ActionRequest` from whatever its framework hands it and writes the
//! `ActionResponse` status and body back out.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::error::ActionError;
use crate::document::Attributes;
use crate::query::FindOptions;

/// An inbound request, decomposed.
#[derive(Debug, Clone, Default)]
pub struct ActionRequest {
    /// Path identity (`/:id`).
    pub id: Option<String>,
    /// Query mapping (lookup constraints).
    pub query: Attributes,
    /// Read options.
    pub options: FindOptions,
    /// Request body.
    pub body: Value,
}

impl ActionRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_query(mut self, query: Attributes) -> Self {
        self.query = query;
        self
    }

    pub fn with_options(mut self, options: FindOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = body;
        self
    }

    /// The path identity. `MissingParam` if absent or empty.
    pub fn id_param(&self) -> Result<&str, ActionError> {
        match self.id.as_deref() {
            Some(id) if !id.is_empty() => Ok(id),
            _ => Err(ActionError::MissingParam("id")),
        }
    }

    /// The body as a JSON object.
    pub fn body_object(&self) -> Result<Attributes, ActionError> {
        match &self.body {
            Value::Object(object) => Ok(object.clone()),
            _ => Err(ActionError::BadRequest("expected a JSON object body".into())),
        }
    }

    /// The body as an array of JSON objects.
    pub fn body_objects(&self) -> Result<Vec<Attributes>, ActionError> {
        let Value::Array(items) = &self.body else {
            return Err(ActionError::BadRequest("expected a JSON array body".into()));
        };
        items
            .iter()
            .map(|item| match item {
                Value::Object(object) => Ok(object.clone()),
                _ => Err(ActionError::BadRequest(
                    "expected every array item to be a JSON object".into(),
                )),
            })
            .collect()
    }
}

/// The response an action writes back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionResponse {
    /// HTTP-style status code.
    pub status: u16,
    /// Response body. `Null` means an empty body.
    pub body: Value,
}

impl ActionResponse {
    /// Build a success (200) response.
    pub fn ok(body: Value) -> Self {
        Self { status: 200, body }
    }

    /// Build an empty 404 response.
    pub fn not_found() -> Self {
        Self {
            status: 404,
            body: Value::Null,
        }
    }

    /// Build an error response from an `ActionError`.
    pub fn from_error(err: &ActionError) -> Self {
        Self {
            status: err.status_code(),
            body: json!({ "error": err.to_string() }),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

impl From<ActionError> for ActionResponse {
    fn from(err: ActionError) -> Self {
        ActionResponse::from_error(&err)
    }
}
