//! actions - request handling on top of the controller/repository chain.
//!
//! An `Actions<R>` set maps decomposed requests (path id, query mapping,
//! options, body) onto controller calls and produces status + body
//! responses. It is framework-agnostic; the `http` feature adds an axum
//! router that mounts one action set as a REST resource.
//!
//! ## Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use instant_api::{ActionRequest, Actions, DocumentRepository, InMemoryDocumentStore};
//! use serde_json::json;
//!
//! let store = Arc::new(InMemoryDocumentStore::new());
//! let actions = Actions::for_repository(Arc::new(DocumentRepository::new(store, "users")));
//!
//! let created = actions
//!     .create(ActionRequest::new().with_body(json!({ "name": "Ada" })))
//!     .await;
//! assert_eq!(created.status, 200);
//!
//! let missing = actions.find_by_id(ActionRequest::new().with_id("nope")).await;
//! assert_eq!(missing.status, 404);
//! ```

mod actions;
mod error;
mod request;

pub use actions::Actions;
pub use error::ActionError;
pub use request::{ActionRequest, ActionResponse};

// HTTP transport (requires "http" feature)
#[cfg(feature = "http")]
mod http;
#[cfg(feature = "http")]
pub use http::router;
