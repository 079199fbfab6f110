pub mod actions;
pub mod config;
pub mod controller;
pub mod document;
pub mod logging;
pub mod query;
pub mod reference;
pub mod repository;
pub mod store;

// Framework wiring (requires "http" feature)
#[cfg(feature = "http")]
mod app;
#[cfg(feature = "http")]
pub mod auth;
#[cfg(feature = "http")]
pub mod cors;
#[cfg(feature = "http")]
pub mod routes;

pub use actions::{ActionError, ActionRequest, ActionResponse, Actions};
pub use config::{AuthConfig, AuthMethod, Config, ConfigError, LoggingConfig, RoutesConfig};
pub use controller::Controller;
pub use document::{Attributes, Document, DocumentRef, FieldValue, Fields, StoredDocument};
pub use logging::{init_logging, LoggingError};
pub use query::{Filter, FindOptions, Operator, Query};
pub use reference::{deserialize_references, ReferenceSerializer, MAX_REFERENCE_DEPTH};
pub use repository::{DeleteResult, DocumentRepository, Repository, RepositoryError};
pub use store::{DocumentStore, InMemoryDocumentStore, StoreError, StoreQuery};

#[cfg(feature = "http")]
pub use app::{serve, InstantApi};
#[cfg(feature = "http")]
pub use auth::Authenticator;
#[cfg(feature = "http")]
pub use routes::Routes;

// Re-export async_trait so custom stores and repositories can implement the traits
pub use async_trait::async_trait;
