//! Bootstrap: one configuration in, ready-made middleware and routers out.
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use instant_api::{Config, InMemoryDocumentStore, InstantApi};
//!
//! let config = Config::from_file("config.json")?;
//! let api = InstantApi::new(config, Arc::new(InMemoryDocumentStore::new()));
//! api.init_logging()?;
//! api.serve().await?;
//! ```

use std::sync::Arc;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::Authenticator;
use crate::config::Config;
use crate::cors;
use crate::logging::{self, LoggingError};
use crate::repository::DocumentRepository;
use crate::routes::Routes;
use crate::store::DocumentStore;

pub struct InstantApi<S: ?Sized> {
    config: Config,
    store: Arc<S>,
}

impl<S: DocumentStore + ?Sized + 'static> InstantApi<S> {
    pub fn new(config: Config, store: Arc<S>) -> Self {
        Self { config, store }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Install the global logger for this configuration.
    pub fn init_logging(&self) -> Result<(), LoggingError> {
        logging::init_logging(&self.config.logging, self.config.is_production())
    }

    pub fn cors(&self) -> CorsLayer {
        cors::layer()
    }

    pub fn auth(&self) -> Authenticator {
        Authenticator::from_config(&self.config.auth)
    }

    /// Configured resource routes; add custom mounts before assembling.
    pub fn routes(&self) -> Routes<S> {
        Routes::new(Arc::clone(&self.store), self.config.routes.clone())
    }

    /// A repository over `collection` of the shared store.
    pub fn repository(&self, collection: &str) -> DocumentRepository<S> {
        DocumentRepository::new(Arc::clone(&self.store), collection)
    }

    /// Wrap routes with auth, CORS and request tracing.
    pub fn assemble(&self, routes: Routes<S>) -> Router {
        self.auth()
            .apply(routes.into_router())
            .layer(self.cors())
            .layer(TraceLayer::new_for_http())
    }

    /// The fully assembled application router.
    pub fn router(&self) -> Router {
        self.assemble(self.routes())
    }

    /// Serve the application at the configured address.
    pub async fn serve(&self) -> Result<(), std::io::Error> {
        serve(self.router(), &self.config.server.addr).await
    }
}

/// Serve a router at the given address (e.g. `"0.0.0.0:3000"`).
pub async fn serve(router: Router, addr: &str) -> Result<(), std::io::Error> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "listening");
    axum::serve(listener, router).await
}
