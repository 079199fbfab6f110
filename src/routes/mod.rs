//! Route mounting by convention.
//!
//! Every configured collection becomes a CRUD resource at `/{collection}`;
//! versioned groups mount at `/{version}/{collection}`. Everything is nested
//! under the optional prefix. Extra routers can be mounted by name.

use std::collections::BTreeSet;
use std::sync::Arc;

use axum::Router;

use crate::actions::{self, Actions};
use crate::config::RoutesConfig;
use crate::repository::DocumentRepository;
use crate::store::DocumentStore;

pub struct Routes<S: ?Sized> {
    store: Arc<S>,
    config: RoutesConfig,
    custom: Vec<(String, Router)>,
}

const ROOT: &str = "/";

fn normalize(segment: &str) -> String {
    format!("/{}", segment.trim_matches('/'))
}

impl<S: DocumentStore + ?Sized + 'static> Routes<S> {
    pub fn new(store: Arc<S>, config: RoutesConfig) -> Self {
        Self {
            store,
            config,
            custom: Vec::new(),
        }
    }

    /// Mount an extra router at `/{path}` (relative to the prefix).
    pub fn mount(mut self, path: &str, router: Router) -> Self {
        self.custom.push((normalize(path), router));
        self
    }

    /// `(route, collection)` pairs for every configured resource, unprefixed.
    /// A route listed more than once appears once.
    pub fn resources(&self) -> Vec<(String, String)> {
        let mut seen = BTreeSet::new();
        self.configured()
            .into_iter()
            .filter(|(route, collection)| {
                if collection.trim_matches('/').is_empty() {
                    tracing::warn!(%collection, "skipping collection with an empty name");
                    return false;
                }
                let fresh = seen.insert(route.clone());
                if !fresh {
                    tracing::warn!(%route, %collection, "skipping duplicate route");
                }
                fresh
            })
            .collect()
    }

    fn configured(&self) -> Vec<(String, String)> {
        let plain = self
            .config
            .collections
            .iter()
            .map(|collection| (normalize(collection), collection.clone()));
        let versioned = self.config.versions.iter().flat_map(|(version, collections)| {
            collections.iter().map(move |collection| {
                let path = format!("{}/{}", version.trim_matches('/'), collection.trim_matches('/'));
                (normalize(&path), collection.clone())
            })
        });
        plain.chain(versioned).collect()
    }

    fn resource_router(&self, collection: &str) -> Router {
        let repository = Arc::new(DocumentRepository::new(Arc::clone(&self.store), collection));
        actions::router(Arc::new(Actions::for_repository(repository)))
    }

    /// Build the router with every resource and custom mount.
    pub fn into_router(self) -> Router {
        let mut router = Router::new();
        let mut mounted = BTreeSet::new();

        for (route, collection) in self.resources() {
            tracing::info!(%route, %collection, "adding route");
            router = router.nest(&route, self.resource_router(&collection));
            mounted.insert(route);
        }
        for (route, custom) in self.custom {
            if route == ROOT || mounted.contains(&route) {
                tracing::warn!(%route, "skipping custom router on the root or a path already in use");
                continue;
            }
            tracing::info!(%route, "adding route");
            router = router.nest(&route, custom);
            mounted.insert(route);
        }
        if mounted.is_empty() {
            tracing::error!("no API routes configured");
        }

        match self.config.prefix.as_deref().map(str::trim) {
            Some(prefix) if !prefix.trim_matches('/').is_empty() => {
                Router::new().nest(&normalize(prefix), router)
            }
            _ => router,
        }
    }
}
