//! Authentication middleware selected by configuration.
//!
//! `none` is a pass-through. `basic` checks an `Authorization: Basic` header
//! against the configured users and answers 401 otherwise.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{header, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::Router;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::config::{AuthConfig, AuthMethod};

type Users = Arc<BTreeMap<String, String>>;

/// The authentication step applied in front of every route.
#[derive(Debug, Clone)]
pub enum Authenticator {
    PassThrough,
    Basic(Users),
}

impl Authenticator {
    pub fn from_config(config: &AuthConfig) -> Self {
        tracing::info!(method = ?config.method, "using auth method");
        match config.method {
            AuthMethod::None => Authenticator::PassThrough,
            AuthMethod::Basic => Authenticator::Basic(Arc::new(config.users.clone())),
        }
    }

    /// Wrap `router` with this authenticator.
    pub fn apply(&self, router: Router) -> Router {
        match self {
            Authenticator::PassThrough => router,
            Authenticator::Basic(users) => {
                router.layer(middleware::from_fn_with_state(users.clone(), require_basic_auth))
            }
        }
    }
}

/// Decode `Basic <base64(user:password)>` into its parts.
fn basic_credentials(value: &str) -> Option<(String, String)> {
    let encoded = value.strip_prefix("Basic ")?.trim();
    let decoded = STANDARD.decode(encoded).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (user, password) = decoded.split_once(':')?;
    Some((user.to_string(), password.to_string()))
}

// Compares every byte so timing does not leak the matching prefix length.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

fn authorized(users: &BTreeMap<String, String>, header_value: Option<&str>) -> bool {
    let Some((user, password)) = header_value.and_then(basic_credentials) else {
        return false;
    };
    users
        .get(&user)
        .is_some_and(|expected| constant_time_eq(expected.as_bytes(), password.as_bytes()))
}

async fn require_basic_auth(State(users): State<Users>, request: Request, next: Next) -> Response {
    let header_value = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    if authorized(&users, header_value) {
        next.run(request).await
    } else {
        tracing::warn!(path = %request.uri().path(), "rejected unauthenticated request");
        StatusCode::UNAUTHORIZED.into_response()
    }
}
