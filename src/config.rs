//! Static configuration for the scaffolding layer.
//!
//! Loaded once from JSON. Every section is optional and falls back to its
//! defaults, so `{}` is a valid (if route-less) configuration.
//!
//! ```json
//! {
//!   "server": { "addr": "0.0.0.0:8080" },
//!   "auth": { "method": "basic", "users": { "admin": "secret" } },
//!   "logging": { "level": "info", "error": { "filename": "logs/error.log" } },
//!   "routes": { "prefix": "/api", "versions": { "v1": ["users", "teams"] } }
//! }
//! ```

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable holding the deployment environment.
pub const ENV_VAR: &str = "APP_ENV";

/// Value of [`ENV_VAR`] that turns on production behaviour.
pub const PRODUCTION: &str = "production";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub logging: LoggingConfig,
    pub routes: RoutesConfig,
    /// Overrides the `APP_ENV` lookup when set.
    pub production: Option<bool>,
}

impl Config {
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// True when running in production: the explicit override, else `APP_ENV=production`.
    pub fn is_production(&self) -> bool {
        self.production
            .unwrap_or_else(|| env::var(ENV_VAR).is_ok_and(|value| value == PRODUCTION))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: "0.0.0.0:3000".to_string(),
        }
    }
}

/// Authentication method applied to every route.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMethod {
    #[default]
    None,
    Basic,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub method: AuthMethod,
    /// `username -> password` for basic auth.
    pub users: BTreeMap<String, String>,
}

/// A log file destination. Without a filename the destination is skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileTarget {
    pub filename: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset.
    pub level: String,
    /// Errors only, production only.
    pub error: Option<FileTarget>,
    /// All levels, production only.
    pub combined: Option<FileTarget>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            error: None,
            combined: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutesConfig {
    /// Path every route is nested under (e.g. `/api`).
    pub prefix: Option<String>,
    /// Collections mounted at `/{collection}`.
    pub collections: Vec<String>,
    /// Collections mounted at `/{version}/{collection}`.
    pub versions: BTreeMap<String, Vec<String>>,
}
