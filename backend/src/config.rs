//! Service configuration.
//!
//! Settings come from an optional `exoview.toml`, then environment variables
//! override individual values:
//!
//! - `EXOVIEW_CONFIG`: explicit path to the TOML file
//! - `HOST`, `PORT`: bind address (default `0.0.0.0:3000`)
//! - `CATALOG_URL`: TAP sync endpoint
//! - `CATALOG_TIMEOUT_SECS`: per-call timeout for catalog requests
//! - `PROXIMITY_POLICY`: `catalog_distance` | `angular_separation`
//! - `MAX_NEARBY`: cap on the number of nearby objects returned

use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use qtty::Parsecs;
use serde::{Deserialize, Serialize};

use crate::catalog::tap::DEFAULT_TAP_URL;
use crate::services::proximity::{
    PolicyKind, ProximityFilter, ProximityPolicy, DEFAULT_ANGULAR_THRESHOLD,
    DEFAULT_MAX_DISTANCE_PC, DEFAULT_MAX_RESULTS, DEFAULT_SPHERE_RADIUS,
};

/// Configuration loading and validation errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {message}")]
    Read { path: PathBuf, message: String },

    #[error("Failed to parse config: {message}")]
    Parse { message: String },

    #[error("No exoview.toml found in standard locations")]
    NotFound,

    #[error("Invalid setting '{field}': {message}")]
    Invalid { field: &'static str, message: String },
}

impl ConfigError {
    fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            message: message.into(),
        }
    }
}

/// Complete service configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub catalog: CatalogSettings,
    #[serde(default)]
    pub proximity: ProximitySettings,
}

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Remote catalog settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_table")]
    pub table: String,
    #[serde(default = "default_format")]
    pub format: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Nearby-object selection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProximitySettings {
    #[serde(default)]
    pub policy: PolicyKind,
    #[serde(default = "default_max_distance_parsecs")]
    pub max_distance_parsecs: f64,
    #[serde(default = "default_sphere_radius")]
    pub sphere_radius: f64,
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_base_url() -> String {
    DEFAULT_TAP_URL.to_string()
}

fn default_table() -> String {
    "ps".to_string()
}

fn default_format() -> String {
    "csv".to_string()
}

fn default_timeout_secs() -> u64 {
    5
}

fn default_max_distance_parsecs() -> f64 {
    DEFAULT_MAX_DISTANCE_PC
}

fn default_sphere_radius() -> f64 {
    DEFAULT_SPHERE_RADIUS
}

fn default_threshold() -> f64 {
    DEFAULT_ANGULAR_THRESHOLD
}

fn default_max_results() -> usize {
    DEFAULT_MAX_RESULTS
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            table: default_table(),
            format: default_format(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for ProximitySettings {
    fn default() -> Self {
        Self {
            policy: PolicyKind::default(),
            max_distance_parsecs: default_max_distance_parsecs(),
            sphere_radius: default_sphere_radius(),
            threshold: default_threshold(),
            max_results: default_max_results(),
        }
    }
}

impl AppConfig {
    /// Parse configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })
    }

    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&content)
    }

    /// Load configuration from the default location.
    ///
    /// Searches for `exoview.toml` in:
    /// 1. Current directory
    /// 2. `backend/` directory
    /// 3. Parent directory
    pub fn from_default_location() -> Result<Self, ConfigError> {
        let search_paths = [
            PathBuf::from("exoview.toml"),
            PathBuf::from("backend/exoview.toml"),
            PathBuf::from("../exoview.toml"),
        ];

        for path in search_paths {
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        Err(ConfigError::NotFound)
    }

    /// Resolve the effective configuration for the server process.
    ///
    /// `EXOVIEW_CONFIG` wins over the default search; with no file at all the
    /// built-in defaults are used. Environment overrides are applied last and
    /// the result is validated.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match env::var("EXOVIEW_CONFIG") {
            Ok(path) => Self::from_file(path)?,
            Err(_) => match Self::from_default_location() {
                Ok(config) => config,
                Err(ConfigError::NotFound) => Self::default(),
                Err(e) => return Err(e),
            },
        };
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Override settings from environment variables.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(host) = env::var("HOST") {
            self.server.host = host;
        }
        if let Ok(port) = env::var("PORT") {
            self.server.port = port
                .parse()
                .map_err(|_| ConfigError::invalid("PORT", "must be a valid port number"))?;
        }
        if let Ok(url) = env::var("CATALOG_URL") {
            self.catalog.base_url = url;
        }
        if let Ok(secs) = env::var("CATALOG_TIMEOUT_SECS") {
            self.catalog.timeout_secs = secs.parse().map_err(|_| {
                ConfigError::invalid("CATALOG_TIMEOUT_SECS", "must be a whole number of seconds")
            })?;
        }
        if let Ok(policy) = env::var("PROXIMITY_POLICY") {
            self.proximity.policy = policy
                .parse()
                .map_err(|e: String| ConfigError::invalid("PROXIMITY_POLICY", e))?;
        }
        if let Ok(max) = env::var("MAX_NEARBY") {
            self.proximity.max_results = max
                .parse()
                .map_err(|_| ConfigError::invalid("MAX_NEARBY", "must be a positive integer"))?;
        }
        Ok(())
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.catalog.base_url.trim().is_empty() {
            return Err(ConfigError::invalid("catalog.base_url", "must not be empty"));
        }
        let table_ok = !self.catalog.table.is_empty()
            && self
                .catalog
                .table
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.');
        if !table_ok {
            return Err(ConfigError::invalid(
                "catalog.table",
                format!("'{}' is not a valid table identifier", self.catalog.table),
            ));
        }
        if self.catalog.timeout_secs == 0 {
            return Err(ConfigError::invalid("catalog.timeout_secs", "must be greater than 0"));
        }

        let p = &self.proximity;
        for (field, value) in [
            ("proximity.max_distance_parsecs", p.max_distance_parsecs),
            ("proximity.sphere_radius", p.sphere_radius),
            ("proximity.threshold", p.threshold),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::invalid(
                    field,
                    format!("must be a finite, non-negative number (got {})", value),
                ));
            }
        }
        if p.max_results == 0 {
            return Err(ConfigError::invalid("proximity.max_results", "must be at least 1"));
        }
        Ok(())
    }

    /// Per-call timeout for catalog requests.
    pub fn catalog_timeout(&self) -> Duration {
        Duration::from_secs(self.catalog.timeout_secs)
    }

    pub fn proximity_policy(&self) -> ProximityPolicy {
        let p = &self.proximity;
        match p.policy {
            PolicyKind::CatalogDistance => ProximityPolicy::CatalogDistance {
                max_distance: Parsecs::new(p.max_distance_parsecs),
            },
            PolicyKind::AngularSeparation => ProximityPolicy::AngularSeparation {
                sphere_radius: p.sphere_radius,
                threshold: p.threshold,
            },
        }
    }

    pub fn proximity_filter(&self) -> ProximityFilter {
        ProximityFilter::new(self.proximity_policy(), self.proximity.max_results)
    }

    /// Socket address to listen on.
    pub fn bind_address(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| ConfigError::invalid("server.host", format!("{}", e)))
    }
}
