//! Access to the remote exoplanet catalog.
//!
//! The catalog is consumed as an opaque text-query endpoint: an ADQL string
//! goes in, a CSV body comes out. [`CatalogClient`] is the seam between the
//! aggregation service and the transport:
//!
//! - [`tap::TapClient`]: reqwest client for the archive's TAP `sync` endpoint
//! - [`local::LocalCatalog`]: in-memory scripted catalog for tests and local development

use async_trait::async_trait;

pub mod query;
pub mod tap;

#[cfg(feature = "local-catalog")]
pub mod local;

#[cfg(feature = "local-catalog")]
pub use local::LocalCatalog;
pub use query::{CandidateFilter, NameError, ObjectName, QueryBuilder, COLUMNS};
pub use tap::TapClient;

/// Result type for catalog calls.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Transport-level failures talking to the catalog.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    /// Connection, DNS or TLS failure.
    #[error("Transport error: {message}")]
    Transport { message: String },

    /// The catalog answered with a non-success status.
    #[error("Catalog returned HTTP {status}")]
    Status { status: u16 },

    /// The response body could not be read.
    #[error("Failed to read response body: {message}")]
    Body { message: String },

    /// The request did not complete in time.
    #[error("Catalog request timed out")]
    Timeout,

    /// Client construction failed (bad base URL, TLS init).
    #[error("Catalog client configuration error: {message}")]
    Configuration { message: String },
}

impl CatalogError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    pub fn body(message: impl Into<String>) -> Self {
        Self::Body {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Check if this error is a timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }
}

impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if let Some(status) = err.status() {
            Self::Status {
                status: status.as_u16(),
            }
        } else if err.is_body() || err.is_decode() {
            Self::body(err.to_string())
        } else {
            Self::transport(err.to_string())
        }
    }
}

/// A catalog that answers ADQL queries with delimited text.
///
/// # Thread Safety
/// Implementations must be `Send + Sync`; one client is shared by all
/// in-flight requests.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Run `adql` and return the raw response body.
    ///
    /// A header-only body is a successful, empty answer; only transport
    /// problems are errors here.
    async fn query(&self, adql: &str) -> CatalogResult<String>;
}
