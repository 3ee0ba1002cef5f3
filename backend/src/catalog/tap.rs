//! reqwest client for a TAP synchronous query endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use tracing::debug;

use super::{CatalogClient, CatalogError, CatalogResult};

/// NASA Exoplanet Archive TAP sync endpoint.
pub const DEFAULT_TAP_URL: &str = "https://exoplanetarchive.ipac.caltech.edu/TAP/sync";

/// Client for `GET <base>?query=<adql>&format=<fmt>`.
///
/// The query string is URL-encoded by reqwest; callers pass plain ADQL.
#[derive(Debug, Clone)]
pub struct TapClient {
    http: reqwest::Client,
    base_url: Url,
    format: String,
}

impl TapClient {
    /// Create a client for `base_url` with a per-request timeout.
    ///
    /// # Errors
    /// Returns [`CatalogError::Configuration`] if the URL does not parse or
    /// the underlying HTTP client cannot be built.
    pub fn new(
        base_url: &str,
        format: impl Into<String>,
        timeout: Duration,
    ) -> CatalogResult<Self> {
        let base_url = Url::parse(base_url).map_err(|e| {
            CatalogError::configuration(format!("Invalid catalog URL '{}': {}", base_url, e))
        })?;
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("exoview/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| CatalogError::configuration(e.to_string()))?;

        Ok(Self {
            http,
            base_url,
            format: format.into(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn format(&self) -> &str {
        &self.format
    }
}

#[async_trait]
impl CatalogClient for TapClient {
    async fn query(&self, adql: &str) -> CatalogResult<String> {
        debug!("TAP GET {} format={}", self.base_url, self.format);
        let response = self
            .http
            .get(self.base_url.clone())
            .query(&[("query", adql), ("format", self.format.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status {
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(CatalogError::from)
    }
}
