//! In-memory catalog for unit testing and local development.
//!
//! Responses are scripted up front and handed out in order, one per call.
//! Every query is recorded so tests can assert what was (or was not) sent.

use std::collections::VecDeque;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::{CatalogClient, CatalogError, CatalogResult};

#[derive(Debug, Default)]
struct LocalState {
    responses: VecDeque<CatalogResult<String>>,
    queries: Vec<String>,
}

/// Scripted [`CatalogClient`].
#[derive(Debug, Default)]
pub struct LocalCatalog {
    state: Mutex<LocalState>,
    delay: Option<Duration>,
}

impl LocalCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful response body.
    pub fn with_response(self, body: impl Into<String>) -> Self {
        self.state.lock().responses.push_back(Ok(body.into()));
        self
    }

    /// Queue a failure.
    pub fn with_error(self, error: CatalogError) -> Self {
        self.state.lock().responses.push_back(Err(error));
        self
    }

    /// Sleep this long before answering each call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of queries received so far.
    pub fn call_count(&self) -> usize {
        self.state.lock().queries.len()
    }

    /// All queries received, in call order.
    pub fn queries(&self) -> Vec<String> {
        self.state.lock().queries.clone()
    }

    /// Responses still waiting to be served.
    pub fn remaining(&self) -> usize {
        self.state.lock().responses.len()
    }
}

#[async_trait]
impl CatalogClient for LocalCatalog {
    async fn query(&self, adql: &str) -> CatalogResult<String> {
        // Record before sleeping so a timed-out call still counts.
        let next = {
            let mut state = self.state.lock();
            state.queries.push(adql.to_string());
            state.responses.pop_front()
        };

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        next.unwrap_or_else(|| Err(CatalogError::transport("no scripted response left")))
    }
}
