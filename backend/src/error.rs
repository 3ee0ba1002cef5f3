//! Error types for the aggregation pipeline.
//!
//! Every failure is terminal for its request. "The catalog has nothing" and
//! "the catalog could not be asked" stay distinct all the way to the HTTP
//! layer.

use std::fmt;
use std::time::Duration;

use crate::catalog::{CatalogError, NameError};
use crate::parsing::ParseError;

/// Result type for aggregation operations
pub type AggregateResult<T> = Result<T, AggregateError>;

/// The two outbound calls made per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Lookup of the named target object
    Target,
    /// Lookup of the candidate population around the target
    Candidates,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Target => f.write_str("target lookup"),
            Stage::Candidates => f.write_str("candidate lookup"),
        }
    }
}

/// Error type for one aggregation request
#[derive(Debug, thiserror::Error)]
pub enum AggregateError {
    /// Missing, blank or unusable object name. No outbound call was made.
    #[error("Invalid argument: {0}")]
    InvalidArgument(#[from] NameError),

    /// The target query returned no data rows.
    #[error("No data found for exoplanet '{name}'")]
    TargetNotFound { name: String },

    /// The candidate query returned no data rows.
    #[error("No nearby objects found for '{name}'")]
    NoCandidates { name: String },

    /// The catalog could not be reached or answered with an error status.
    #[error("Catalog request failed during {stage}: {source}")]
    Upstream {
        stage: Stage,
        query: String,
        source: CatalogError,
    },

    /// The catalog answered, but not with the expected CSV contract.
    #[error("Malformed catalog response during {stage}: {source}")]
    MalformedResponse {
        stage: Stage,
        query: String,
        source: ParseError,
    },

    /// The catalog did not answer in time.
    #[error("Catalog request timed out during {stage} after {after:?}")]
    Timeout {
        stage: Stage,
        query: String,
        after: Duration,
    },
}

impl AggregateError {
    /// Stage at which an outbound failure happened, if any.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Self::Upstream { stage, .. }
            | Self::MalformedResponse { stage, .. }
            | Self::Timeout { stage, .. } => Some(*stage),
            Self::TargetNotFound { .. } => Some(Stage::Target),
            Self::NoCandidates { .. } => Some(Stage::Candidates),
            Self::InvalidArgument(_) => None,
        }
    }

    /// Query text that triggered the failure, for diagnostics.
    pub fn query(&self) -> Option<&str> {
        match self {
            Self::Upstream { query, .. }
            | Self::MalformedResponse { query, .. }
            | Self::Timeout { query, .. } => Some(query),
            _ => None,
        }
    }

    /// True for failures that are the catalog's fault rather than the caller's.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            Self::Upstream { .. } | Self::MalformedResponse { .. } | Self::Timeout { .. }
        )
    }
}
