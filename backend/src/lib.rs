//! # Exoview Backend
//!
//! Catalog aggregation service for the exoplanet neighbourhood viewer.
//!
//! Given an exoplanet name, the service resolves the planet's record in the
//! NASA Exoplanet Archive, fetches a population of other catalog objects,
//! selects the ones considered nearby and returns `{ target, nearby }` as
//! JSON for the 3D viewer.
//!
//! ## Architecture
//!
//! The crate is organized into several logical modules:
//!
//! - [`catalog`]: ADQL query construction and catalog clients (TAP, in-memory)
//! - [`parsing`]: CSV response decoding into [`models::CelestialRecord`]s
//! - [`services`]: Proximity filtering and the two-stage aggregation pipeline
//! - [`config`]: TOML configuration with environment overrides
//! - [`error`]: Aggregation error taxonomy
//! - [`http`]: Axum-based HTTP server and request handlers
//!
//! ## Flow
//!
//! ```text
//! name → target query → target record → candidate query
//!      → candidate records → proximity filter → bounded result → JSON
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod models;
pub mod parsing;
pub mod services;

#[cfg(feature = "http-server")]
pub mod http;

pub use config::AppConfig;
pub use error::{AggregateError, AggregateResult, Stage};
pub use models::{AggregationResult, CelestialRecord};
pub use services::AggregationService;
