//! HTTP server module for the exoview backend.
//!
//! This module provides an axum-based HTTP server that exposes the
//! aggregation service to the 3D viewer.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  HTTP Layer (axum handlers)                               │
//! │  - Query parameter extraction                             │
//! │  - JSON serialization, error mapping                      │
//! │  - CORS, compression, request tracing                     │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  Service Layer (services::aggregation)                    │
//! │  - Target / candidate lookups                             │
//! │  - Proximity filtering and bounding                       │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  Catalog Layer (catalog/)                                 │
//! │  - TapClient (reqwest) / LocalCatalog (in-memory)         │
//! └──────────────────────────────────────────────────────────┘
//! ```

pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use router::create_router;
pub use state::AppState;
