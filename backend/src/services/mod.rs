//! Service layer: proximity selection and the aggregation pipeline.
//!
//! Services sit between the HTTP handlers and the catalog client. They own
//! the request workflow and hold no state between requests.

pub mod aggregation;
pub mod proximity;

pub use aggregation::{AggregationService, Lookup, ResolvedTarget};
pub use proximity::{central_angle, sky_distance, PolicyKind, ProximityFilter, ProximityPolicy};
