//! Decoding of catalog response bodies.

pub mod response;

pub use response::{parse_catalog_response, CatalogResponse, ParseError};
