//! HTTP REST API interfaces
//!
//! - `common`: response envelope, error mapping and the JSON extractor
//! - `modules`: per-resource DTOs and handlers
//! - `router`: API router with Swagger documentation

pub mod common;
pub mod modules;
pub mod router;

#[cfg(test)]
pub(crate) mod test_support;

pub use router::{create_api_router, ApiContext};
