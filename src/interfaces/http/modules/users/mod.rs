//! Users module: user CRUD and car association

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
