//! Building blocks shared by every HTTP module

mod error;
mod json;
mod response;

pub use error::ApiError;
pub use json::{ApiJson, ApiJsonRejection};
pub use response::{ApiResponse, PaginatedResponse};
