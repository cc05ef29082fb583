//! Error handling for the Warden HTTP server.

pub mod response;
pub mod types;

pub use types::{ApiError, ApiResult};
