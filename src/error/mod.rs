//! Error handling
//!
//! Defines error types and the status mapping used at operation boundaries.

pub mod handlers;
pub mod types;

pub use handlers::{Status, error_status, log_failure};
pub use types::*;
