//! Wire protocol
//!
//! Newline-delimited JSON requests and responses, and the dispatcher that
//! routes calls into the registry.

pub mod commands;
pub mod handlers;

pub use commands::{Request, Response, encode_response, parse_request};
pub use handlers::{Dispatcher, RequestResult, RequestStatus};
