//! Server core functionality
//!
//! Binds the request listener over a sandbox and accepts clients.

pub mod core;

pub use core::Server;
