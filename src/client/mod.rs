//! Client management
//!
//! Tracks connected clients and runs the per-connection request loop.

pub mod handler;
pub mod registry;

pub use handler::handle_client;
pub use registry::{ClientRegistry, ClientSession, SharedClientRegistry};
