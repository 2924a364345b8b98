pub mod client;
pub mod config;
pub mod error;
pub mod middleware;
pub mod protocol;
pub mod registry;
pub mod sandbox;
pub mod server;
pub mod storage;

pub use registry::OperationOutcome;
pub use sandbox::Sandbox;
pub use server::Server;
