//! Logging middleware
//!
//! Provides connection and request logging.

use log::{debug, info};
use std::net::SocketAddr;

use crate::registry::OperationOutcome;

/// Log a client connection
pub fn log_connection(client_addr: &SocketAddr, active: usize, max_clients: usize) {
    info!("Client connected: {} ({}/{} clients)", client_addr, active, max_clients);
}

/// Log a client disconnect
pub fn log_disconnect(client_addr: &SocketAddr) {
    info!("Client {} disconnected", client_addr);
}

/// Log a completed call and its status
pub fn log_call(client_addr: &SocketAddr, name: &str, outcome: &OperationOutcome) {
    info!(
        "Client {} called {} -> {}",
        client_addr,
        name,
        outcome.status().as_str()
    );
    if let Some(message) = outcome.error_message() {
        debug!("Client {} call {} error: {}", client_addr, name, message);
    }
}
