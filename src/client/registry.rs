//! Client registry
//!
//! Tracks connected clients for the connection limit and for logging.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

pub type SharedClientRegistry = Arc<Mutex<ClientRegistry>>;

/// Bookkeeping for one connected client
#[derive(Debug, Clone)]
pub struct ClientSession {
    connected_at: Instant,
    requests_served: u64,
}

impl ClientSession {
    pub fn new() -> Self {
        Self {
            connected_at: Instant::now(),
            requests_served: 0,
        }
    }

    pub fn record_request(&mut self) {
        self.requests_served += 1;
    }

    pub fn requests_served(&self) -> u64 {
        self.requests_served
    }

    pub fn connected_for(&self) -> Duration {
        self.connected_at.elapsed()
    }
}

impl Default for ClientSession {
    fn default() -> Self {
        Self::new()
    }
}

/// Registry for tracking active clients
#[derive(Debug, Default)]
pub struct ClientRegistry {
    clients: HashMap<SocketAddr, ClientSession>,
}

impl ClientRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `addr` unless `max_clients` are already connected.
    pub fn try_register(&mut self, addr: SocketAddr, max_clients: usize) -> bool {
        if self.clients.len() >= max_clients {
            return false;
        }
        self.clients.insert(addr, ClientSession::new());
        true
    }

    pub fn remove(&mut self, addr: &SocketAddr) -> Option<ClientSession> {
        self.clients.remove(addr)
    }

    pub fn get_mut(&mut self, addr: &SocketAddr) -> Option<&mut ClientSession> {
        self.clients.get_mut(addr)
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(port: u16) -> SocketAddr {
        SocketAddr::from(([127, 0, 0, 1], port))
    }

    #[test]
    fn refuses_clients_over_the_limit() {
        let mut registry = ClientRegistry::new();
        assert!(registry.try_register(addr(1), 2));
        assert!(registry.try_register(addr(2), 2));
        assert!(!registry.try_register(addr(3), 2));

        registry.remove(&addr(1));
        assert!(registry.try_register(addr(3), 2));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn counts_requests_per_session() {
        let mut registry = ClientRegistry::new();
        registry.try_register(addr(1), 1);
        registry.get_mut(&addr(1)).unwrap().record_request();
        assert_eq!(registry.remove(&addr(1)).unwrap().requests_served(), 1);
    }
}
