//! Session registry: connected stations and their outbound channels

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::mpsc;
use tracing::{info, warn};

use super::connection::Connection;
use crate::application::calls::EmitError;

/// Thread-safe registry of connected charge stations
pub struct SessionRegistry {
    sessions: DashMap<String, Connection>,
}

/// Shared, reference-counted session registry
pub type SharedSessionRegistry = Arc<SessionRegistry>;

impl SessionRegistry {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    pub fn shared() -> SharedSessionRegistry {
        Arc::new(Self::new())
    }

    /// Register a connection. A previous connection of the same station is
    /// replaced.
    pub fn register(&self, charge_station_id: &str, sender: mpsc::UnboundedSender<String>) {
        info!(charge_station_id, "Registering station session");
        let previous = self.sessions.insert(
            charge_station_id.to_string(),
            Connection::new(charge_station_id, sender),
        );
        if previous.is_some() {
            warn!(charge_station_id, "Replaced existing station session");
        }
    }

    pub fn unregister(&self, charge_station_id: &str) {
        if let Some((_, conn)) = self.sessions.remove(charge_station_id) {
            info!(
                charge_station_id,
                attached_secs = conn.attached_for().num_seconds(),
                "Unregistered station session"
            );
        } else {
            warn!(charge_station_id, "Attempted to unregister unknown session");
        }
    }

    pub fn send_to(&self, charge_station_id: &str, message: String) -> Result<(), EmitError> {
        let conn = self
            .sessions
            .get(charge_station_id)
            .ok_or_else(|| EmitError::NotConnected(charge_station_id.to_string()))?;
        conn.send(message)
    }

    /// Registered and its transport still listening.
    pub fn is_connected(&self, charge_station_id: &str) -> bool {
        self.sessions
            .get(charge_station_id)
            .is_some_and(|conn| !conn.is_closed())
    }

    pub fn connected_ids(&self) -> Vec<String> {
        self.sessions.iter().map(|r| r.key().clone()).collect()
    }

    pub fn count(&self) -> usize {
        self.sessions.len()
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
