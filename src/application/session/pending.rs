//! Outbound calls awaiting a result, keyed by (station id, unique id)

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct PendingCall {
    pub action: String,
    /// Payload as sent, echoed to the result handler.
    pub request: Vec<u8>,
    pub sent_at: DateTime<Utc>,
}

#[derive(Default)]
pub struct PendingCalls {
    calls: DashMap<(String, String), PendingCall>,
}

pub type SharedPendingCalls = Arc<PendingCalls>;

impl PendingCalls {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, station_id: &str, unique_id: &str, action: &str, request: Vec<u8>) {
        self.calls.insert(
            (station_id.to_string(), unique_id.to_string()),
            PendingCall {
                action: action.to_string(),
                request,
                sent_at: Utc::now(),
            },
        );
    }

    /// Remove and return the call a result or error refers to.
    pub fn take(&self, station_id: &str, unique_id: &str) -> Option<PendingCall> {
        self.calls
            .remove(&(station_id.to_string(), unique_id.to_string()))
            .map(|(_, call)| call)
    }

    /// Drop every call of a disconnected station.
    pub fn purge_station(&self, station_id: &str) -> usize {
        let before = self.calls.len();
        self.calls.retain(|key, _| key.0 != station_id);
        let purged = before.saturating_sub(self.calls.len());
        if purged > 0 {
            debug!(station_id, purged, "Dropped pending calls of station");
        }
        purged
    }

    /// Drop calls sent more than `max_age` ago.
    pub fn purge_older_than(&self, max_age: Duration) -> usize {
        let cutoff = Utc::now() - max_age;
        let before = self.calls.len();
        self.calls.retain(|_, call| call.sent_at >= cutoff);
        before.saturating_sub(self.calls.len())
    }

    pub fn len(&self) -> usize {
        self.calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_removes_entry() {
        let pending = PendingCalls::new();
        pending.insert("CS001", "m1", "ReserveNow", b"{}".to_vec());

        assert!(pending.take("CS002", "m1").is_none());
        let call = pending.take("CS001", "m1").unwrap();
        assert_eq!(call.action, "ReserveNow");
        assert!(pending.take("CS001", "m1").is_none());
    }

    #[test]
    fn purge_station_keeps_others() {
        let pending = PendingCalls::new();
        pending.insert("CS001", "m1", "ReserveNow", Vec::new());
        pending.insert("CS001", "m2", "SendLocalList", Vec::new());
        pending.insert("CS002", "m1", "ReserveNow", Vec::new());

        assert_eq!(pending.purge_station("CS001"), 2);
        assert_eq!(pending.len(), 1);
    }

    #[test]
    fn purge_by_age() {
        let pending = PendingCalls::new();
        pending.insert("CS001", "old", "ReserveNow", Vec::new());
        pending.insert("CS001", "new", "ReserveNow", Vec::new());
        pending
            .calls
            .get_mut(&("CS001".to_string(), "old".to_string()))
            .unwrap()
            .sent_at = Utc::now() - Duration::seconds(120);

        assert_eq!(pending.purge_older_than(Duration::seconds(30)), 1);
        assert!(pending.take("CS001", "new").is_some());
    }
}
