//! Outbound frame channel of an attached station

use chrono::{DateTime, Duration, Utc};
use tokio::sync::mpsc;

use crate::application::calls::EmitError;

/// Write end of a station's text-frame channel, held by the registry on
/// behalf of the emitter. The transport drains the receiving end into the
/// socket.
#[derive(Debug)]
pub struct Connection {
    station_id: String,
    frames: mpsc::UnboundedSender<String>,
    attached_at: DateTime<Utc>,
}

impl Connection {
    pub fn new(station_id: impl Into<String>, frames: mpsc::UnboundedSender<String>) -> Self {
        Self {
            station_id: station_id.into(),
            frames,
            attached_at: Utc::now(),
        }
    }

    /// Queue a frame for the transport.
    pub fn send(&self, frame: String) -> Result<(), EmitError> {
        self.frames.send(frame).map_err(|_| EmitError::SendFailed {
            station_id: self.station_id.clone(),
            reason: "transport dropped the frame channel".to_string(),
        })
    }

    /// The transport has gone away without detaching.
    pub fn is_closed(&self) -> bool {
        self.frames.is_closed()
    }

    pub fn attached_for(&self) -> Duration {
        Utc::now().signed_duration_since(self.attached_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frames_reach_the_transport_in_order() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let conn = Connection::new("CS001", tx);
        conn.send("[2,\"a\",\"Reset\",{}]".into()).unwrap();
        conn.send("[2,\"b\",\"Reset\",{}]".into()).unwrap();
        assert_eq!(rx.try_recv().unwrap(), "[2,\"a\",\"Reset\",{}]");
        assert_eq!(rx.try_recv().unwrap(), "[2,\"b\",\"Reset\",{}]");
        assert!(conn.attached_for() >= Duration::zero());
    }

    #[test]
    fn dropped_transport_closes_the_channel() {
        let (tx, rx) = mpsc::unbounded_channel();
        let conn = Connection::new("CS001", tx);
        assert!(!conn.is_closed());
        drop(rx);
        assert!(conn.is_closed());
        match conn.send("frame".into()) {
            Err(EmitError::SendFailed { station_id, .. }) => assert_eq!(station_id, "CS001"),
            other => panic!("expected SendFailed, got {other:?}"),
        }
    }
}
