//! Emitter backed by the session registry

use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;

use super::pending::SharedPendingCalls;
use super::registry::SharedSessionRegistry;
use crate::application::calls::{EmitError, Emitter};
use crate::support::ocpp_frame::{OcppFrame, OcppFrameError};

/// Frames a call, records it as pending and writes it to the station's
/// channel. The entry is dropped again if delivery fails.
pub struct SessionEmitter {
    registry: SharedSessionRegistry,
    pending: SharedPendingCalls,
}

impl SessionEmitter {
    pub fn new(registry: SharedSessionRegistry, pending: SharedPendingCalls) -> Self {
        Self { registry, pending }
    }
}

#[async_trait]
impl Emitter for SessionEmitter {
    async fn emit(
        &self,
        station_id: &str,
        action: &str,
        payload: Vec<u8>,
    ) -> Result<(), EmitError> {
        let unique_id = Uuid::new_v4().to_string();
        let frame = OcppFrame::call(&unique_id, action, &payload).map_err(|e| match e {
            OcppFrameError::InvalidJson(err) => EmitError::Encode(err),
            other => EmitError::SendFailed {
                station_id: station_id.to_string(),
                reason: other.to_string(),
            },
        })?;

        self.pending.insert(station_id, &unique_id, action, payload);
        if let Err(err) = self.registry.send_to(station_id, frame.serialize()) {
            self.pending.take(station_id, &unique_id);
            return Err(err);
        }

        debug!(station_id, action, unique_id = unique_id.as_str(), "Call emitted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tokio::sync::mpsc;

    use super::*;
    use crate::application::session::{PendingCalls, SessionRegistry};

    #[tokio::test]
    async fn emit_frames_and_records_call() {
        let registry = SessionRegistry::shared();
        let pending = Arc::new(PendingCalls::new());
        let (tx, mut rx) = mpsc::unbounded_channel();
        registry.register("CS001", tx);

        let emitter = SessionEmitter::new(registry, pending.clone());
        emitter
            .emit("CS001", "CancelReservation", br#"{"reservationId":3}"#.to_vec())
            .await
            .unwrap();

        let frame = OcppFrame::parse(&rx.try_recv().unwrap()).unwrap();
        match &frame {
            OcppFrame::Call { action, payload, .. } => {
                assert_eq!(action, "CancelReservation");
                assert_eq!(payload["reservationId"], 3);
            }
            other => panic!("expected Call, got {other:?}"),
        }
        let call = pending.take("CS001", frame.unique_id()).unwrap();
        assert_eq!(call.action, "CancelReservation");
        assert_eq!(call.request, br#"{"reservationId":3}"#.to_vec());
    }

    #[tokio::test]
    async fn undeliverable_call_is_not_left_pending() {
        let pending = Arc::new(PendingCalls::new());
        let emitter = SessionEmitter::new(SessionRegistry::shared(), pending.clone());

        let err = emitter
            .emit("CS404", "GetLocalListVersion", b"{}".to_vec())
            .await
            .unwrap_err();
        assert!(matches!(err, EmitError::NotConnected(_)));
        assert!(pending.is_empty());
    }
}
