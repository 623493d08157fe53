//! Call maker and the emitter seam
//!
//! [`CallMaker`] turns an [`OutboundCall`] into bytes and hands it to an
//! [`Emitter`], which frames it, records it for result correlation and
//! delivers it to the station.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

use super::outbound::OutboundCall;

#[derive(Debug, Error)]
pub enum EmitError {
    #[error("charge station '{0}' is not connected")]
    NotConnected(String),

    #[error("failed to deliver to '{station_id}': {reason}")]
    SendFailed { station_id: String, reason: String },

    #[error("failed to encode call: {0}")]
    Encode(#[from] serde_json::Error),
}

#[async_trait]
pub trait Emitter: Send + Sync {
    async fn emit(&self, station_id: &str, action: &str, payload: Vec<u8>)
        -> Result<(), EmitError>;
}

pub struct CallMaker {
    emitter: Arc<dyn Emitter>,
}

/// Shared, reference-counted call maker
pub type SharedCallMaker = Arc<CallMaker>;

impl CallMaker {
    pub fn new(emitter: Arc<dyn Emitter>) -> Self {
        Self { emitter }
    }

    /// Send a call. The station's result arrives later through the router.
    pub async fn send(
        &self,
        station_id: &str,
        call: impl Into<OutboundCall>,
    ) -> Result<(), EmitError> {
        let call = call.into();
        let action = call.action();
        let payload = call.encode()?;

        info!(station_id, action, "Sending call");
        metrics::counter!("ocpp_outbound_calls_total", "action" => action).increment(1);
        self.emitter.emit(station_id, action, payload).await
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use parking_lot::Mutex;

    use super::*;

    /// Records every emitted call.
    #[derive(Default)]
    pub struct RecordingEmitter {
        pub sent: Mutex<Vec<(String, String, serde_json::Value)>>,
    }

    #[async_trait]
    impl Emitter for RecordingEmitter {
        async fn emit(
            &self,
            station_id: &str,
            action: &str,
            payload: Vec<u8>,
        ) -> Result<(), EmitError> {
            let value = serde_json::from_slice(&payload)?;
            self.sent
                .lock()
                .push((station_id.to_string(), action.to_string(), value));
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::testing::RecordingEmitter;
    use super::*;
    use crate::ocpp::v16::ReserveNowRequest;

    struct Offline;

    #[async_trait]
    impl Emitter for Offline {
        async fn emit(&self, station_id: &str, _: &str, _: Vec<u8>) -> Result<(), EmitError> {
            Err(EmitError::NotConnected(station_id.to_string()))
        }
    }

    #[tokio::test]
    async fn send_resolves_action_from_variant() {
        let emitter = Arc::new(RecordingEmitter::default());
        let maker = CallMaker::new(emitter.clone());

        let expiry = chrono::DateTime::parse_from_rfc3339("2030-01-01T00:00:00Z")
            .unwrap()
            .with_timezone(&chrono::Utc);
        maker
            .send(
                "CS001",
                ReserveNowRequest {
                    connector_id: 1,
                    expiry_date: expiry,
                    id_tag: "TAG".into(),
                    parent_id_tag: None,
                    reservation_id: 12,
                },
            )
            .await
            .unwrap();

        let sent = emitter.sent.lock();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "CS001");
        assert_eq!(sent[0].1, "ReserveNow");
        assert_eq!(sent[0].2["reservationId"], json!(12));
        assert_eq!(sent[0].2["expiryDate"], json!("2030-01-01T00:00:00Z"));
    }

    #[tokio::test]
    async fn emitter_failure_is_returned() {
        let maker = CallMaker::new(Arc::new(Offline));
        let err = maker
            .send("CS009", OutboundCall::GetLocalListVersion(Default::default()))
            .await
            .unwrap_err();
        assert!(matches!(err, EmitError::NotConnected(ref id) if id == "CS009"));
    }
}
