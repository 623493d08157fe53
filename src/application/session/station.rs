//! Per-station frame handling
//!
//! Bridges OCPP-J text frames to the router. The transport reads a text
//! frame from the socket, passes it to [`StationSession::handle_text`] and
//! writes back the reply, if any.

use std::sync::Arc;

use serde_json::Value;
use tracing::{info, warn};

use super::pending::SharedPendingCalls;
use crate::application::routing::Router;
use crate::support::ocpp_frame::{payload_bytes, OcppFrame};

pub struct StationSession {
    station_id: String,
    router: Arc<Router>,
    pending: SharedPendingCalls,
}

impl StationSession {
    pub fn new(
        station_id: impl Into<String>,
        router: Arc<Router>,
        pending: SharedPendingCalls,
    ) -> Self {
        Self {
            station_id: station_id.into(),
            router,
            pending,
        }
    }

    pub fn station_id(&self) -> &str {
        &self.station_id
    }

    /// Handle one inbound text frame and return the frame to send back.
    /// Only calls are answered.
    pub async fn handle_text(&self, text: &str) -> Option<String> {
        let station_id = self.station_id.as_str();
        let frame = match OcppFrame::parse(text) {
            Ok(frame) => frame,
            Err(err) => {
                warn!(station_id, error = %err, "Unparseable frame");
                return unique_id_hint(text).map(|id| {
                    OcppFrame::error_response(id, "FormationViolation", err.to_string())
                        .serialize()
                });
            }
        };

        match frame {
            OcppFrame::Call {
                unique_id,
                action,
                payload,
            } => {
                let bytes = payload_bytes(&payload);
                let reply = match self.router.dispatch(station_id, &action, &bytes).await {
                    Ok(response) => OcppFrame::call_result(unique_id.clone(), response.as_deref())
                        .unwrap_or_else(|err| {
                            OcppFrame::error_response(unique_id, "InternalError", err.to_string())
                        }),
                    Err(err) => {
                        OcppFrame::error_response(unique_id, err.error_code(), err.to_string())
                    }
                };
                Some(reply.serialize())
            }
            OcppFrame::CallResult { unique_id, payload } => {
                let Some(call) = self.pending.take(station_id, &unique_id) else {
                    warn!(
                        station_id,
                        unique_id = unique_id.as_str(),
                        "Result for unknown call"
                    );
                    return None;
                };
                let result = payload_bytes(&payload);
                if let Err(err) = self
                    .router
                    .dispatch_result(station_id, &call.action, &call.request, &result)
                    .await
                {
                    warn!(
                        station_id,
                        action = call.action.as_str(),
                        error = %err,
                        "Failed to handle call result"
                    );
                }
                None
            }
            OcppFrame::CallError {
                unique_id,
                error_code,
                error_description,
                ..
            } => {
                let action = self
                    .pending
                    .take(station_id, &unique_id)
                    .map(|call| call.action);
                warn!(
                    station_id,
                    unique_id = unique_id.as_str(),
                    action = action.as_deref().unwrap_or("unknown"),
                    error_code = error_code.as_str(),
                    error_description = error_description.as_str(),
                    "Station returned CallError"
                );
                None
            }
        }
    }

    /// Drop calls still awaiting a result from this station.
    pub fn close(&self) {
        let purged = self.pending.purge_station(&self.station_id);
        info!(
            station_id = self.station_id.as_str(),
            purged, "Station session closed"
        );
    }
}

/// Unique id of a malformed frame, when one can be recovered.
fn unique_id_hint(text: &str) -> Option<String> {
    let value: Value = serde_json::from_str(text).ok()?;
    value.get(1)?.as_str().map(str::to_string)
}
