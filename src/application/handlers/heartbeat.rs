//! Heartbeat handler

use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;

use crate::application::routing::{CallHandler, HandlerError};
use crate::ocpp::v16::{HeartbeatRequest, HeartbeatResponse};

pub struct HeartbeatHandler;

#[async_trait]
impl CallHandler for HeartbeatHandler {
    type Request = HeartbeatRequest;
    type Response = HeartbeatResponse;

    async fn handle_call(
        &self,
        station_id: &str,
        _request: HeartbeatRequest,
    ) -> Result<Option<HeartbeatResponse>, HandlerError> {
        debug!(station_id, "Heartbeat");
        Ok(Some(HeartbeatResponse {
            current_time: Utc::now(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn returns_current_time() {
        let before = Utc::now();
        let resp = HeartbeatHandler
            .handle_call("CS001", HeartbeatRequest::default())
            .await
            .unwrap()
            .unwrap();
        assert!(resp.current_time >= before);
    }
}
