//! FirmwareStatusNotification and DiagnosticsStatusNotification handlers
//!
//! A status outside the OCPP enumeration is logged and acknowledged
//! without being stored.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::application::routing::{CallHandler, HandlerError};
use crate::domain::firmware::{DiagnosticsStatus, FirmwareStatus};
use crate::domain::RepositoryProvider;
use crate::ocpp::v16::{
    DiagnosticsStatusNotificationRequest, DiagnosticsStatusNotificationResponse,
    FirmwareStatusNotificationRequest, FirmwareStatusNotificationResponse,
};

pub struct FirmwareStatusNotificationHandler {
    repos: Arc<dyn RepositoryProvider>,
}

impl FirmwareStatusNotificationHandler {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }
}

#[async_trait]
impl CallHandler for FirmwareStatusNotificationHandler {
    type Request = FirmwareStatusNotificationRequest;
    type Response = FirmwareStatusNotificationResponse;

    async fn handle_call(
        &self,
        station_id: &str,
        request: FirmwareStatusNotificationRequest,
    ) -> Result<Option<FirmwareStatusNotificationResponse>, HandlerError> {
        match request.status.parse::<FirmwareStatus>() {
            Ok(status) => {
                info!(station_id, ?status, "FirmwareStatusNotification");
                self.repos.firmware().set_firmware_status(station_id, status);
            }
            Err(err) => {
                warn!(station_id, error = %err, "Ignoring FirmwareStatusNotification");
            }
        }
        Ok(Some(FirmwareStatusNotificationResponse {}))
    }
}

pub struct DiagnosticsStatusNotificationHandler {
    repos: Arc<dyn RepositoryProvider>,
}

impl DiagnosticsStatusNotificationHandler {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }
}

#[async_trait]
impl CallHandler for DiagnosticsStatusNotificationHandler {
    type Request = DiagnosticsStatusNotificationRequest;
    type Response = DiagnosticsStatusNotificationResponse;

    async fn handle_call(
        &self,
        station_id: &str,
        request: DiagnosticsStatusNotificationRequest,
    ) -> Result<Option<DiagnosticsStatusNotificationResponse>, HandlerError> {
        match request.status.parse::<DiagnosticsStatus>() {
            Ok(status) => {
                info!(station_id, ?status, "DiagnosticsStatusNotification");
                self.repos
                    .firmware()
                    .set_diagnostics_status(station_id, status);
            }
            Err(err) => {
                warn!(station_id, error = %err, "Ignoring DiagnosticsStatusNotification");
            }
        }
        Ok(Some(DiagnosticsStatusNotificationResponse {}))
    }
}
