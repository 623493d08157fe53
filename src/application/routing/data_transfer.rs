//! DataTransfer sub-router
//!
//! Vendor payloads travel as an opaque string inside DataTransfer. The
//! handlers here route them by (vendor id, message id) and run the same
//! validate/decode/invoke/encode pipeline as the top-level router. Message
//! id `""` is the vendor-default route and also matches a missing id.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{info, warn};

use super::handler::{CallHandler, CallResultHandler, HandlerError};
use super::route::{CallResultRoute, CallRoute};
use super::router::RouterError;
use super::schema::SchemaValidator;
use crate::ocpp::v16::{DataTransferRequest, DataTransferResponse, DataTransferStatus};

pub fn vendor_request_schema(vendor_id: &str, message_id: &str) -> String {
    format!("{}/{}Request.json", vendor_id, message_id)
}

pub fn vendor_response_schema(vendor_id: &str, message_id: &str) -> String {
    format!("{}/{}Response.json", vendor_id, message_id)
}

/// Routes of a single vendor, keyed by message id.
#[derive(Clone)]
pub struct VendorRoutes {
    vendor_id: String,
    calls: HashMap<String, CallRoute>,
    call_results: HashMap<String, CallResultRoute>,
}

impl VendorRoutes {
    pub fn new(vendor_id: impl Into<String>) -> Self {
        Self {
            vendor_id: vendor_id.into(),
            calls: HashMap::new(),
            call_results: HashMap::new(),
        }
    }

    /// Handle `message_id` with the conventional vendor schema names.
    pub fn call<H: CallHandler>(self, message_id: &str, handler: H) -> Self {
        let route = CallRoute::new(
            vendor_request_schema(&self.vendor_id, message_id),
            vendor_response_schema(&self.vendor_id, message_id),
            handler,
        );
        self.call_route(message_id, route)
    }

    pub fn call_route(mut self, message_id: impl Into<String>, route: CallRoute) -> Self {
        self.calls.insert(message_id.into(), route);
        self
    }

    pub fn call_result<H: CallResultHandler>(self, message_id: &str, handler: H) -> Self {
        let route = CallResultRoute::new(
            vendor_request_schema(&self.vendor_id, message_id),
            vendor_response_schema(&self.vendor_id, message_id),
            handler,
        );
        self.call_result_route(message_id, route)
    }

    pub fn call_result_route(
        mut self,
        message_id: impl Into<String>,
        route: CallResultRoute,
    ) -> Self {
        self.call_results.insert(message_id.into(), route);
        self
    }
}

/// Route table keyed by vendor id, then message id.
#[derive(Clone, Default)]
pub struct DataTransferRoutes {
    vendors: HashMap<String, VendorRoutes>,
}

impl DataTransferRoutes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vendor(mut self, routes: VendorRoutes) -> Self {
        self.vendors.insert(routes.vendor_id.clone(), routes);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.vendors.is_empty()
    }

    fn vendor_routes(&self, vendor_id: &str) -> Result<&VendorRoutes, RouterError> {
        self.vendors
            .get(vendor_id)
            .ok_or_else(|| RouterError::UnknownVendor(vendor_id.to_string()))
    }

    fn unknown_message(vendor_id: &str, message_id: &str) -> RouterError {
        RouterError::UnknownMessage {
            vendor_id: vendor_id.to_string(),
            message_id: message_id.to_string(),
        }
    }

    pub fn call_route(&self, vendor_id: &str, message_id: &str) -> Result<&CallRoute, RouterError> {
        self.vendor_routes(vendor_id)?
            .calls
            .get(message_id)
            .ok_or_else(|| Self::unknown_message(vendor_id, message_id))
    }

    pub fn call_result_route(
        &self,
        vendor_id: &str,
        message_id: &str,
    ) -> Result<&CallResultRoute, RouterError> {
        self.vendor_routes(vendor_id)?
            .call_results
            .get(message_id)
            .ok_or_else(|| Self::unknown_message(vendor_id, message_id))
    }

    /// Build an outbound DataTransfer request carrying `payload`. The
    /// encoded payload is validated against the request schema of the
    /// result route that will handle the station's answer.
    pub fn encode_outbound<T: Serialize>(
        &self,
        validator: &dyn SchemaValidator,
        vendor_id: &str,
        message_id: &str,
        payload: &T,
    ) -> Result<DataTransferRequest, RouterError> {
        let route = self.call_result_route(vendor_id, message_id)?;
        let data = serde_json::to_string(payload).map_err(RouterError::Encode)?;
        validator
            .validate(data.as_bytes(), route.request_schema())
            .map_err(|source| RouterError::Validation {
                schema: route.request_schema().to_string(),
                source,
            })?;

        Ok(DataTransferRequest {
            vendor_id: vendor_id.to_string(),
            message_id: (!message_id.is_empty()).then(|| message_id.to_string()),
            data: Some(data),
        })
    }
}

fn label(vendor_id: &str, message_id: &str) -> String {
    format!("DataTransfer/{}/{}", vendor_id, message_id)
}

/// Inbound DataTransfer. Unknown vendor or message ids are answered with
/// the matching status, not an error.
pub struct DataTransferCallHandler {
    routes: Arc<DataTransferRoutes>,
    validator: Arc<dyn SchemaValidator>,
}

impl DataTransferCallHandler {
    pub fn new(routes: Arc<DataTransferRoutes>, validator: Arc<dyn SchemaValidator>) -> Self {
        Self { routes, validator }
    }
}

#[async_trait]
impl CallHandler for DataTransferCallHandler {
    type Request = DataTransferRequest;
    type Response = DataTransferResponse;

    async fn handle_call(
        &self,
        station_id: &str,
        request: DataTransferRequest,
    ) -> Result<Option<DataTransferResponse>, HandlerError> {
        let vendor_id = request.vendor_id.as_str();
        let message_id = request.message_id.as_deref().unwrap_or("");

        let route = match self.routes.call_route(vendor_id, message_id) {
            Ok(route) => route,
            Err(err) => {
                let status = match err {
                    RouterError::UnknownVendor(_) => DataTransferStatus::UnknownVendorId,
                    _ => DataTransferStatus::UnknownMessageId,
                };
                info!(station_id, vendor_id, message_id, ?status, "Unroutable DataTransfer");
                return Ok(Some(DataTransferResponse { status, data: None }));
            }
        };

        let payload = request.data.as_deref().unwrap_or("").as_bytes();
        let response = route
            .execute(
                self.validator.as_ref(),
                station_id,
                &label(vendor_id, message_id),
                payload,
            )
            .await?;

        let data = response
            .map(String::from_utf8)
            .transpose()
            .map_err(|e| HandlerError::Failed(format!("vendor response is not UTF-8: {}", e)))?;

        Ok(Some(DataTransferResponse {
            status: DataTransferStatus::Accepted,
            data,
        }))
    }
}

/// Result of a DataTransfer this CSMS sent. An unknown vendor or message
/// id is a correlation failure and is returned as an error.
pub struct DataTransferResultHandler {
    routes: Arc<DataTransferRoutes>,
    validator: Arc<dyn SchemaValidator>,
}

impl DataTransferResultHandler {
    pub fn new(routes: Arc<DataTransferRoutes>, validator: Arc<dyn SchemaValidator>) -> Self {
        Self { routes, validator }
    }
}

#[async_trait]
impl CallResultHandler for DataTransferResultHandler {
    type Request = DataTransferRequest;
    type Response = DataTransferResponse;

    async fn handle_call_result(
        &self,
        station_id: &str,
        request: DataTransferRequest,
        response: DataTransferResponse,
    ) -> Result<(), HandlerError> {
        let vendor_id = request.vendor_id.as_str();
        let message_id = request.message_id.as_deref().unwrap_or("");
        let route = self.routes.call_result_route(vendor_id, message_id)?;

        if response.status != DataTransferStatus::Accepted {
            warn!(
                station_id,
                vendor_id,
                message_id,
                status = ?response.status,
                "DataTransfer not accepted by station"
            );
            return Ok(());
        }

        route
            .execute(
                self.validator.as_ref(),
                station_id,
                request.data.as_deref().unwrap_or("").as_bytes(),
                response.data.as_deref().unwrap_or("").as_bytes(),
            )
            .await?;
        Ok(())
    }
}
