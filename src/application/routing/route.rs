//! Route descriptors
//!
//! A route pairs a typed handler with the schema names of its payloads.
//! Handlers are type-erased behind a byte-level interface so one table can
//! hold heterogeneous request and response types. The same pipeline runs
//! for top-level actions and for vendor messages nested in DataTransfer.

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::warn;

use super::handler::{CallHandler, CallResultHandler};
use super::router::RouterError;
use super::schema::SchemaValidator;
use crate::ocpp::{request_schema, response_schema};

/// Decode a payload; an empty payload yields the default value.
pub(crate) fn decode<T: DeserializeOwned + Default>(payload: &[u8]) -> Result<T, RouterError> {
    if payload.is_empty() {
        return Ok(T::default());
    }
    serde_json::from_slice(payload).map_err(RouterError::Decode)
}

#[async_trait]
trait ErasedCall: Send + Sync {
    async fn call(&self, station_id: &str, payload: &[u8])
        -> Result<Option<Vec<u8>>, RouterError>;
}

#[async_trait]
trait ErasedCallResult: Send + Sync {
    async fn call_result(
        &self,
        station_id: &str,
        request: &[u8],
        response: &[u8],
    ) -> Result<(), RouterError>;
}

struct TypedCall<H>(H);

#[async_trait]
impl<H: CallHandler> ErasedCall for TypedCall<H> {
    async fn call(
        &self,
        station_id: &str,
        payload: &[u8],
    ) -> Result<Option<Vec<u8>>, RouterError> {
        let request = decode::<H::Request>(payload)?;
        let response = self.0.handle_call(station_id, request).await?;
        response
            .map(|r| serde_json::to_vec(&r).map_err(RouterError::Encode))
            .transpose()
    }
}

struct TypedCallResult<H>(H);

#[async_trait]
impl<H: CallResultHandler> ErasedCallResult for TypedCallResult<H> {
    async fn call_result(
        &self,
        station_id: &str,
        request: &[u8],
        response: &[u8],
    ) -> Result<(), RouterError> {
        let request = decode::<H::Request>(request)?;
        let response = decode::<H::Response>(response)?;
        self.0
            .handle_call_result(station_id, request, response)
            .await?;
        Ok(())
    }
}

/// Route for an inbound call.
#[derive(Clone)]
pub struct CallRoute {
    request_schema: String,
    response_schema: String,
    handler: Arc<dyn ErasedCall>,
}

impl CallRoute {
    pub fn new<H: CallHandler>(
        request_schema: impl Into<String>,
        response_schema: impl Into<String>,
        handler: H,
    ) -> Self {
        Self {
            request_schema: request_schema.into(),
            response_schema: response_schema.into(),
            handler: Arc::new(TypedCall(handler)),
        }
    }

    /// Route using the OCPP 1.6 schema names of `action`.
    pub fn ocpp16<H: CallHandler>(action: &str, handler: H) -> Self {
        Self::new(request_schema(action), response_schema(action), handler)
    }

    pub fn request_schema(&self) -> &str {
        &self.request_schema
    }

    pub fn response_schema(&self) -> &str {
        &self.response_schema
    }

    /// Validate, decode, invoke, encode, validate. A response that fails
    /// its schema is still returned; the failure is logged and counted.
    pub(crate) async fn execute(
        &self,
        validator: &dyn SchemaValidator,
        station_id: &str,
        label: &str,
        payload: &[u8],
    ) -> Result<Option<Vec<u8>>, RouterError> {
        if !payload.is_empty() {
            validator
                .validate(payload, &self.request_schema)
                .map_err(|source| RouterError::Validation {
                    schema: self.request_schema.clone(),
                    source,
                })?;
        }

        let response = self.handler.call(station_id, payload).await?;

        if let Some(bytes) = &response {
            if let Err(err) = validator.validate(bytes, &self.response_schema) {
                warn!(
                    station_id,
                    action = label,
                    schema = self.response_schema.as_str(),
                    error = %err,
                    "Response failed schema validation, sending anyway"
                );
                metrics::counter!(
                    "ocpp_response_schema_violations_total",
                    "action" => label.to_owned()
                )
                .increment(1);
            }
        }

        Ok(response)
    }
}

/// Route for the result of a call this CSMS sent.
#[derive(Clone)]
pub struct CallResultRoute {
    request_schema: String,
    response_schema: String,
    handler: Arc<dyn ErasedCallResult>,
}

impl CallResultRoute {
    pub fn new<H: CallResultHandler>(
        request_schema: impl Into<String>,
        response_schema: impl Into<String>,
        handler: H,
    ) -> Self {
        Self {
            request_schema: request_schema.into(),
            response_schema: response_schema.into(),
            handler: Arc::new(TypedCallResult(handler)),
        }
    }

    pub fn ocpp16<H: CallResultHandler>(action: &str, handler: H) -> Self {
        Self::new(request_schema(action), response_schema(action), handler)
    }

    pub fn request_schema(&self) -> &str {
        &self.request_schema
    }

    pub fn response_schema(&self) -> &str {
        &self.response_schema
    }

    /// The echoed request was produced by this CSMS and is decoded as is;
    /// the station's result is validated first.
    pub(crate) async fn execute(
        &self,
        validator: &dyn SchemaValidator,
        station_id: &str,
        request: &[u8],
        result: &[u8],
    ) -> Result<(), RouterError> {
        if !result.is_empty() {
            validator
                .validate(result, &self.response_schema)
                .map_err(|source| RouterError::Validation {
                    schema: self.response_schema.clone(),
                    source,
                })?;
        }
        self.handler.call_result(station_id, request, result).await
    }
}
