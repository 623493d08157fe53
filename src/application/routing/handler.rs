//! Handler contract
//!
//! Business logic plugs into the router through two capability shapes:
//! [`CallHandler`] answers a station-initiated call, [`CallResultHandler`]
//! consumes the station's reply to a call this CSMS sent.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use super::router::RouterError;
use crate::application::calls::EmitError;
use crate::support::errors::DomainError;

#[derive(Debug, Error)]
pub enum HandlerError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("failed to send call: {0}")]
    Emit(#[from] EmitError),

    #[error("nested dispatch failed: {0}")]
    Routing(Box<RouterError>),

    #[error("{0}")]
    Failed(String),
}

impl From<RouterError> for HandlerError {
    fn from(err: RouterError) -> Self {
        Self::Routing(Box::new(err))
    }
}

#[async_trait]
pub trait CallHandler: Send + Sync + 'static {
    /// Built with `Default` when the payload is empty.
    type Request: DeserializeOwned + Default + Send + 'static;
    type Response: Serialize + Send + 'static;

    /// `Ok(None)` means the call is acknowledged without a body.
    async fn handle_call(
        &self,
        station_id: &str,
        request: Self::Request,
    ) -> Result<Option<Self::Response>, HandlerError>;
}

#[async_trait]
pub trait CallResultHandler: Send + Sync + 'static {
    type Request: DeserializeOwned + Default + Send + 'static;
    type Response: DeserializeOwned + Default + Send + 'static;

    async fn handle_call_result(
        &self,
        station_id: &str,
        request: Self::Request,
        response: Self::Response,
    ) -> Result<(), HandlerError>;
}
