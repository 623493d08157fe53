//! Action router
//!
//! Dispatches inbound calls by action name and call results by the action
//! name of the original outbound call. Route tables are immutable once
//! built, so one router can serve every station session concurrently.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use thiserror::Error;
use tracing::{debug, warn};

use super::handler::HandlerError;
use super::route::{CallResultRoute, CallRoute};
use super::schema::{SchemaError, SchemaValidator};

#[derive(Debug, Error)]
pub enum RouterError {
    #[error("no route for action '{action}'")]
    NoRoute { action: String },

    #[error("payload does not match schema '{schema}': {source}")]
    Validation {
        schema: String,
        #[source]
        source: SchemaError,
    },

    #[error("failed to decode payload: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("failed to encode response: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("handler failed: {0}")]
    Handler(#[from] HandlerError),

    #[error("unknown vendor id '{0}'")]
    UnknownVendor(String),

    #[error("unknown message id '{message_id}' for vendor '{vendor_id}'")]
    UnknownMessage {
        vendor_id: String,
        message_id: String,
    },
}

impl RouterError {
    /// OCPP 1.6 CallError code reported to the station.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NoRoute { .. } => "NotImplemented",
            Self::Validation { .. } | Self::Decode(_) => "FormationViolation",
            Self::UnknownVendor(_) | Self::UnknownMessage { .. } => "NotSupported",
            Self::Encode(_) => "InternalError",
            Self::Handler(HandlerError::Routing(inner)) => inner.error_code(),
            Self::Handler(_) => "InternalError",
        }
    }
}

fn record_dispatch(kind: &'static str, action: &str, start: Instant) {
    let counter = match kind {
        "call" => "ocpp_calls_total",
        _ => "ocpp_call_results_total",
    };
    metrics::counter!(counter, "action" => action.to_owned()).increment(1);
    metrics::histogram!(
        "ocpp_dispatch_latency_seconds",
        "action" => action.to_owned(),
        "kind" => kind
    )
    .record(start.elapsed().as_secs_f64());
}

pub struct Router {
    validator: Arc<dyn SchemaValidator>,
    calls: HashMap<String, CallRoute>,
    call_results: HashMap<String, CallResultRoute>,
}

pub struct RouterBuilder {
    validator: Arc<dyn SchemaValidator>,
    calls: HashMap<String, CallRoute>,
    call_results: HashMap<String, CallResultRoute>,
}

impl RouterBuilder {
    /// Register the route for an inbound call. A later registration for the
    /// same action replaces the earlier one.
    pub fn call(mut self, action: impl Into<String>, route: CallRoute) -> Self {
        self.calls.insert(action.into(), route);
        self
    }

    /// Register the route for results of an outbound call.
    pub fn call_result(mut self, action: impl Into<String>, route: CallResultRoute) -> Self {
        self.call_results.insert(action.into(), route);
        self
    }

    pub fn build(self) -> Router {
        Router {
            validator: self.validator,
            calls: self.calls,
            call_results: self.call_results,
        }
    }
}

impl Router {
    pub fn builder(validator: Arc<dyn SchemaValidator>) -> RouterBuilder {
        RouterBuilder {
            validator,
            calls: HashMap::new(),
            call_results: HashMap::new(),
        }
    }

    pub fn has_call_route(&self, action: &str) -> bool {
        self.calls.contains_key(action)
    }

    pub fn has_call_result_route(&self, action: &str) -> bool {
        self.call_results.contains_key(action)
    }

    /// Handle an inbound call. `Ok(None)` means the handler produced no
    /// response body.
    pub async fn dispatch(
        &self,
        station_id: &str,
        action: &str,
        payload: &[u8],
    ) -> Result<Option<Vec<u8>>, RouterError> {
        let start = Instant::now();
        let route = self.calls.get(action).ok_or_else(|| RouterError::NoRoute {
            action: action.to_string(),
        })?;

        debug!(station_id, action, bytes = payload.len(), "Dispatching call");
        let result = route
            .execute(self.validator.as_ref(), station_id, action, payload)
            .await;
        record_dispatch("call", action, start);

        if let Err(err) = &result {
            warn!(station_id, action, error = %err, "Call dispatch failed");
        }
        result
    }

    /// Handle the result of an outbound call. `action` is the action name
    /// of the original call, `request` the payload that was sent. An empty
    /// `result` is rejected before the handler runs.
    pub async fn dispatch_result(
        &self,
        station_id: &str,
        action: &str,
        request: &[u8],
        result: &[u8],
    ) -> Result<(), RouterError> {
        let start = Instant::now();
        let route = self
            .call_results
            .get(action)
            .ok_or_else(|| RouterError::NoRoute {
                action: action.to_string(),
            })?;

        debug!(station_id, action, "Dispatching call result");
        // A station result always carries a body; `null` or nothing is not
        // an answer.
        let outcome = if result.is_empty() {
            Err(RouterError::Validation {
                schema: route.response_schema().to_string(),
                source: SchemaError::Invalid("call result has no payload".to_string()),
            })
        } else {
            route
                .execute(self.validator.as_ref(), station_id, request, result)
                .await
        };
        record_dispatch("call_result", action, start);

        if let Err(err) = &outcome {
            warn!(station_id, action, error = %err, "Call result dispatch failed");
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use parking_lot::Mutex;
    use serde::{Deserialize, Serialize};

    use super::*;
    use crate::application::routing::handler::{CallHandler, CallResultHandler};
    use crate::application::routing::schema::{PermissiveValidator, WellFormedJsonValidator};

    #[derive(Debug, Default, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct EchoRequest {
        text: String,
    }

    #[derive(Debug, Serialize)]
    struct EchoResponse {
        text: String,
    }

    #[derive(Default)]
    struct Echo {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl CallHandler for Arc<Echo> {
        type Request = EchoRequest;
        type Response = EchoResponse;

        async fn handle_call(
            &self,
            _station_id: &str,
            request: EchoRequest,
        ) -> Result<Option<EchoResponse>, HandlerError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if request.text == "fail" {
                return Err(HandlerError::Failed("asked to fail".into()));
            }
            if request.text.is_empty() {
                return Ok(None);
            }
            Ok(Some(EchoResponse { text: request.text }))
        }
    }

    /// Produces a response that is not a JSON object.
    struct Scalar;

    #[async_trait]
    impl CallHandler for Scalar {
        type Request = EchoRequest;
        type Response = u32;

        async fn handle_call(
            &self,
            _station_id: &str,
            _request: EchoRequest,
        ) -> Result<Option<u32>, HandlerError> {
            Ok(Some(7))
        }
    }

    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<(String, String, String)>>,
    }

    #[async_trait]
    impl CallResultHandler for Arc<Recorder> {
        type Request = EchoRequest;
        type Response = EchoRequest;

        async fn handle_call_result(
            &self,
            station_id: &str,
            request: EchoRequest,
            response: EchoRequest,
        ) -> Result<(), HandlerError> {
            self.seen
                .lock()
                .push((station_id.to_string(), request.text, response.text));
            Ok(())
        }
    }

    fn router(echo: &Arc<Echo>, recorder: &Arc<Recorder>) -> Router {
        Router::builder(Arc::new(WellFormedJsonValidator))
            .call("Echo", CallRoute::new("EchoRequest", "EchoResponse", echo.clone()))
            .call("Scalar", CallRoute::new("EchoRequest", "ScalarResponse", Scalar))
            .call_result(
                "Echo",
                CallResultRoute::new("EchoRequest", "EchoResponse", recorder.clone()),
            )
            .build()
    }

    #[tokio::test]
    async fn dispatch_round_trips_through_handler() {
        let echo = Arc::new(Echo::default());
        let router = router(&echo, &Arc::default());

        let response = router
            .dispatch("CS001", "Echo", br#"{"text":"hi"}"#)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(response, br#"{"text":"hi"}"#.to_vec());
        assert_eq!(echo.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn unknown_action_is_no_route() {
        let router = router(&Arc::default(), &Arc::default());
        let err = router.dispatch("CS001", "echo", b"{}").await.unwrap_err();
        assert!(matches!(err, RouterError::NoRoute { ref action } if action == "echo"));
        assert_eq!(err.error_code(), "NotImplemented");
    }

    #[tokio::test]
    async fn invalid_request_never_reaches_handler() {
        let echo = Arc::new(Echo::default());
        let router = router(&echo, &Arc::default());

        let err = router.dispatch("CS001", "Echo", b"[]").await.unwrap_err();
        assert!(matches!(err, RouterError::Validation { ref schema, .. } if schema == "EchoRequest"));
        assert_eq!(err.error_code(), "FormationViolation");
        assert_eq!(echo.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn undecodable_request_is_decode_error() {
        let echo = Arc::new(Echo::default());
        let router = router(&echo, &Arc::default());

        let err = router
            .dispatch("CS001", "Echo", br#"{"text":5}"#)
            .await
            .unwrap_err();
        assert!(matches!(err, RouterError::Decode(_)));
        assert_eq!(echo.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn empty_payload_reaches_handler_as_default() {
        let echo = Arc::new(Echo::default());
        let router = router(&echo, &Arc::default());

        let response = router.dispatch("CS001", "Echo", b"").await.unwrap();
        assert!(response.is_none());
        assert_eq!(echo.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn handler_error_propagates() {
        let router = router(&Arc::default(), &Arc::default());
        let err = router
            .dispatch("CS001", "Echo", br#"{"text":"fail"}"#)
            .await
            .unwrap_err();
        assert!(matches!(err, RouterError::Handler(HandlerError::Failed(_))));
        assert_eq!(err.error_code(), "InternalError");
    }

    #[tokio::test]
    async fn invalid_response_is_still_returned() {
        let router = router(&Arc::default(), &Arc::default());
        let response = router.dispatch("CS001", "Scalar", b"{}").await.unwrap();
        assert_eq!(response, Some(b"7".to_vec()));
    }

    #[tokio::test]
    async fn dispatch_result_decodes_request_and_result() {
        let recorder = Arc::new(Recorder::default());
        let router = router(&Arc::default(), &recorder);

        router
            .dispatch_result("CS001", "Echo", br#"{"text":"ping"}"#, br#"{"text":"pong"}"#)
            .await
            .unwrap();
        assert_eq!(
            recorder.seen.lock().clone(),
            vec![("CS001".to_string(), "ping".to_string(), "pong".to_string())]
        );
    }

    #[tokio::test]
    async fn dispatch_result_validates_result_only() {
        let recorder = Arc::new(Recorder::default());
        let router = router(&Arc::default(), &recorder);

        let err = router
            .dispatch_result("CS001", "Echo", br#"{"text":"ping"}"#, b"7")
            .await
            .unwrap_err();
        assert!(matches!(err, RouterError::Validation { ref schema, .. } if schema == "EchoResponse"));

        let err = router
            .dispatch_result("CS001", "Scalar", b"{}", b"{}")
            .await
            .unwrap_err();
        assert!(matches!(err, RouterError::NoRoute { .. }));
        assert!(recorder.seen.lock().is_empty());
    }

    #[tokio::test]
    async fn empty_result_never_reaches_handler() {
        let recorder = Arc::new(Recorder::default());
        let router = Router::builder(Arc::new(PermissiveValidator))
            .call_result(
                "Echo",
                CallResultRoute::new("EchoRequest", "EchoResponse", recorder.clone()),
            )
            .build();

        let err = router
            .dispatch_result("CS001", "Echo", br#"{"text":"ping"}"#, b"")
            .await
            .unwrap_err();
        assert!(matches!(err, RouterError::Validation { ref schema, .. } if schema == "EchoResponse"));
        assert_eq!(err.error_code(), "FormationViolation");
        assert!(recorder.seen.lock().is_empty());
    }

    #[tokio::test]
    async fn later_registration_replaces_route() {
        let first = Arc::new(Echo::default());
        let second = Arc::new(Echo::default());
        let router = Router::builder(Arc::new(PermissiveValidator))
            .call("Echo", CallRoute::new("a", "b", first.clone()))
            .call("Echo", CallRoute::new("a", "b", second.clone()))
            .build();

        router.dispatch("CS001", "Echo", br#"{"text":"x"}"#).await.unwrap();
        assert_eq!(first.calls.load(Ordering::SeqCst), 0);
        assert_eq!(second.calls.load(Ordering::SeqCst), 1);
    }
}
