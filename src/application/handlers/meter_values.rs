//! MeterValues handler

use std::sync::Arc;

use async_trait::async_trait;
use chrono::SecondsFormat;
use tracing::info;

use crate::application::routing::{CallHandler, HandlerError};
use crate::domain::meter_value::MeterValue;
use crate::domain::RepositoryProvider;
use crate::ocpp::v16::{MeterValuesRequest, MeterValuesResponse};

/// Appends readings to the (station, connector) series. Timestamps are
/// stored as UTC RFC 3339 with millisecond precision so that string order
/// matches time order.
pub struct MeterValuesHandler {
    repos: Arc<dyn RepositoryProvider>,
}

impl MeterValuesHandler {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }
}

#[async_trait]
impl CallHandler for MeterValuesHandler {
    type Request = MeterValuesRequest;
    type Response = MeterValuesResponse;

    async fn handle_call(
        &self,
        station_id: &str,
        request: MeterValuesRequest,
    ) -> Result<Option<MeterValuesResponse>, HandlerError> {
        let transaction_id = request
            .transaction_id
            .map(|id| id.to_string())
            .unwrap_or_default();
        let values: Vec<MeterValue> = request
            .meter_value
            .into_iter()
            .map(|mv| MeterValue {
                timestamp: mv.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
                sampled_values: mv.sampled_value,
            })
            .collect();

        info!(
            station_id,
            connector_id = request.connector_id,
            transaction_id = transaction_id.as_str(),
            count = values.len(),
            "MeterValues"
        );
        self.repos.meter_values().append_meter_values(
            station_id,
            request.connector_id,
            &transaction_id,
            values,
        );

        Ok(Some(MeterValuesResponse {}))
    }
}
