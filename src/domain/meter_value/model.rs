//! Meter value time-series entities

use serde::{Deserialize, Serialize};

/// A single sampled value as reported by the station. Optional
/// qualifiers are kept verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SampledValue {
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub measurand: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phase: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

/// Sampled values taken at one instant. `timestamp` is a UTC RFC 3339
/// string in a fixed format, so string order is time order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MeterValue {
    pub timestamp: String,
    pub sampled_values: Vec<SampledValue>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredMeterValue {
    pub charge_station_id: String,
    pub evse_id: i32,
    /// Empty when the reading is not tied to a transaction.
    pub transaction_id: String,
    pub meter_value: MeterValue,
}

/// Filter and pagination for [`MeterValueRepository::query_meter_values`].
///
/// Time bounds are inclusive and compared as strings. A `limit` of 0
/// returns everything after `offset`.
///
/// [`MeterValueRepository::query_meter_values`]: super::MeterValueRepository::query_meter_values
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MeterValueQuery {
    pub charge_station_id: String,
    pub connector_id: Option<i32>,
    pub transaction_id: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub offset: usize,
    pub limit: usize,
}

impl MeterValueQuery {
    pub fn for_station(charge_station_id: impl Into<String>) -> Self {
        Self {
            charge_station_id: charge_station_id.into(),
            ..Default::default()
        }
    }

    pub fn matches(&self, stored: &StoredMeterValue) -> bool {
        let ts = stored.meter_value.timestamp.as_str();
        stored.charge_station_id == self.charge_station_id
            && self.connector_id.map_or(true, |id| id == stored.evse_id)
            && self
                .transaction_id
                .as_deref()
                .map_or(true, |tx| tx == stored.transaction_id)
            && self.start_time.as_deref().map_or(true, |start| ts >= start)
            && self.end_time.as_deref().map_or(true, |end| ts <= end)
    }
}

/// One page of query results plus the pre-pagination total.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MeterValuePage {
    pub items: Vec<StoredMeterValue>,
    pub total: usize,
}
