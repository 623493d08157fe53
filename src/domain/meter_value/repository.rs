//! Meter value repository interface

use super::model::{MeterValue, MeterValuePage, MeterValueQuery, StoredMeterValue};

pub trait MeterValueRepository: Send + Sync {
    /// Append to the (station, evse) series, keeping it newest-first.
    fn append_meter_values(
        &self,
        charge_station_id: &str,
        evse_id: i32,
        transaction_id: &str,
        values: Vec<MeterValue>,
    );

    /// Newest-first series; at most `limit` entries when `limit > 0`.
    fn get_meter_values(
        &self,
        charge_station_id: &str,
        evse_id: i32,
        limit: usize,
    ) -> Vec<StoredMeterValue>;

    fn query_meter_values(&self, query: &MeterValueQuery) -> MeterValuePage;
}
