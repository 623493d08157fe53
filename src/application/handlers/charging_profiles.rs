//! Result handlers for SetChargingProfile, ClearChargingProfile and
//! GetCompositeSchedule

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::application::routing::{CallResultHandler, HandlerError};
use crate::domain::charging_profile::{
    ChargingProfileCriteria, ChargingSchedule, CompositeScheduleQuery,
};
use crate::domain::RepositoryProvider;
use crate::ocpp::v16::{
    ChargingProfileStatus, ClearChargingProfileRequest, ClearChargingProfileResponse,
    ClearChargingProfileStatus, GetCompositeScheduleRequest, GetCompositeScheduleResponse,
    GetCompositeScheduleStatus, SetChargingProfileRequest, SetChargingProfileResponse,
};

/// Stores the profile once the station accepted it.
pub struct SetChargingProfileResultHandler {
    repos: Arc<dyn RepositoryProvider>,
}

impl SetChargingProfileResultHandler {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }
}

#[async_trait]
impl CallResultHandler for SetChargingProfileResultHandler {
    type Request = SetChargingProfileRequest;
    type Response = SetChargingProfileResponse;

    async fn handle_call_result(
        &self,
        station_id: &str,
        request: SetChargingProfileRequest,
        response: SetChargingProfileResponse,
    ) -> Result<(), HandlerError> {
        let profile = &request.cs_charging_profiles;
        if response.status != ChargingProfileStatus::Accepted {
            warn!(
                station_id,
                charging_profile_id = profile.charging_profile_id,
                status = ?response.status,
                "SetChargingProfile not accepted"
            );
            return Ok(());
        }

        info!(
            station_id,
            connector_id = request.connector_id,
            charging_profile_id = profile.charging_profile_id,
            purpose = ?profile.charging_profile_purpose,
            "Charging profile installed"
        );
        self.repos
            .charging_profiles()
            .set_charging_profile(profile.to_domain(station_id, request.connector_id));
        Ok(())
    }
}

/// Removes the profiles the station cleared.
pub struct ClearChargingProfileResultHandler {
    repos: Arc<dyn RepositoryProvider>,
}

impl ClearChargingProfileResultHandler {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }
}

#[async_trait]
impl CallResultHandler for ClearChargingProfileResultHandler {
    type Request = ClearChargingProfileRequest;
    type Response = ClearChargingProfileResponse;

    async fn handle_call_result(
        &self,
        station_id: &str,
        request: ClearChargingProfileRequest,
        response: ClearChargingProfileResponse,
    ) -> Result<(), HandlerError> {
        if response.status != ClearChargingProfileStatus::Accepted {
            info!(station_id, status = ?response.status, "ClearChargingProfile matched nothing");
            return Ok(());
        }

        let criteria = ChargingProfileCriteria {
            charging_profile_id: request.id,
            connector_id: request.connector_id,
            purpose: request.charging_profile_purpose,
            stack_level: request.stack_level,
        };
        let removed = self
            .repos
            .charging_profiles()
            .clear_charging_profile(station_id, &criteria);
        info!(station_id, removed, "Charging profiles cleared");
        Ok(())
    }
}

/// Logs the station's composite schedule next to the one computed from the
/// stored profiles.
pub struct GetCompositeScheduleResultHandler {
    repos: Arc<dyn RepositoryProvider>,
}

impl GetCompositeScheduleResultHandler {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }
}

fn same_periods(a: &ChargingSchedule, b: &ChargingSchedule) -> bool {
    a.charging_rate_unit == b.charging_rate_unit
        && a.charging_schedule_period.len() == b.charging_schedule_period.len()
        && a
            .charging_schedule_period
            .iter()
            .zip(&b.charging_schedule_period)
            .all(|(x, y)| x.start_period == y.start_period && x.limit == y.limit)
}

#[async_trait]
impl CallResultHandler for GetCompositeScheduleResultHandler {
    type Request = GetCompositeScheduleRequest;
    type Response = GetCompositeScheduleResponse;

    async fn handle_call_result(
        &self,
        station_id: &str,
        request: GetCompositeScheduleRequest,
        response: GetCompositeScheduleResponse,
    ) -> Result<(), HandlerError> {
        if response.status != GetCompositeScheduleStatus::Accepted {
            warn!(station_id, connector_id = request.connector_id, "GetCompositeSchedule rejected");
            return Ok(());
        }

        let query = CompositeScheduleQuery {
            connector_id: request.connector_id,
            duration: request.duration,
            charging_rate_unit: request.charging_rate_unit,
        };
        let expected = self
            .repos
            .charging_profiles()
            .get_composite_schedule(station_id, &query);

        match (&response.charging_schedule, &expected) {
            (Some(reported), Some(expected)) if same_periods(reported, expected) => {
                info!(station_id, connector_id = request.connector_id, "Composite schedule matches");
            }
            (None, None) => {
                info!(station_id, connector_id = request.connector_id, "No composite schedule");
            }
            (reported, expected) => {
                warn!(
                    station_id,
                    connector_id = request.connector_id,
                    ?reported,
                    ?expected,
                    "Composite schedule differs from stored profiles"
                );
            }
        }
        Ok(())
    }
}
