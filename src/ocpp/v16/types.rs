//! OCPP 1.6 datatypes and status enumerations
//!
//! Types that are also domain concepts are defined in the domain layer and
//! re-exported here under their OCPP names.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use crate::domain::charging_profile::{
    ChargingProfileKind, ChargingProfilePurpose, ChargingRateUnit, ChargingSchedule,
    ChargingSchedulePeriod, RecurrencyKind,
};
pub use crate::domain::local_auth::{AuthorizationStatus, IdTagInfo, UpdateType};
pub use crate::domain::meter_value::SampledValue;

/// `AuthorizationData` of SendLocalList. A missing `idTagInfo` removes the
/// tag in a differential update.
pub type AuthorizationData = crate::domain::local_auth::LocalAuthListEntry;

// ============================================================================
// Datatypes
// ============================================================================

/// `csChargingProfiles` of SetChargingProfile
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargingProfile {
    pub charging_profile_id: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<i32>,
    pub stack_level: i32,
    pub charging_profile_purpose: ChargingProfilePurpose,
    pub charging_profile_kind: ChargingProfileKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recurrency_kind: Option<RecurrencyKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_from: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_to: Option<DateTime<Utc>>,
    pub charging_schedule: ChargingSchedule,
}

impl ChargingProfile {
    /// Domain profile installed on `connector_id` of a station.
    pub fn to_domain(
        &self,
        charge_station_id: &str,
        connector_id: i32,
    ) -> crate::domain::charging_profile::ChargingProfile {
        crate::domain::charging_profile::ChargingProfile {
            charge_station_id: charge_station_id.to_string(),
            connector_id,
            charging_profile_id: self.charging_profile_id,
            stack_level: self.stack_level,
            purpose: self.charging_profile_purpose,
            kind: self.charging_profile_kind,
            recurrency_kind: self.recurrency_kind,
            valid_from: self.valid_from,
            valid_to: self.valid_to,
            charging_schedule: self.charging_schedule.clone(),
        }
    }
}

/// `meterValue` element of MeterValues
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeterValue {
    pub timestamp: DateTime<Utc>,
    pub sampled_value: Vec<SampledValue>,
}

// ============================================================================
// Status enumerations
// ============================================================================
//
// Defaults never mean acceptance: a result that decodes to a default status
// must not be acted on.

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChargingProfileStatus {
    Accepted,
    #[default]
    Rejected,
    NotSupported,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClearChargingProfileStatus {
    Accepted,
    #[default]
    Unknown,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GetCompositeScheduleStatus {
    Accepted,
    #[default]
    Rejected,
}

/// Result of ReserveNow
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReservationStatus {
    Accepted,
    Faulted,
    Occupied,
    #[default]
    Rejected,
    Unavailable,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CancelReservationStatus {
    Accepted,
    #[default]
    Rejected,
}

/// Result of SendLocalList
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpdateStatus {
    Accepted,
    #[default]
    Failed,
    NotSupported,
    VersionMismatch,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataTransferStatus {
    Accepted,
    #[default]
    Rejected,
    UnknownMessageId,
    UnknownVendorId,
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use serde_json::json;

    use super::*;

    #[test]
    fn charging_profile_decodes_ocpp_json() {
        let profile: ChargingProfile = serde_json::from_value(json!({
            "chargingProfileId": 1,
            "stackLevel": 0,
            "chargingProfilePurpose": "TxDefaultProfile",
            "chargingProfileKind": "Absolute",
            "chargingSchedule": {
                "chargingRateUnit": "W",
                "chargingSchedulePeriod": [{ "startPeriod": 0, "limit": 7400.0 }]
            }
        }))
        .unwrap();

        let domain = profile.to_domain("CS001", 1);
        assert_eq!(domain.charge_station_id, "CS001");
        assert_eq!(domain.connector_id, 1);
        assert_eq!(domain.purpose, ChargingProfilePurpose::TxDefaultProfile);
        assert_eq!(
            domain.charging_schedule.charging_schedule_period[0].limit,
            Decimal::from(7400)
        );
    }

    #[test]
    fn authorization_data_without_info_omits_field() {
        let data = AuthorizationData {
            id_tag: "TAG".into(),
            id_tag_info: None,
        };
        assert_eq!(serde_json::to_value(&data).unwrap(), json!({ "idTag": "TAG" }));
    }

    #[test]
    fn result_statuses_default_to_refusal() {
        assert_eq!(ChargingProfileStatus::default(), ChargingProfileStatus::Rejected);
        assert_eq!(ClearChargingProfileStatus::default(), ClearChargingProfileStatus::Unknown);
        assert_eq!(GetCompositeScheduleStatus::default(), GetCompositeScheduleStatus::Rejected);
        assert_eq!(ReservationStatus::default(), ReservationStatus::Rejected);
        assert_eq!(CancelReservationStatus::default(), CancelReservationStatus::Rejected);
        assert_eq!(UpdateStatus::default(), UpdateStatus::Failed);
        assert_eq!(DataTransferStatus::default(), DataTransferStatus::Rejected);
    }
}
