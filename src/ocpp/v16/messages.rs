//! OCPP 1.6 request/response payloads
//!
//! Station-initiated: Heartbeat, MeterValues, FirmwareStatusNotification,
//! DiagnosticsStatusNotification, DataTransfer.
//! CSMS-initiated: SetChargingProfile, ClearChargingProfile,
//! GetCompositeSchedule, ReserveNow, CancelReservation, SendLocalList,
//! GetLocalListVersion, DataTransfer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::types::*;
use crate::ocpp::Action;

// ============================================================================
// Heartbeat
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HeartbeatRequest {}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeartbeatResponse {
    pub current_time: DateTime<Utc>,
}

impl Action for HeartbeatRequest {
    const NAME: &'static str = "Heartbeat";
}

// ============================================================================
// MeterValues
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeterValuesRequest {
    pub connector_id: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<i32>,
    pub meter_value: Vec<MeterValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeterValuesResponse {}

impl Action for MeterValuesRequest {
    const NAME: &'static str = "MeterValues";
}

// ============================================================================
// FirmwareStatusNotification / DiagnosticsStatusNotification
// ============================================================================

/// `status` is kept as a string so that a non-conformant value can be
/// logged and acknowledged instead of failing the decode.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FirmwareStatusNotificationRequest {
    pub status: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FirmwareStatusNotificationResponse {}

impl Action for FirmwareStatusNotificationRequest {
    const NAME: &'static str = "FirmwareStatusNotification";
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticsStatusNotificationRequest {
    pub status: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticsStatusNotificationResponse {}

impl Action for DiagnosticsStatusNotificationRequest {
    const NAME: &'static str = "DiagnosticsStatusNotification";
}

// ============================================================================
// DataTransfer
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataTransferRequest {
    pub vendor_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataTransferResponse {
    pub status: DataTransferStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}

impl Action for DataTransferRequest {
    const NAME: &'static str = "DataTransfer";
}

// ============================================================================
// SetChargingProfile / ClearChargingProfile / GetCompositeSchedule
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetChargingProfileRequest {
    pub connector_id: i32,
    pub cs_charging_profiles: ChargingProfile,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SetChargingProfileResponse {
    pub status: ChargingProfileStatus,
}

impl Action for SetChargingProfileRequest {
    const NAME: &'static str = "SetChargingProfile";
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClearChargingProfileRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connector_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub charging_profile_purpose: Option<ChargingProfilePurpose>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack_level: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClearChargingProfileResponse {
    pub status: ClearChargingProfileStatus,
}

impl Action for ClearChargingProfileRequest {
    const NAME: &'static str = "ClearChargingProfile";
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetCompositeScheduleRequest {
    pub connector_id: i32,
    pub duration: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub charging_rate_unit: Option<ChargingRateUnit>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetCompositeScheduleResponse {
    pub status: GetCompositeScheduleStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connector_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule_start: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub charging_schedule: Option<ChargingSchedule>,
}

impl Action for GetCompositeScheduleRequest {
    const NAME: &'static str = "GetCompositeSchedule";
}

// ============================================================================
// ReserveNow / CancelReservation
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReserveNowRequest {
    pub connector_id: i32,
    pub expiry_date: DateTime<Utc>,
    pub id_tag: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id_tag: Option<String>,
    pub reservation_id: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReserveNowResponse {
    pub status: ReservationStatus,
}

impl Action for ReserveNowRequest {
    const NAME: &'static str = "ReserveNow";
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelReservationRequest {
    pub reservation_id: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CancelReservationResponse {
    pub status: CancelReservationStatus,
}

impl Action for CancelReservationRequest {
    const NAME: &'static str = "CancelReservation";
}

// ============================================================================
// SendLocalList / GetLocalListVersion
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendLocalListRequest {
    pub list_version: i32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub local_authorization_list: Vec<AuthorizationData>,
    pub update_type: UpdateType,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SendLocalListResponse {
    pub status: UpdateStatus,
}

impl Action for SendLocalListRequest {
    const NAME: &'static str = "SendLocalList";
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GetLocalListVersionRequest {}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetLocalListVersionResponse {
    pub list_version: i32,
}

impl Action for GetLocalListVersionRequest {
    const NAME: &'static str = "GetLocalListVersion";
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn meter_values_request_decodes() {
        let req: MeterValuesRequest = serde_json::from_value(json!({
            "connectorId": 2,
            "transactionId": 17,
            "meterValue": [{
                "timestamp": "2024-01-01T10:00:00+02:00",
                "sampledValue": [{ "value": "1234", "measurand": "Energy.Active.Import.Register" }]
            }]
        }))
        .unwrap();
        assert_eq!(req.connector_id, 2);
        assert_eq!(req.transaction_id, Some(17));
        assert_eq!(
            req.meter_value[0].sampled_value[0].measurand.as_deref(),
            Some("Energy.Active.Import.Register")
        );
    }

    #[test]
    fn send_local_list_omits_empty_list() {
        let req = SendLocalListRequest {
            list_version: 3,
            local_authorization_list: Vec::new(),
            update_type: UpdateType::Differential,
        };
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({ "listVersion": 3, "updateType": "Differential" })
        );
    }

    #[test]
    fn data_transfer_status_spelling() {
        let resp = DataTransferResponse {
            status: DataTransferStatus::UnknownVendorId,
            data: None,
        };
        assert_eq!(
            serde_json::to_value(&resp).unwrap(),
            json!({ "status": "UnknownVendorId" })
        );
    }
}
