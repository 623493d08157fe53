//! Closed set of calls this CSMS sends to stations

use crate::ocpp::v16::{
    CancelReservationRequest, ClearChargingProfileRequest, DataTransferRequest,
    GetCompositeScheduleRequest, GetLocalListVersionRequest, ReserveNowRequest,
    SendLocalListRequest, SetChargingProfileRequest,
};
use crate::ocpp::Action;

#[derive(Debug, Clone, PartialEq)]
pub enum OutboundCall {
    SetChargingProfile(SetChargingProfileRequest),
    ClearChargingProfile(ClearChargingProfileRequest),
    GetCompositeSchedule(GetCompositeScheduleRequest),
    ReserveNow(ReserveNowRequest),
    CancelReservation(CancelReservationRequest),
    SendLocalList(SendLocalListRequest),
    GetLocalListVersion(GetLocalListVersionRequest),
    DataTransfer(DataTransferRequest),
}

impl OutboundCall {
    pub fn action(&self) -> &'static str {
        match self {
            Self::SetChargingProfile(_) => SetChargingProfileRequest::NAME,
            Self::ClearChargingProfile(_) => ClearChargingProfileRequest::NAME,
            Self::GetCompositeSchedule(_) => GetCompositeScheduleRequest::NAME,
            Self::ReserveNow(_) => ReserveNowRequest::NAME,
            Self::CancelReservation(_) => CancelReservationRequest::NAME,
            Self::SendLocalList(_) => SendLocalListRequest::NAME,
            Self::GetLocalListVersion(_) => GetLocalListVersionRequest::NAME,
            Self::DataTransfer(_) => DataTransferRequest::NAME,
        }
    }

    pub fn encode(&self) -> Result<Vec<u8>, serde_json::Error> {
        match self {
            Self::SetChargingProfile(req) => serde_json::to_vec(req),
            Self::ClearChargingProfile(req) => serde_json::to_vec(req),
            Self::GetCompositeSchedule(req) => serde_json::to_vec(req),
            Self::ReserveNow(req) => serde_json::to_vec(req),
            Self::CancelReservation(req) => serde_json::to_vec(req),
            Self::SendLocalList(req) => serde_json::to_vec(req),
            Self::GetLocalListVersion(req) => serde_json::to_vec(req),
            Self::DataTransfer(req) => serde_json::to_vec(req),
        }
    }
}

impl From<SetChargingProfileRequest> for OutboundCall {
    fn from(req: SetChargingProfileRequest) -> Self {
        Self::SetChargingProfile(req)
    }
}

impl From<ClearChargingProfileRequest> for OutboundCall {
    fn from(req: ClearChargingProfileRequest) -> Self {
        Self::ClearChargingProfile(req)
    }
}

impl From<GetCompositeScheduleRequest> for OutboundCall {
    fn from(req: GetCompositeScheduleRequest) -> Self {
        Self::GetCompositeSchedule(req)
    }
}

impl From<ReserveNowRequest> for OutboundCall {
    fn from(req: ReserveNowRequest) -> Self {
        Self::ReserveNow(req)
    }
}

impl From<CancelReservationRequest> for OutboundCall {
    fn from(req: CancelReservationRequest) -> Self {
        Self::CancelReservation(req)
    }
}

impl From<SendLocalListRequest> for OutboundCall {
    fn from(req: SendLocalListRequest) -> Self {
        Self::SendLocalList(req)
    }
}

impl From<GetLocalListVersionRequest> for OutboundCall {
    fn from(req: GetLocalListVersionRequest) -> Self {
        Self::GetLocalListVersion(req)
    }
}

impl From<DataTransferRequest> for OutboundCall {
    fn from(req: DataTransferRequest) -> Self {
        Self::DataTransfer(req)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_names_match_ocpp() {
        let call: OutboundCall = CancelReservationRequest { reservation_id: 4 }.into();
        assert_eq!(call.action(), "CancelReservation");
        assert_eq!(call.encode().unwrap(), br#"{"reservationId":4}"#.to_vec());

        let call: OutboundCall = GetLocalListVersionRequest::default().into();
        assert_eq!(call.action(), "GetLocalListVersion");
        assert_eq!(call.encode().unwrap(), b"{}".to_vec());
    }
}
