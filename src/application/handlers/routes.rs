//! Route table of the bundled OCPP 1.6 handlers

use std::sync::Arc;

use crate::application::calls::SharedCallMaker;
use crate::application::routing::{
    CallHandler, CallResultHandler, CallResultRoute, CallRoute, DataTransferCallHandler,
    DataTransferResultHandler, DataTransferRoutes, Router, SchemaValidator,
};
use crate::domain::RepositoryProvider;
use crate::ocpp::v16::{
    CancelReservationRequest, ClearChargingProfileRequest, DataTransferRequest,
    DiagnosticsStatusNotificationRequest, FirmwareStatusNotificationRequest,
    GetCompositeScheduleRequest, GetLocalListVersionRequest, HeartbeatRequest,
    MeterValuesRequest, ReserveNowRequest, SendLocalListRequest, SetChargingProfileRequest,
};
use crate::ocpp::Action;

use super::charging_profiles::{
    ClearChargingProfileResultHandler, GetCompositeScheduleResultHandler,
    SetChargingProfileResultHandler,
};
use super::heartbeat::HeartbeatHandler;
use super::local_list::{GetLocalListVersionResultHandler, SendLocalListResultHandler};
use super::meter_values::MeterValuesHandler;
use super::reservations::{CancelReservationResultHandler, ReserveNowResultHandler};
use super::status_notifications::{
    DiagnosticsStatusNotificationHandler, FirmwareStatusNotificationHandler,
};

fn call<A: Action>(handler: impl CallHandler) -> (&'static str, CallRoute) {
    (A::NAME, CallRoute::ocpp16(A::NAME, handler))
}

fn result<A: Action>(handler: impl CallResultHandler) -> (&'static str, CallResultRoute) {
    (A::NAME, CallResultRoute::ocpp16(A::NAME, handler))
}

/// Router with every bundled handler registered.
pub fn default_router(
    repos: Arc<dyn RepositoryProvider>,
    call_maker: SharedCallMaker,
    validator: Arc<dyn SchemaValidator>,
    vendors: DataTransferRoutes,
) -> Router {
    let vendors = Arc::new(vendors);

    let calls = [
        call::<HeartbeatRequest>(HeartbeatHandler),
        call::<MeterValuesRequest>(MeterValuesHandler::new(repos.clone())),
        call::<FirmwareStatusNotificationRequest>(FirmwareStatusNotificationHandler::new(
            repos.clone(),
        )),
        call::<DiagnosticsStatusNotificationRequest>(DiagnosticsStatusNotificationHandler::new(
            repos.clone(),
        )),
        call::<DataTransferRequest>(DataTransferCallHandler::new(
            vendors.clone(),
            validator.clone(),
        )),
    ];

    let results = [
        result::<SetChargingProfileRequest>(SetChargingProfileResultHandler::new(repos.clone())),
        result::<ClearChargingProfileRequest>(ClearChargingProfileResultHandler::new(
            repos.clone(),
        )),
        result::<GetCompositeScheduleRequest>(GetCompositeScheduleResultHandler::new(
            repos.clone(),
        )),
        result::<ReserveNowRequest>(ReserveNowResultHandler::new(repos.clone())),
        result::<CancelReservationRequest>(CancelReservationResultHandler::new(repos.clone())),
        result::<SendLocalListRequest>(SendLocalListResultHandler::new(repos.clone())),
        result::<GetLocalListVersionRequest>(GetLocalListVersionResultHandler::new(
            repos.clone(),
            call_maker,
        )),
        result::<DataTransferRequest>(DataTransferResultHandler::new(
            vendors,
            validator.clone(),
        )),
    ];

    let mut builder = Router::builder(validator);
    for (action, route) in calls {
        builder = builder.call(action, route);
    }
    for (action, route) in results {
        builder = builder.call_result(action, route);
    }
    builder.build()
}
