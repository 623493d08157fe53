//! OCPP 1.6 message handlers
//!
//! Call handlers answer what a station sends. Result handlers act on the
//! station's answer to a call the CSMS made.

mod charging_profiles;
mod heartbeat;
mod local_list;
mod meter_values;
mod reservations;
mod routes;
mod status_notifications;

pub use charging_profiles::{
    ClearChargingProfileResultHandler, GetCompositeScheduleResultHandler,
    SetChargingProfileResultHandler,
};
pub use heartbeat::HeartbeatHandler;
pub use local_list::{GetLocalListVersionResultHandler, SendLocalListResultHandler};
pub use meter_values::MeterValuesHandler;
pub use reservations::{CancelReservationResultHandler, ReserveNowResultHandler};
pub use routes::default_router;
pub use status_notifications::{
    DiagnosticsStatusNotificationHandler, FirmwareStatusNotificationHandler,
};
