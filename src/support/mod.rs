pub mod errors;
pub mod ocpp_frame;
pub mod shutdown;
pub mod telemetry;
