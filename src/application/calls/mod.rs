//! CSMS-initiated calls

pub mod maker;
pub mod outbound;

pub use maker::{CallMaker, EmitError, Emitter, SharedCallMaker};
pub use outbound::OutboundCall;
