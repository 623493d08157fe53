//! OCPP 1.6-J messages and datatypes

pub mod messages;
pub mod types;

pub use messages::*;
pub use types::*;
