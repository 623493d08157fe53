//! Domain layer: aggregates, their repository interfaces and the
//! provider that groups them.

pub mod charging_profile;
pub mod firmware;
pub mod local_auth;
pub mod meter_value;
pub mod repositories;
pub mod reservation;

pub use repositories::RepositoryProvider;

pub use crate::support::errors::{DomainError, DomainResult};
