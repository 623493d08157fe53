//! Charging profile aggregate
//!
//! Contains the ChargingProfile entity, the composite-schedule engine and
//! the repository interface.

pub mod model;
pub mod repository;
pub mod schedule;

pub use model::{
    ChargingProfile, ChargingProfileCriteria, ChargingProfileKind, ChargingProfilePurpose,
    ChargingRateUnit, ChargingSchedule, ChargingSchedulePeriod, RecurrencyKind,
};
pub use repository::ChargingProfileRepository;
pub use schedule::{CompositeScheduleQuery, CompositeScheduler, HighestPriorityScheduler};
