//! Meter value aggregate

pub mod model;
pub mod repository;

pub use model::{MeterValue, MeterValuePage, MeterValueQuery, SampledValue, StoredMeterValue};
pub use repository::MeterValueRepository;
