pub mod model;
pub mod repository;

pub use model::{DiagnosticsStatus, FirmwareStatus, PublishFirmwareStatus, StatusRecord};
pub use repository::FirmwareStatusRepository;
