//! Local authorization list aggregate

pub mod model;
pub mod repository;

pub use model::{AuthorizationStatus, IdTagInfo, LocalAuthListEntry, UpdateType};
pub use repository::LocalAuthListRepository;
