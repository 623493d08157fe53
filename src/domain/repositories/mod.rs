//! Repository traits for the domain layer
//!
//! `RepositoryProvider` gives unified access to all per-aggregate
//! repositories. Consumers request only the repository they need:
//!
//! ```ignore
//! fn handle(repos: &dyn RepositoryProvider) {
//!     let version = repos.local_auth_lists().get_local_list_version("CP001");
//!     let active = repos.reservations().get_active_reservations("CP001");
//! }
//! ```

use super::charging_profile::ChargingProfileRepository;
use super::firmware::FirmwareStatusRepository;
use super::local_auth::LocalAuthListRepository;
use super::meter_value::MeterValueRepository;
use super::reservation::ReservationRepository;

pub trait RepositoryProvider: Send + Sync {
    fn charging_profiles(&self) -> &dyn ChargingProfileRepository;
    fn reservations(&self) -> &dyn ReservationRepository;
    fn local_auth_lists(&self) -> &dyn LocalAuthListRepository;
    fn meter_values(&self) -> &dyn MeterValueRepository;
    fn firmware(&self) -> &dyn FirmwareStatusRepository;
}
