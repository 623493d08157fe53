//! Reservation repository interface

use super::model::{Reservation, ReservationStatus};
use crate::support::errors::DomainResult;

pub trait ReservationRepository: Send + Sync {
    /// Insert (or overwrite) a reservation. Any other Accepted reservation
    /// on the same station and connector is cancelled in the same step.
    fn create_reservation(&self, reservation: Reservation);

    fn get_reservation(&self, reservation_id: i32) -> Option<Reservation>;

    /// Set Cancelled regardless of the current status.
    fn cancel_reservation(&self, reservation_id: i32) -> DomainResult<()>;

    /// Set `status` regardless of the current status.
    fn update_reservation_status(
        &self,
        reservation_id: i32,
        status: ReservationStatus,
    ) -> DomainResult<()>;

    /// All Accepted reservations of a station, ordered by id.
    fn get_active_reservations(&self, charge_station_id: &str) -> Vec<Reservation>;

    /// The Accepted reservation on a connector, if any.
    fn get_reservation_by_connector(
        &self,
        charge_station_id: &str,
        connector_id: i32,
    ) -> Option<Reservation>;

    /// Expire every Accepted reservation whose expiry date is before now.
    /// Returns how many were expired.
    fn expire_reservations(&self) -> usize;
}
