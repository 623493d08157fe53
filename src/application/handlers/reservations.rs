//! Result handlers for ReserveNow and CancelReservation

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::application::routing::{CallResultHandler, HandlerError};
use crate::domain::reservation::Reservation;
use crate::domain::{DomainError, RepositoryProvider};
use crate::ocpp::v16::{
    CancelReservationRequest, CancelReservationResponse, CancelReservationStatus,
    ReservationStatus, ReserveNowRequest, ReserveNowResponse,
};

pub struct ReserveNowResultHandler {
    repos: Arc<dyn RepositoryProvider>,
}

impl ReserveNowResultHandler {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }
}

#[async_trait]
impl CallResultHandler for ReserveNowResultHandler {
    type Request = ReserveNowRequest;
    type Response = ReserveNowResponse;

    async fn handle_call_result(
        &self,
        station_id: &str,
        request: ReserveNowRequest,
        response: ReserveNowResponse,
    ) -> Result<(), HandlerError> {
        if response.status != ReservationStatus::Accepted {
            info!(
                station_id,
                reservation_id = request.reservation_id,
                status = ?response.status,
                "Reservation refused by station"
            );
            return Ok(());
        }

        info!(
            station_id,
            reservation_id = request.reservation_id,
            connector_id = request.connector_id,
            "Reservation accepted"
        );
        self.repos.reservations().create_reservation(Reservation::new(
            request.reservation_id,
            station_id,
            request.connector_id,
            request.id_tag,
            request.parent_id_tag,
            request.expiry_date,
        ));
        Ok(())
    }
}

pub struct CancelReservationResultHandler {
    repos: Arc<dyn RepositoryProvider>,
}

impl CancelReservationResultHandler {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }
}

#[async_trait]
impl CallResultHandler for CancelReservationResultHandler {
    type Request = CancelReservationRequest;
    type Response = CancelReservationResponse;

    async fn handle_call_result(
        &self,
        station_id: &str,
        request: CancelReservationRequest,
        response: CancelReservationResponse,
    ) -> Result<(), HandlerError> {
        let reservation_id = request.reservation_id;
        if response.status != CancelReservationStatus::Accepted {
            warn!(station_id, reservation_id, "CancelReservation rejected");
            return Ok(());
        }

        match self.repos.reservations().cancel_reservation(reservation_id) {
            Ok(()) => info!(station_id, reservation_id, "Reservation cancelled"),
            Err(DomainError::NotFound { .. }) => {
                warn!(station_id, reservation_id, "Cancelled reservation is not stored");
            }
            Err(err) => return Err(err.into()),
        }
        Ok(())
    }
}
