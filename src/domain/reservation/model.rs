//! Reservation domain entity

use chrono::{DateTime, Utc};

/// Reservation status. `Cancelled` and `Expired` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReservationStatus {
    Accepted,
    Cancelled,
    Expired,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Accepted => "Accepted",
            Self::Cancelled => "Cancelled",
            Self::Expired => "Expired",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Accepted)
    }
}

impl std::fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Connector reservation
#[derive(Debug, Clone, PartialEq)]
pub struct Reservation {
    /// Globally unique reservation id.
    pub reservation_id: i32,
    pub charge_station_id: String,
    /// 0 = any connector
    pub connector_id: i32,
    pub id_tag: String,
    pub parent_id_tag: Option<String>,
    pub expiry_date: DateTime<Utc>,
    pub status: ReservationStatus,
    pub created_at: DateTime<Utc>,
}

impl Reservation {
    pub fn new(
        reservation_id: i32,
        charge_station_id: impl Into<String>,
        connector_id: i32,
        id_tag: impl Into<String>,
        parent_id_tag: Option<String>,
        expiry_date: DateTime<Utc>,
    ) -> Self {
        Self {
            reservation_id,
            charge_station_id: charge_station_id.into(),
            connector_id,
            id_tag: id_tag.into(),
            parent_id_tag,
            expiry_date,
            status: ReservationStatus::Accepted,
            created_at: Utc::now(),
        }
    }

    pub fn is_active(&self) -> bool {
        !self.status.is_terminal()
    }

    /// Active and past its expiry date at `now`.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.is_active() && self.expiry_date < now
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample_reservation() -> Reservation {
        Reservation::new(1, "CS001", 1, "TAG-001", None, Utc::now() + Duration::hours(1))
    }

    #[test]
    fn new_reservation_is_active() {
        let r = sample_reservation();
        assert!(r.is_active());
        assert!(!r.is_overdue(Utc::now()));
        assert_eq!(r.status, ReservationStatus::Accepted);
    }

    #[test]
    fn overdue_only_when_active_and_past_expiry() {
        let mut r = sample_reservation();
        let later = Utc::now() + Duration::hours(2);
        assert!(r.is_overdue(later));

        r.status = ReservationStatus::Cancelled;
        assert!(!r.is_overdue(later));
    }

    #[test]
    fn terminal_states_are_inactive() {
        let mut r = sample_reservation();
        for status in [ReservationStatus::Cancelled, ReservationStatus::Expired] {
            assert!(status.is_terminal());
            r.status = status;
            assert!(!r.is_active(), "{status}");
        }
        assert!(!ReservationStatus::Accepted.is_terminal());
    }
}
