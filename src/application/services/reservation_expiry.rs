//! Background task that periodically expires overdue reservations.
//!
//! Accepted reservations whose `expiry_date` lies in the past are marked
//! `Expired`. The task stops when the shutdown signal fires.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio::time::Duration;
use tracing::{debug, info};

use crate::domain::RepositoryProvider;
use crate::support::shutdown::ShutdownSignal;

/// Start the reservation expiry background task.
pub fn start_reservation_expiry_task(
    repos: Arc<dyn RepositoryProvider>,
    shutdown: ShutdownSignal,
    check_interval_secs: u64,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(
            check_interval = check_interval_secs,
            "Reservation expiry task started"
        );

        let mut interval = tokio::time::interval(Duration::from_secs(check_interval_secs.max(1)));

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    expire_reservations(repos.as_ref());
                }
                _ = shutdown.wait() => {
                    info!("Reservation expiry task shutting down");
                    break;
                }
            }
        }

        info!("Reservation expiry task stopped");
    })
}

fn expire_reservations(repos: &dyn RepositoryProvider) -> usize {
    let expired = repos.reservations().expire_reservations();
    if expired > 0 {
        info!(count = expired, "Expired overdue reservations");
    } else {
        debug!("No overdue reservations");
    }
    expired
}

#[cfg(test)]
mod tests {
    use chrono::{Duration as ChronoDuration, Utc};

    use super::*;
    use crate::domain::reservation::{Reservation, ReservationStatus};
    use crate::infrastructure::InMemoryStore;

    #[tokio::test]
    async fn task_expires_overdue_reservations_and_stops_on_shutdown() {
        let store = Arc::new(InMemoryStore::new());
        store.reservations().create_reservation(Reservation::new(
            1,
            "CS001",
            1,
            "TAG-001",
            None,
            Utc::now() - ChronoDuration::minutes(1),
        ));

        let shutdown = ShutdownSignal::new();
        let handle = start_reservation_expiry_task(store.clone(), shutdown.clone(), 3600);

        // The first tick fires immediately.
        for _ in 0..50 {
            if store.reservations().get_reservation(1).map(|r| r.status)
                == Some(ReservationStatus::Expired)
            {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(
            store.reservations().get_reservation(1).unwrap().status,
            ReservationStatus::Expired
        );

        shutdown.trigger();
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("expiry task did not stop")
            .unwrap();
    }

    #[test]
    fn sweep_leaves_future_reservations_alone() {
        let store = InMemoryStore::new();
        store.reservations().create_reservation(Reservation::new(
            2,
            "CS001",
            1,
            "TAG-001",
            None,
            Utc::now() + ChronoDuration::hours(1),
        ));
        assert_eq!(expire_reservations(&store), 0);
        assert!(store.reservations().get_reservation(2).unwrap().is_active());
    }
}
