//! Drops outbound calls whose result never arrived.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::application::session::SharedPendingCalls;
use crate::support::shutdown::ShutdownSignal;

/// Start the pending-call sweeper. It runs every `timeout_secs` and drops
/// calls older than that.
pub fn start_pending_call_sweeper(
    pending: SharedPendingCalls,
    shutdown: ShutdownSignal,
    timeout_secs: u64,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let timeout_secs = timeout_secs.max(1);
        let max_age = chrono::Duration::seconds(timeout_secs as i64);
        let mut interval = tokio::time::interval(Duration::from_secs(timeout_secs));

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    let dropped = pending.purge_older_than(max_age);
                    if dropped > 0 {
                        warn!(dropped, timeout_secs, "Dropped calls without a result");
                    }
                }
                _ = shutdown.wait() => break,
            }
        }

        info!("Pending call sweeper stopped");
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::application::session::PendingCalls;

    #[tokio::test]
    async fn sweeper_stops_on_shutdown_and_keeps_fresh_calls() {
        let pending = Arc::new(PendingCalls::new());
        pending.insert("CS001", "m1", "ReserveNow", b"{}".to_vec());

        let shutdown = ShutdownSignal::new();
        let handle = start_pending_call_sweeper(pending.clone(), shutdown.clone(), 60);
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(pending.len(), 1);

        shutdown.trigger();
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("sweeper did not stop")
            .unwrap();
    }
}
