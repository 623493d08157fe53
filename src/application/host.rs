//! CSMS host: the store, router and session plumbing wired together
//!
//! A transport owns one [`CsmsCore`]. For every station socket it calls
//! [`CsmsCore::connect`], feeds inbound text frames to the returned session,
//! writes whatever arrives on the receiver to the socket and finally calls
//! [`CsmsCore::disconnect`].

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::info;

use super::calls::{CallMaker, SharedCallMaker};
use super::handlers::default_router;
use super::routing::{
    DataTransferRoutes, PermissiveValidator, Router, SchemaValidator, WellFormedJsonValidator,
};
use super::session::{
    PendingCalls, SessionEmitter, SessionRegistry, SharedPendingCalls, SharedSessionRegistry,
    StationSession,
};
use crate::config::{AppConfig, ValidatorKind};
use crate::domain::RepositoryProvider;

pub struct CsmsCore {
    repos: Arc<dyn RepositoryProvider>,
    registry: SharedSessionRegistry,
    pending: SharedPendingCalls,
    call_maker: SharedCallMaker,
    router: Arc<Router>,
}

impl CsmsCore {
    pub fn new(
        config: &AppConfig,
        repos: Arc<dyn RepositoryProvider>,
        vendors: DataTransferRoutes,
    ) -> Self {
        let validator = validator_for(config.schemas.validator);
        info!(validator = ?config.schemas.validator, "Schema validator selected");

        let registry = SessionRegistry::shared();
        let pending = Arc::new(PendingCalls::new());
        let emitter = Arc::new(SessionEmitter::new(registry.clone(), pending.clone()));
        let call_maker = Arc::new(CallMaker::new(emitter));
        let router = Arc::new(default_router(
            repos.clone(),
            call_maker.clone(),
            validator,
            vendors,
        ));

        Self {
            repos,
            registry,
            pending,
            call_maker,
            router,
        }
    }

    pub fn repos(&self) -> &Arc<dyn RepositoryProvider> {
        &self.repos
    }

    pub fn registry(&self) -> &SharedSessionRegistry {
        &self.registry
    }

    pub fn pending(&self) -> &SharedPendingCalls {
        &self.pending
    }

    /// Outbound calls to connected stations.
    pub fn call_maker(&self) -> &SharedCallMaker {
        &self.call_maker
    }

    /// Attach a station. Frames for the station arrive on the receiver; a
    /// station that reconnects replaces its previous channel.
    pub fn connect(&self, station_id: &str) -> (StationSession, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        self.registry.register(station_id, tx);
        let session = StationSession::new(station_id, self.router.clone(), self.pending.clone());
        (session, rx)
    }

    /// Detach a station and drop the calls it never answered.
    pub fn disconnect(&self, session: &StationSession) {
        session.close();
        self.registry.unregister(session.station_id());
    }

    /// Detach every station still connected.
    pub fn disconnect_all(&self) {
        for id in self.registry.connected_ids() {
            self.pending.purge_station(&id);
            self.registry.unregister(&id);
        }
    }
}

fn validator_for(kind: ValidatorKind) -> Arc<dyn SchemaValidator> {
    match kind {
        ValidatorKind::Permissive => Arc::new(PermissiveValidator),
        ValidatorKind::WellFormed => Arc::new(WellFormedJsonValidator),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::*;
    use crate::infrastructure::InMemoryStore;
    use crate::ocpp::v16::CancelReservationRequest;
    use crate::support::ocpp_frame::OcppFrame;

    fn core() -> CsmsCore {
        CsmsCore::new(
            &AppConfig::default(),
            Arc::new(InMemoryStore::new()),
            DataTransferRoutes::new(),
        )
    }

    #[tokio::test]
    async fn connected_station_is_answered() {
        let core = core();
        let (session, _rx) = core.connect("CS001");
        assert!(core.registry().is_connected("CS001"));

        let reply = session
            .handle_text(r#"[2,"h1","Heartbeat",{}]"#)
            .await
            .unwrap();
        let value: Value = serde_json::from_str(&reply).unwrap();
        assert_eq!(value[0], 3);
        assert!(value[2]["currentTime"].is_string());
    }

    #[tokio::test]
    async fn outbound_call_reaches_station_and_result_is_applied() {
        let core = core();
        let (session, mut rx) = core.connect("CS001");

        core.call_maker()
            .send("CS001", CancelReservationRequest { reservation_id: 4 })
            .await
            .unwrap();
        assert_eq!(core.pending().len(), 1);

        let frame = OcppFrame::parse(&rx.try_recv().unwrap()).unwrap();
        let result = json!([3, frame.unique_id(), { "status": "Accepted" }]).to_string();
        assert!(session.handle_text(&result).await.is_none());
        assert!(core.pending().is_empty());
    }

    #[tokio::test]
    async fn disconnect_drops_session_and_pending_calls() {
        let core = core();
        let (session, _rx) = core.connect("CS001");
        core.call_maker()
            .send("CS001", CancelReservationRequest { reservation_id: 4 })
            .await
            .unwrap();

        core.disconnect(&session);
        assert!(!core.registry().is_connected("CS001"));
        assert!(core.pending().is_empty());
    }
}
