//! Result handlers for SendLocalList and GetLocalListVersion
//!
//! The stored list mirrors what the station accepted. When a station
//! reports a different version, the stored list is pushed again as a Full
//! update. A station without a stored list is left alone.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::application::calls::SharedCallMaker;
use crate::application::routing::{CallResultHandler, HandlerError};
use crate::domain::RepositoryProvider;
use crate::ocpp::v16::{
    GetLocalListVersionRequest, GetLocalListVersionResponse, SendLocalListRequest,
    SendLocalListResponse, UpdateStatus, UpdateType,
};

/// Version a station reports when it has no local list support.
const LOCAL_LIST_UNSUPPORTED: i32 = -1;

/// Stored version of a station whose list was never sent.
const NO_STORED_LIST: i32 = 0;

pub struct SendLocalListResultHandler {
    repos: Arc<dyn RepositoryProvider>,
}

impl SendLocalListResultHandler {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }
}

#[async_trait]
impl CallResultHandler for SendLocalListResultHandler {
    type Request = SendLocalListRequest;
    type Response = SendLocalListResponse;

    async fn handle_call_result(
        &self,
        station_id: &str,
        request: SendLocalListRequest,
        response: SendLocalListResponse,
    ) -> Result<(), HandlerError> {
        if response.status != UpdateStatus::Accepted {
            warn!(
                station_id,
                list_version = request.list_version,
                status = ?response.status,
                "SendLocalList not accepted"
            );
            return Ok(());
        }

        info!(
            station_id,
            list_version = request.list_version,
            update_type = ?request.update_type,
            entries = request.local_authorization_list.len(),
            "Local list accepted"
        );
        self.repos.local_auth_lists().update_local_auth_list(
            station_id,
            request.list_version,
            request.update_type,
            request.local_authorization_list,
        );
        Ok(())
    }
}

pub struct GetLocalListVersionResultHandler {
    repos: Arc<dyn RepositoryProvider>,
    call_maker: SharedCallMaker,
}

impl GetLocalListVersionResultHandler {
    pub fn new(repos: Arc<dyn RepositoryProvider>, call_maker: SharedCallMaker) -> Self {
        Self { repos, call_maker }
    }
}

#[async_trait]
impl CallResultHandler for GetLocalListVersionResultHandler {
    type Request = GetLocalListVersionRequest;
    type Response = GetLocalListVersionResponse;

    async fn handle_call_result(
        &self,
        station_id: &str,
        _request: GetLocalListVersionRequest,
        response: GetLocalListVersionResponse,
    ) -> Result<(), HandlerError> {
        let reported = response.list_version;
        if reported == LOCAL_LIST_UNSUPPORTED {
            info!(station_id, "Station does not support a local list");
            return Ok(());
        }

        let lists = self.repos.local_auth_lists();
        let stored = lists.get_local_list_version(station_id);
        if stored == NO_STORED_LIST {
            // Nothing to restore from; pushing would wipe the station's list.
            info!(station_id, reported, "No local list stored, keeping station list");
            return Ok(());
        }
        if reported == stored {
            debug!(station_id, list_version = stored, "Local list in sync");
            return Ok(());
        }

        info!(
            station_id,
            reported,
            stored,
            "Local list version mismatch, sending full list"
        );
        let request = SendLocalListRequest {
            list_version: stored,
            local_authorization_list: lists.get_local_auth_list(station_id),
            update_type: UpdateType::Full,
        };
        self.call_maker.send(station_id, request).await?;
        Ok(())
    }
}
