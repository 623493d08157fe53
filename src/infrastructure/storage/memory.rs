//! In-memory store implementation
//!
//! Every aggregate lives in one [`State`] guarded by a single mutex. Each
//! public operation holds the lock for its whole duration and never awaits
//! while holding it.

use std::collections::{BTreeMap, HashMap};

use chrono::Utc;
use parking_lot::Mutex;
use tracing::{debug, info};

use crate::domain::charging_profile::{
    ChargingProfile, ChargingProfileCriteria, ChargingProfileRepository, ChargingSchedule,
    CompositeScheduleQuery, CompositeScheduler, HighestPriorityScheduler,
};
use crate::domain::firmware::{
    DiagnosticsStatus, FirmwareStatus, FirmwareStatusRepository, PublishFirmwareStatus,
    StatusRecord,
};
use crate::domain::local_auth::{LocalAuthListEntry, LocalAuthListRepository, UpdateType};
use crate::domain::meter_value::{
    MeterValue, MeterValuePage, MeterValueQuery, MeterValueRepository, StoredMeterValue,
};
use crate::domain::reservation::{Reservation, ReservationRepository, ReservationStatus};
use crate::domain::RepositoryProvider;
use crate::support::errors::{DomainError, DomainResult};

#[derive(Default)]
struct LocalAuthList {
    version: i32,
    entries: BTreeMap<String, LocalAuthListEntry>,
}

#[derive(Default)]
struct State {
    /// Keyed by (station id, profile id).
    charging_profiles: HashMap<(String, i32), ChargingProfile>,
    reservations: HashMap<i32, Reservation>,
    local_auth_lists: HashMap<String, LocalAuthList>,
    /// Keyed by (station id, evse id), newest first.
    meter_values: HashMap<(String, i32), Vec<StoredMeterValue>>,
    firmware_statuses: HashMap<String, StatusRecord<FirmwareStatus>>,
    diagnostics_statuses: HashMap<String, StatusRecord<DiagnosticsStatus>>,
    publish_firmware_statuses: HashMap<String, StatusRecord<PublishFirmwareStatus>>,
}

/// In-memory store for development and testing. Not durable.
pub struct InMemoryStore {
    state: Mutex<State>,
    scheduler: Box<dyn CompositeScheduler>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::with_scheduler(Box::new(HighestPriorityScheduler))
    }

    pub fn with_scheduler(scheduler: Box<dyn CompositeScheduler>) -> Self {
        Self {
            state: Mutex::new(State::default()),
            scheduler,
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn sort_newest_first(series: &mut [StoredMeterValue]) {
    series.sort_by(|a, b| b.meter_value.timestamp.cmp(&a.meter_value.timestamp));
}

// ── Charging profiles ──────────────────────────────────────────

impl ChargingProfileRepository for InMemoryStore {
    fn set_charging_profile(&self, profile: ChargingProfile) {
        let key = (
            profile.charge_station_id.clone(),
            profile.charging_profile_id,
        );
        debug!(
            charge_station_id = %key.0,
            charging_profile_id = key.1,
            "Storing charging profile"
        );
        self.state.lock().charging_profiles.insert(key, profile);
    }

    fn get_charging_profiles(
        &self,
        charge_station_id: &str,
        criteria: &ChargingProfileCriteria,
    ) -> Vec<ChargingProfile> {
        let state = self.state.lock();
        let mut profiles: Vec<ChargingProfile> = state
            .charging_profiles
            .values()
            .filter(|p| p.charge_station_id == charge_station_id && criteria.matches(p))
            .cloned()
            .collect();
        profiles.sort_by_key(|p| (p.stack_level, p.charging_profile_id));
        profiles
    }

    fn clear_charging_profile(
        &self,
        charge_station_id: &str,
        criteria: &ChargingProfileCriteria,
    ) -> usize {
        let mut state = self.state.lock();
        let before = state.charging_profiles.len();
        state
            .charging_profiles
            .retain(|_, p| !(p.charge_station_id == charge_station_id && criteria.matches(p)));
        let removed = before - state.charging_profiles.len();
        debug!(charge_station_id, removed, "Cleared charging profiles");
        removed
    }

    fn get_composite_schedule(
        &self,
        charge_station_id: &str,
        query: &CompositeScheduleQuery,
    ) -> Option<ChargingSchedule> {
        let state = self.state.lock();
        let candidates: Vec<&ChargingProfile> = state
            .charging_profiles
            .values()
            .filter(|p| p.charge_station_id == charge_station_id && query.admits(p))
            .collect();
        if candidates.is_empty() {
            return None;
        }
        self.scheduler.compose(&candidates, query, Utc::now())
    }
}

// ── Reservations ───────────────────────────────────────────────

impl ReservationRepository for InMemoryStore {
    fn create_reservation(&self, reservation: Reservation) {
        let mut state = self.state.lock();
        for other in state.reservations.values_mut() {
            if other.reservation_id != reservation.reservation_id
                && other.is_active()
                && other.charge_station_id == reservation.charge_station_id
                && other.connector_id == reservation.connector_id
            {
                info!(
                    charge_station_id = %other.charge_station_id,
                    connector_id = other.connector_id,
                    superseded = other.reservation_id,
                    by = reservation.reservation_id,
                    "Cancelling superseded reservation"
                );
                other.status = ReservationStatus::Cancelled;
            }
        }
        state
            .reservations
            .insert(reservation.reservation_id, reservation);
    }

    fn get_reservation(&self, reservation_id: i32) -> Option<Reservation> {
        self.state.lock().reservations.get(&reservation_id).cloned()
    }

    fn cancel_reservation(&self, reservation_id: i32) -> DomainResult<()> {
        self.update_reservation_status(reservation_id, ReservationStatus::Cancelled)
    }

    fn update_reservation_status(
        &self,
        reservation_id: i32,
        status: ReservationStatus,
    ) -> DomainResult<()> {
        let mut state = self.state.lock();
        let reservation = state
            .reservations
            .get_mut(&reservation_id)
            .ok_or_else(|| DomainError::not_found("Reservation", "id", reservation_id))?;
        debug!(
            reservation_id,
            from = %reservation.status,
            to = %status,
            "Reservation status updated"
        );
        reservation.status = status;
        Ok(())
    }

    fn get_active_reservations(&self, charge_station_id: &str) -> Vec<Reservation> {
        let state = self.state.lock();
        let mut active: Vec<Reservation> = state
            .reservations
            .values()
            .filter(|r| r.charge_station_id == charge_station_id && r.is_active())
            .cloned()
            .collect();
        active.sort_by_key(|r| r.reservation_id);
        active
    }

    fn get_reservation_by_connector(
        &self,
        charge_station_id: &str,
        connector_id: i32,
    ) -> Option<Reservation> {
        let state = self.state.lock();
        state
            .reservations
            .values()
            .filter(|r| {
                r.charge_station_id == charge_station_id
                    && r.connector_id == connector_id
                    && r.is_active()
            })
            .min_by_key(|r| r.reservation_id)
            .cloned()
    }

    fn expire_reservations(&self) -> usize {
        let now = Utc::now();
        let mut state = self.state.lock();
        let mut expired = 0;
        for reservation in state.reservations.values_mut() {
            if reservation.is_overdue(now) {
                reservation.status = ReservationStatus::Expired;
                expired += 1;
            }
        }
        expired
    }
}

// ── Local authorization lists ──────────────────────────────────

impl LocalAuthListRepository for InMemoryStore {
    fn get_local_list_version(&self, charge_station_id: &str) -> i32 {
        self.state
            .lock()
            .local_auth_lists
            .get(charge_station_id)
            .map_or(0, |list| list.version)
    }

    fn update_local_auth_list(
        &self,
        charge_station_id: &str,
        version: i32,
        update_type: UpdateType,
        entries: Vec<LocalAuthListEntry>,
    ) {
        let mut state = self.state.lock();
        let list = state
            .local_auth_lists
            .entry(charge_station_id.to_string())
            .or_default();

        match update_type {
            UpdateType::Full => {
                list.entries = entries
                    .into_iter()
                    .map(|entry| (entry.id_tag.clone(), entry))
                    .collect();
            }
            UpdateType::Differential => {
                for entry in entries {
                    if entry.id_tag_info.is_none() {
                        list.entries.remove(&entry.id_tag);
                    } else {
                        list.entries.insert(entry.id_tag.clone(), entry);
                    }
                }
            }
        }
        list.version = version;
        debug!(
            charge_station_id,
            version,
            entries = list.entries.len(),
            "Local authorization list updated"
        );
    }

    fn get_local_auth_list(&self, charge_station_id: &str) -> Vec<LocalAuthListEntry> {
        self.state
            .lock()
            .local_auth_lists
            .get(charge_station_id)
            .map(|list| list.entries.values().cloned().collect())
            .unwrap_or_default()
    }
}

// ── Meter values ───────────────────────────────────────────────

impl MeterValueRepository for InMemoryStore {
    fn append_meter_values(
        &self,
        charge_station_id: &str,
        evse_id: i32,
        transaction_id: &str,
        values: Vec<MeterValue>,
    ) {
        let mut state = self.state.lock();
        let series = state
            .meter_values
            .entry((charge_station_id.to_string(), evse_id))
            .or_default();
        series.extend(values.into_iter().map(|meter_value| StoredMeterValue {
            charge_station_id: charge_station_id.to_string(),
            evse_id,
            transaction_id: transaction_id.to_string(),
            meter_value,
        }));
        sort_newest_first(series);
    }

    fn get_meter_values(
        &self,
        charge_station_id: &str,
        evse_id: i32,
        limit: usize,
    ) -> Vec<StoredMeterValue> {
        let state = self.state.lock();
        let Some(series) = state
            .meter_values
            .get(&(charge_station_id.to_string(), evse_id))
        else {
            return Vec::new();
        };
        let take = if limit > 0 { limit } else { series.len() };
        series.iter().take(take).cloned().collect()
    }

    fn query_meter_values(&self, query: &MeterValueQuery) -> MeterValuePage {
        let state = self.state.lock();
        let mut matched: Vec<StoredMeterValue> = state
            .meter_values
            .iter()
            .filter(|((station, _), _)| *station == query.charge_station_id)
            .flat_map(|(_, series)| series.iter())
            .filter(|stored| query.matches(stored))
            .cloned()
            .collect();
        sort_newest_first(&mut matched);

        let total = matched.len();
        let take = if query.limit > 0 { query.limit } else { total };
        let items = matched.into_iter().skip(query.offset).take(take).collect();
        MeterValuePage { items, total }
    }
}

// ── Firmware, diagnostics, publish firmware ────────────────────

impl FirmwareStatusRepository for InMemoryStore {
    fn set_firmware_status(&self, charge_station_id: &str, status: FirmwareStatus) {
        self.state
            .lock()
            .firmware_statuses
            .insert(charge_station_id.to_string(), StatusRecord::now(status));
    }

    fn get_firmware_status(&self, charge_station_id: &str) -> Option<StatusRecord<FirmwareStatus>> {
        self.state
            .lock()
            .firmware_statuses
            .get(charge_station_id)
            .cloned()
    }

    fn set_diagnostics_status(&self, charge_station_id: &str, status: DiagnosticsStatus) {
        self.state
            .lock()
            .diagnostics_statuses
            .insert(charge_station_id.to_string(), StatusRecord::now(status));
    }

    fn get_diagnostics_status(
        &self,
        charge_station_id: &str,
    ) -> Option<StatusRecord<DiagnosticsStatus>> {
        self.state
            .lock()
            .diagnostics_statuses
            .get(charge_station_id)
            .cloned()
    }

    fn set_publish_firmware_status(&self, charge_station_id: &str, status: PublishFirmwareStatus) {
        self.state
            .lock()
            .publish_firmware_statuses
            .insert(charge_station_id.to_string(), StatusRecord::now(status));
    }

    fn get_publish_firmware_status(
        &self,
        charge_station_id: &str,
    ) -> Option<StatusRecord<PublishFirmwareStatus>> {
        self.state
            .lock()
            .publish_firmware_statuses
            .get(charge_station_id)
            .cloned()
    }
}

impl RepositoryProvider for InMemoryStore {
    fn charging_profiles(&self) -> &dyn ChargingProfileRepository {
        self
    }

    fn reservations(&self) -> &dyn ReservationRepository {
        self
    }

    fn local_auth_lists(&self) -> &dyn LocalAuthListRepository {
        self
    }

    fn meter_values(&self) -> &dyn MeterValueRepository {
        self
    }

    fn firmware(&self) -> &dyn FirmwareStatusRepository {
        self
    }
}
