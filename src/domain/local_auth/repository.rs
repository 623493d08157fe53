//! Local authorization list repository interface

use super::model::{LocalAuthListEntry, UpdateType};

pub trait LocalAuthListRepository: Send + Sync {
    /// Current list version of a station; 0 if never set.
    fn get_local_list_version(&self, charge_station_id: &str) -> i32;

    /// Apply a Full or Differential update and store `version`.
    /// The version is taken as given, without a monotonicity check.
    fn update_local_auth_list(
        &self,
        charge_station_id: &str,
        version: i32,
        update_type: UpdateType,
        entries: Vec<LocalAuthListEntry>,
    );

    /// Every entry of the station's list, ordered by id tag.
    fn get_local_auth_list(&self, charge_station_id: &str) -> Vec<LocalAuthListEntry>;
}
