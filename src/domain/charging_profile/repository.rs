//! ChargingProfile repository interface

use super::model::{ChargingProfile, ChargingProfileCriteria, ChargingSchedule};
use super::schedule::CompositeScheduleQuery;

/// Profiles are keyed by (charge station, profile id): each station owns
/// an independent profile-id namespace.
pub trait ChargingProfileRepository: Send + Sync {
    /// Insert or replace the profile with the same station and profile id.
    fn set_charging_profile(&self, profile: ChargingProfile);

    /// Profiles of `charge_station_id` matching `criteria`, ordered by
    /// (stack level, profile id) ascending.
    fn get_charging_profiles(
        &self,
        charge_station_id: &str,
        criteria: &ChargingProfileCriteria,
    ) -> Vec<ChargingProfile>;

    /// Delete matching profiles and return how many were removed.
    fn clear_charging_profile(
        &self,
        charge_station_id: &str,
        criteria: &ChargingProfileCriteria,
    ) -> usize;

    fn get_composite_schedule(
        &self,
        charge_station_id: &str,
        query: &CompositeScheduleQuery,
    ) -> Option<ChargingSchedule>;
}
