//! Composite schedule computation.
//!
//! The store collects candidate profiles and hands them to a
//! [`CompositeScheduler`]. The shipped [`HighestPriorityScheduler`] picks a
//! single winning profile; an interval-merging scheduler can replace it
//! without touching the store or its callers.

use chrono::{DateTime, Utc};

use super::model::{ChargingProfile, ChargingRateUnit, ChargingSchedule};

/// Parameters of a GetCompositeSchedule request.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositeScheduleQuery {
    pub connector_id: i32,
    /// Requested schedule length in seconds.
    pub duration: i32,
    pub charging_rate_unit: Option<ChargingRateUnit>,
}

impl CompositeScheduleQuery {
    /// Candidate profiles target the requested connector or the whole
    /// station (connector 0) and, when a unit is requested, use that unit.
    pub fn admits(&self, profile: &ChargingProfile) -> bool {
        (profile.connector_id == self.connector_id || profile.connector_id == 0)
            && self
                .charging_rate_unit
                .map_or(true, |unit| unit == profile.charging_schedule.charging_rate_unit)
    }
}

pub trait CompositeScheduler: Send + Sync {
    /// Compute the effective schedule from already-filtered candidates.
    /// `None` means no schedule applies.
    fn compose(
        &self,
        candidates: &[&ChargingProfile],
        query: &CompositeScheduleQuery,
        now: DateTime<Utc>,
    ) -> Option<ChargingSchedule>;
}

/// Selects one profile: purpose priority first
/// (ChargePointMaxProfile > TxDefaultProfile > TxProfile), then the higher
/// stack level. Remaining ties go to the higher profile id.
#[derive(Debug, Clone, Copy, Default)]
pub struct HighestPriorityScheduler;

impl CompositeScheduler for HighestPriorityScheduler {
    fn compose(
        &self,
        candidates: &[&ChargingProfile],
        query: &CompositeScheduleQuery,
        now: DateTime<Utc>,
    ) -> Option<ChargingSchedule> {
        let winner = candidates.iter().max_by_key(|p| {
            (
                p.purpose.priority(),
                p.stack_level,
                p.charging_profile_id,
            )
        })?;
        let schedule = &winner.charging_schedule;

        Some(ChargingSchedule {
            duration: Some(query.duration),
            start_schedule: Some(now),
            charging_rate_unit: query
                .charging_rate_unit
                .unwrap_or(schedule.charging_rate_unit),
            charging_schedule_period: schedule
                .charging_schedule_period
                .iter()
                .filter(|period| period.start_period < query.duration)
                .cloned()
                .collect(),
            min_charging_rate: schedule.min_charging_rate,
        })
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::domain::charging_profile::{
        ChargingProfileKind, ChargingProfilePurpose, ChargingSchedulePeriod,
    };

    fn profile(
        id: i32,
        connector_id: i32,
        purpose: ChargingProfilePurpose,
        stack_level: i32,
        limit: i64,
    ) -> ChargingProfile {
        ChargingProfile {
            charge_station_id: "CS001".into(),
            connector_id,
            charging_profile_id: id,
            stack_level,
            purpose,
            kind: ChargingProfileKind::Absolute,
            recurrency_kind: None,
            valid_from: None,
            valid_to: None,
            charging_schedule: ChargingSchedule {
                charging_rate_unit: ChargingRateUnit::W,
                charging_schedule_period: vec![
                    ChargingSchedulePeriod {
                        start_period: 0,
                        limit: Decimal::from(limit),
                        number_phases: None,
                    },
                    ChargingSchedulePeriod {
                        start_period: 3600,
                        limit: Decimal::from(limit / 2),
                        number_phases: None,
                    },
                ],
                min_charging_rate: Some(Decimal::from(1000)),
                ..Default::default()
            },
        }
    }

    fn query(duration: i32) -> CompositeScheduleQuery {
        CompositeScheduleQuery {
            connector_id: 1,
            duration,
            charging_rate_unit: None,
        }
    }

    #[test]
    fn purpose_beats_equal_stack_level() {
        let tx_default = profile(1, 1, ChargingProfilePurpose::TxDefaultProfile, 0, 11000);
        let max = profile(2, 0, ChargingProfilePurpose::ChargePointMaxProfile, 0, 32000);
        let now = Utc::now();

        let schedule = HighestPriorityScheduler
            .compose(&[&tx_default, &max], &query(86400), now)
            .unwrap();
        assert_eq!(
            schedule.charging_schedule_period[0].limit,
            Decimal::from(32000)
        );
        assert_eq!(schedule.start_schedule, Some(now));
        assert_eq!(schedule.duration, Some(86400));
        assert_eq!(schedule.min_charging_rate, Some(Decimal::from(1000)));
    }

    #[test]
    fn higher_stack_level_wins_within_purpose() {
        let low = profile(1, 1, ChargingProfilePurpose::TxProfile, 1, 7400);
        let high = profile(2, 1, ChargingProfilePurpose::TxProfile, 5, 3700);

        let schedule = HighestPriorityScheduler
            .compose(&[&low, &high], &query(86400), Utc::now())
            .unwrap();
        assert_eq!(
            schedule.charging_schedule_period[0].limit,
            Decimal::from(3700)
        );
    }

    #[test]
    fn periods_at_or_after_duration_are_dropped() {
        let p = profile(1, 1, ChargingProfilePurpose::TxDefaultProfile, 0, 11000);

        let schedule = HighestPriorityScheduler
            .compose(&[&p], &query(1800), Utc::now())
            .unwrap();
        assert_eq!(schedule.charging_schedule_period.len(), 1);
        assert_eq!(schedule.charging_schedule_period[0].start_period, 0);

        let schedule = HighestPriorityScheduler
            .compose(&[&p], &query(3600), Utc::now())
            .unwrap();
        assert_eq!(schedule.charging_schedule_period.len(), 1);
    }

    #[test]
    fn requested_unit_overrides_profile_unit() {
        let p = profile(1, 1, ChargingProfilePurpose::TxDefaultProfile, 0, 11000);
        let q = CompositeScheduleQuery {
            charging_rate_unit: Some(ChargingRateUnit::A),
            ..query(600)
        };

        assert!(!q.admits(&p));
        let schedule = HighestPriorityScheduler.compose(&[&p], &q, Utc::now()).unwrap();
        assert_eq!(schedule.charging_rate_unit, ChargingRateUnit::A);
    }

    #[test]
    fn no_candidates_means_no_schedule() {
        assert!(HighestPriorityScheduler
            .compose(&[], &query(600), Utc::now())
            .is_none());
    }

    #[test]
    fn query_admits_station_wide_profiles() {
        let station_wide = profile(1, 0, ChargingProfilePurpose::ChargePointMaxProfile, 0, 1);
        let other_connector = profile(2, 2, ChargingProfilePurpose::TxProfile, 0, 1);
        assert!(query(60).admits(&station_wide));
        assert!(!query(60).admits(&other_connector));
    }
}
