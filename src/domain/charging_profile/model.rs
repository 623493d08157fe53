//! ChargingProfile domain entity

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Charging profile purpose.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChargingProfilePurpose {
    ChargePointMaxProfile,
    #[default]
    TxDefaultProfile,
    TxProfile,
}

impl ChargingProfilePurpose {
    /// Rank used by composite schedule selection; higher wins.
    pub fn priority(self) -> u8 {
        match self {
            Self::ChargePointMaxProfile => 3,
            Self::TxDefaultProfile => 2,
            Self::TxProfile => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChargingProfileKind {
    #[default]
    Absolute,
    Recurring,
    Relative,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecurrencyKind {
    Daily,
    Weekly,
}

/// Unit of a schedule limit: Watts or Amperes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChargingRateUnit {
    #[default]
    W,
    A,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargingSchedulePeriod {
    /// Offset in seconds from the start of the schedule.
    pub start_period: i32,
    pub limit: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_phases: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargingSchedule {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_schedule: Option<DateTime<Utc>>,
    pub charging_rate_unit: ChargingRateUnit,
    pub charging_schedule_period: Vec<ChargingSchedulePeriod>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_charging_rate: Option<Decimal>,
}

/// A charging profile installed on a charge station.
#[derive(Debug, Clone, PartialEq)]
pub struct ChargingProfile {
    pub charge_station_id: String,
    /// 0 = whole station / grid connection.
    pub connector_id: i32,
    pub charging_profile_id: i32,
    /// Higher = higher priority.
    pub stack_level: i32,
    pub purpose: ChargingProfilePurpose,
    pub kind: ChargingProfileKind,
    pub recurrency_kind: Option<RecurrencyKind>,
    pub valid_from: Option<DateTime<Utc>>,
    pub valid_to: Option<DateTime<Utc>>,
    pub charging_schedule: ChargingSchedule,
}

/// Filters for listing and clearing profiles. `None` matches anything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChargingProfileCriteria {
    pub charging_profile_id: Option<i32>,
    pub connector_id: Option<i32>,
    pub purpose: Option<ChargingProfilePurpose>,
    pub stack_level: Option<i32>,
}

impl ChargingProfileCriteria {
    pub fn matches(&self, profile: &ChargingProfile) -> bool {
        self.charging_profile_id
            .map_or(true, |id| id == profile.charging_profile_id)
            && self
                .connector_id
                .map_or(true, |id| id == profile.connector_id)
            && self.purpose.map_or(true, |p| p == profile.purpose)
            && self
                .stack_level
                .map_or(true, |level| level == profile.stack_level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(purpose: ChargingProfilePurpose, stack_level: i32) -> ChargingProfile {
        ChargingProfile {
            charge_station_id: "CS001".into(),
            connector_id: 1,
            charging_profile_id: 7,
            stack_level,
            purpose,
            kind: ChargingProfileKind::Absolute,
            recurrency_kind: None,
            valid_from: None,
            valid_to: None,
            charging_schedule: ChargingSchedule::default(),
        }
    }

    #[test]
    fn purpose_priority_order() {
        assert!(
            ChargingProfilePurpose::ChargePointMaxProfile.priority()
                > ChargingProfilePurpose::TxDefaultProfile.priority()
        );
        assert!(
            ChargingProfilePurpose::TxDefaultProfile.priority()
                > ChargingProfilePurpose::TxProfile.priority()
        );
    }

    #[test]
    fn empty_criteria_match_everything() {
        let p = profile(ChargingProfilePurpose::TxProfile, 3);
        assert!(ChargingProfileCriteria::default().matches(&p));
    }

    #[test]
    fn criteria_require_every_supplied_field() {
        let p = profile(ChargingProfilePurpose::TxProfile, 3);
        let criteria = ChargingProfileCriteria {
            purpose: Some(ChargingProfilePurpose::TxProfile),
            stack_level: Some(4),
            ..Default::default()
        };
        assert!(!criteria.matches(&p));

        let criteria = ChargingProfileCriteria {
            charging_profile_id: Some(7),
            connector_id: Some(1),
            ..Default::default()
        };
        assert!(criteria.matches(&p));
    }

    #[test]
    fn schedule_uses_ocpp_field_names() {
        let schedule = ChargingSchedule {
            charging_rate_unit: ChargingRateUnit::A,
            charging_schedule_period: vec![ChargingSchedulePeriod {
                start_period: 0,
                limit: Decimal::from(16),
                number_phases: Some(3),
            }],
            ..Default::default()
        };
        let json = serde_json::to_value(&schedule).unwrap();
        assert_eq!(json["chargingRateUnit"], "A");
        assert_eq!(json["chargingSchedulePeriod"][0]["startPeriod"], 0);
        assert_eq!(json["chargingSchedulePeriod"][0]["limit"], 16.0);
        assert!(json.get("duration").is_none());
    }
}
