//! State-transition model

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of change between two classified health states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeType {
    /// At least one axis improved and none worsened
    Improved,
    /// At least one axis moved toward higher severity
    Worsened,
    /// Neither axis moved
    Stable,
}

impl ChangeType {
    /// Get a descriptive name for this change type
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Improved => "improved",
            Self::Worsened => "worsened",
            Self::Stable => "stable",
        }
    }
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// An ordinal change between two temporally ordered health-state records
///
/// Only emitted for non-stable pairs; a stable comparison produces nothing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateTransition {
    /// Transition identifier, unique per compared record pair
    pub id: String,
    /// Patient the transition belongs to
    pub patient_id: String,
    /// Earlier record of the compared pair
    pub from_record: String,
    /// Later record of the compared pair
    pub to_record: String,
    /// Direction of the change
    pub change_type: ChangeType,
    /// Whether a hard clinical threshold was crossed
    pub crossed_critical_threshold: bool,
    /// Composite risk tier movement (positive = risk increased)
    pub risk_delta: i8,
    /// Relative eGFR change across the interval (negative = decline)
    pub egfr_relative_change: f64,
    /// Measurement date of the later record
    pub transition_date: NaiveDateTime,
}

impl StateTransition {
    /// Deterministic transition id for a compared record pair
    #[must_use]
    pub fn transition_id(from_record: &str, to_record: &str) -> String {
        format!("{from_record}~{to_record}")
    }
}
