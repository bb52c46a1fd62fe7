//! Monitoring alert model

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{NephrologError, Result};

/// Clinical weight of an alert
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AlertSeverity {
    /// Informational, no immediate action expected
    Info = 1,
    /// Needs clinician attention
    Warning = 2,
    /// A hard clinical threshold was breached
    Critical = 3,
}

impl AlertSeverity {
    /// Get a descriptive name for this severity
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Critical => "critical",
        }
    }

    /// Default queue priority for this severity (lower sorts first)
    #[must_use]
    pub const fn default_priority(self) -> u8 {
        match self {
            Self::Critical => 1,
            Self::Warning => 2,
            Self::Info => 3,
        }
    }
}

impl fmt::Display for AlertSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// What kind of finding raised the alert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlertType {
    /// Health state moved to a more severe grid cell
    StageProgression,
    /// Relative eGFR decline at or above the rapid-progressor threshold
    RapidDecline,
    /// eGFR entered the severely reduced range
    CriticalFunction,
    /// Albuminuria trend worsening detected by the uACR scan
    AlbuminuriaTrend,
}

impl AlertType {
    /// Get a descriptive name for this alert type
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::StageProgression => "stage_progression",
            Self::RapidDecline => "rapid_decline",
            Self::CriticalFunction => "critical_function",
            Self::AlbuminuriaTrend => "albuminuria_trend",
        }
    }
}

impl fmt::Display for AlertType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Lifecycle status of an alert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlertStatus {
    /// Newly raised, unreviewed
    Active,
    /// Seen by a clinician
    Acknowledged,
    /// The underlying condition was addressed
    Resolved,
    /// Judged not actionable
    Dismissed,
}

impl AlertStatus {
    /// Get a descriptive name for this status
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Acknowledged => "acknowledged",
            Self::Resolved => "resolved",
            Self::Dismissed => "dismissed",
        }
    }

    /// Whether moving to `next` is an allowed lifecycle step
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Active, Self::Acknowledged)
                | (Self::Active, Self::Resolved)
                | (Self::Active, Self::Dismissed)
                | (Self::Acknowledged, Self::Resolved)
                | (Self::Acknowledged, Self::Dismissed)
        )
    }
}

impl fmt::Display for AlertStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// A clinician-facing alert raised by a monitoring scan
///
/// Mutated only via status transitions; never re-derived for the same
/// source record pair or reading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringAlert {
    /// Alert identifier, deterministic per source
    pub id: String,
    /// Patient the alert concerns
    pub patient_id: String,
    /// Clinical weight
    pub severity: AlertSeverity,
    /// Kind of finding
    pub alert_type: AlertType,
    /// Human-readable summary of the finding
    pub message: String,
    /// Lifecycle status
    pub status: AlertStatus,
    /// Sort priority (lower sorts first)
    pub priority: u8,
    /// Key of the record pair or reading the alert was derived from
    pub source_key: String,
    /// When the alert was raised
    pub created_at: NaiveDateTime,
}

impl MonitoringAlert {
    /// Create a new active alert
    #[must_use]
    pub fn new(
        patient_id: impl Into<String>,
        severity: AlertSeverity,
        alert_type: AlertType,
        message: impl Into<String>,
        source_key: impl Into<String>,
        created_at: NaiveDateTime,
    ) -> Self {
        let patient_id = patient_id.into();
        let source_key = source_key.into();
        Self {
            id: format!("{patient_id}-{}-{source_key}", alert_type.description()),
            patient_id,
            severity,
            alert_type,
            message: message.into(),
            status: AlertStatus::Active,
            priority: severity.default_priority(),
            source_key,
            created_at,
        }
    }

    /// Apply a status transition, rejecting illegal moves
    pub fn transition_status(&mut self, next: AlertStatus) -> Result<()> {
        if !self.status.can_transition_to(next) {
            return Err(NephrologError::state_conflict(
                "alert",
                self.id.clone(),
                format!("a status that can move to {next}"),
                self.status,
            ));
        }
        self.status = next;
        Ok(())
    }
}
