//! Doctor action queue entry model

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of human-confirmation task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionType {
    /// Confirm or reject a detected CKD diagnosis
    ConfirmDiagnosis,
    /// Approve or reject a drafted treatment protocol
    ApproveTreatment,
}

impl ActionType {
    /// Get a descriptive name for this action type
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::ConfirmDiagnosis => "confirm_diagnosis",
            Self::ApproveTreatment => "approve_treatment",
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Lifecycle status of a doctor action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionStatus {
    /// Awaiting the doctor
    Pending,
    /// Approved and applied
    Completed,
    /// Rejected
    Declined,
}

impl ActionStatus {
    /// Get a descriptive name for this status
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Declined => "declined",
        }
    }

    /// Whether the action can no longer change
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Declined)
    }
}

impl fmt::Display for ActionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// A pending human-confirmation task gating an automated decision
///
/// Terminal once completed or declined; immutable afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoctorAction {
    /// Action identifier, deterministic per (patient, type, referent)
    pub id: String,
    /// Patient the gated decision concerns
    pub patient_id: String,
    /// Kind of confirmation requested
    pub action_type: ActionType,
    /// Id of the diagnosis event or treatment protocol being gated
    pub referent_id: String,
    /// Sort priority (lower sorts first)
    pub priority: u8,
    /// Lifecycle status
    pub status: ActionStatus,
    /// When the action was queued
    pub created_at: NaiveDateTime,
    /// Doctor who completed the action, once terminal
    pub completed_by: Option<String>,
    /// Free-text notes recorded at completion
    pub completion_notes: Option<String>,
    /// When the action reached a terminal state
    pub completed_at: Option<NaiveDateTime>,
}

impl DoctorAction {
    /// Create a new pending action
    #[must_use]
    pub fn new(
        patient_id: impl Into<String>,
        action_type: ActionType,
        referent_id: impl Into<String>,
        priority: u8,
        created_at: NaiveDateTime,
    ) -> Self {
        let patient_id = patient_id.into();
        let referent_id = referent_id.into();
        Self {
            id: format!("{patient_id}-{}-{referent_id}", action_type.description()),
            patient_id,
            action_type,
            referent_id,
            priority,
            status: ActionStatus::Pending,
            created_at,
            completed_by: None,
            completion_notes: None,
            completed_at: None,
        }
    }
}
