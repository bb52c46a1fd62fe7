//! Action recommendation model

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{NephrologError, Result};

/// Candidate clinical action surfaced to a clinician
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecommendationType {
    /// Order repeat eGFR/uACR to confirm the finding
    ConfirmatoryLabs,
    /// Refer the patient to nephrology
    NephrologyReferral,
    /// Review current medication for renal dosing and nephrotoxicity
    MedicationReview,
    /// Intensify blood-pressure management
    BloodPressureControl,
    /// Dietary counseling for kidney health
    DietaryCounseling,
}

impl RecommendationType {
    /// Get a descriptive name for this recommendation type
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::ConfirmatoryLabs => "confirmatory_labs",
            Self::NephrologyReferral => "nephrology_referral",
            Self::MedicationReview => "medication_review",
            Self::BloodPressureControl => "blood_pressure_control",
            Self::DietaryCounseling => "dietary_counseling",
        }
    }
}

impl fmt::Display for RecommendationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// How soon the candidate action should be taken
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Urgency {
    /// Next routine contact
    Routine,
    /// Within days
    Urgent,
}

impl Urgency {
    /// Get a descriptive name for this urgency
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Routine => "routine",
            Self::Urgent => "urgent",
        }
    }
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Lifecycle status of a recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecommendationStatus {
    /// Awaiting clinician review
    Pending,
    /// Being acted on
    InProgress,
    /// Carried out
    Completed,
    /// Judged not applicable
    Dismissed,
}

impl RecommendationStatus {
    /// Get a descriptive name for this status
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Dismissed => "dismissed",
        }
    }

    /// Whether moving to `next` is an allowed lifecycle step
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::InProgress)
                | (Self::Pending, Self::Completed)
                | (Self::Pending, Self::Dismissed)
                | (Self::InProgress, Self::Completed)
                | (Self::InProgress, Self::Dismissed)
        )
    }
}

impl fmt::Display for RecommendationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// A prioritized candidate action for one patient
///
/// Generation is idempotent per (patient, recommendation type, cycle), so a
/// re-run over unchanged data cannot produce duplicate pending entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionRecommendation {
    /// Recommendation identifier, deterministic per (patient, type, cycle)
    pub id: String,
    /// Patient the recommendation concerns
    pub patient_id: String,
    /// Candidate action
    pub recommendation_type: RecommendationType,
    /// How soon to act
    pub urgency: Urgency,
    /// Sort priority (lower sorts first)
    pub priority: u8,
    /// Lifecycle status
    pub status: RecommendationStatus,
    /// Monitoring cycle that generated the recommendation
    pub cycle: u32,
    /// When the recommendation was generated
    pub created_at: NaiveDateTime,
}

impl ActionRecommendation {
    /// Create a new pending recommendation
    #[must_use]
    pub fn new(
        patient_id: impl Into<String>,
        recommendation_type: RecommendationType,
        urgency: Urgency,
        priority: u8,
        cycle: u32,
        created_at: NaiveDateTime,
    ) -> Self {
        let patient_id = patient_id.into();
        Self {
            id: format!(
                "{patient_id}-r{cycle:04}-{}",
                recommendation_type.description()
            ),
            patient_id,
            recommendation_type,
            urgency,
            priority,
            status: RecommendationStatus::Pending,
            cycle,
            created_at,
        }
    }

    /// Apply a status transition, rejecting illegal moves
    pub fn transition_status(&mut self, next: RecommendationStatus) -> Result<()> {
        if !self.status.can_transition_to(next) {
            return Err(NephrologError::state_conflict(
                "recommendation",
                self.id.clone(),
                format!("a status that can move to {next}"),
                self.status,
            ));
        }
        self.status = next;
        Ok(())
    }
}
