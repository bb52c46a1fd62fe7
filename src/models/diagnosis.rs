//! CKD diagnosis event and confirmation-tracker models

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::algorithm::kdigo::CkdStage;

/// Which abnormal finding started the confirmation protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DetectionTrigger {
    /// eGFR below the abnormal threshold
    LowEgfr,
    /// uACR above the abnormal threshold
    ElevatedUacr,
    /// Both values abnormal on the same panel
    Both,
}

impl DetectionTrigger {
    /// Get a descriptive name for this trigger
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::LowEgfr => "low_egfr",
            Self::ElevatedUacr => "elevated_uacr",
            Self::Both => "low_egfr_and_elevated_uacr",
        }
    }
}

impl fmt::Display for DetectionTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// A CKD diagnosis produced by the two-result confirmation protocol
///
/// `diagnosis_confirmed` stays false until a doctor completes the queued
/// confirmation action; the detector itself never sets it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosisEvent {
    /// Event identifier, deterministic per (patient, first abnormal date)
    pub id: String,
    /// Patient the diagnosis concerns
    pub patient_id: String,
    /// eGFR of the confirmatory result
    pub egfr_at_diagnosis: f64,
    /// uACR of the confirmatory result, if measured
    pub uacr_at_diagnosis: Option<f64>,
    /// CKD stage computed from the confirmatory values
    pub stage: CkdStage,
    /// What started the pending period
    pub trigger: DetectionTrigger,
    /// Date of the first abnormal result
    pub first_abnormal_date: NaiveDate,
    /// Date of the confirmatory result
    pub confirmatory_date: NaiveDate,
    /// True only after a doctor confirms via the action queue
    pub diagnosis_confirmed: bool,
}

impl DiagnosisEvent {
    /// Deterministic event id for a patient's pending period
    #[must_use]
    pub fn event_id(patient_id: &str, first_abnormal_date: NaiveDate) -> String {
        format!("{patient_id}-dx{first_abnormal_date}")
    }
}

/// Position of one patient in the confirmation state machine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DiagnosisPhase {
    /// No unconfirmed abnormal result on file
    Normal,
    /// First abnormal result recorded, confirmatory window not yet open
    AbnormalPending {
        /// Date of the first abnormal result
        first_date: NaiveDate,
        /// eGFR of the first abnormal result
        first_egfr: f64,
        /// uACR of the first abnormal result, if measured
        first_uacr: Option<f64>,
        /// What made the result abnormal
        trigger: DetectionTrigger,
    },
    /// Confirmatory test due; a qualifying result confirms the diagnosis
    ConfirmationDue {
        /// Date of the first abnormal result
        first_date: NaiveDate,
        /// eGFR of the first abnormal result
        first_egfr: f64,
        /// uACR of the first abnormal result, if measured
        first_uacr: Option<f64>,
        /// What made the result abnormal
        trigger: DetectionTrigger,
    },
    /// Diagnosis produced; awaiting or past doctor confirmation
    Confirmed {
        /// The emitted diagnosis event
        event_id: String,
    },
}

impl DiagnosisPhase {
    /// Get a descriptive name for this phase
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::AbnormalPending { .. } => "abnormal_pending",
            Self::ConfirmationDue { .. } => "confirmation_due",
            Self::Confirmed { .. } => "confirmed",
        }
    }
}

impl fmt::Display for DiagnosisPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Persisted state-machine position for one patient
///
/// Stored alongside the cycle writes so scans resume the protocol where the
/// previous scan left it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosisTrackerState {
    /// Patient the tracker belongs to
    pub patient_id: String,
    /// Current state-machine position
    pub phase: DiagnosisPhase,
    /// When the tracker last moved
    pub updated_at: NaiveDateTime,
}

impl DiagnosisTrackerState {
    /// Create a tracker at the normal (no pending abnormality) position
    #[must_use]
    pub fn normal(patient_id: impl Into<String>, updated_at: NaiveDateTime) -> Self {
        Self {
            patient_id: patient_id.into(),
            phase: DiagnosisPhase::Normal,
            updated_at,
        }
    }
}
