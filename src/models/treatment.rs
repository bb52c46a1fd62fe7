//! Treatment protocol model

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{NephrologError, Result};

/// A draft medication order inside a protocol
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicationOrder {
    /// Drug class (e.g. "ACE inhibitor")
    pub drug_class: String,
    /// Dosing or titration instruction
    pub instruction: String,
}

/// A recurring lab check inside a protocol's monitoring schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabCheck {
    /// Test to order (e.g. "eGFR")
    pub test: String,
    /// Re-test interval in days
    pub interval_days: u32,
}

/// A specialist referral inside a protocol
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Referral {
    /// Specialty to refer to
    pub specialty: String,
    /// Reason for the referral
    pub reason: String,
    /// Whether the referral should be expedited
    pub urgent: bool,
}

/// Lifecycle status of a treatment protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProtocolStatus {
    /// Drafted, awaiting doctor approval
    Pending,
    /// Approved but not yet in effect
    Approved,
    /// Rejected by the reviewing doctor
    Declined,
    /// In effect
    Active,
}

impl ProtocolStatus {
    /// Get a descriptive name for this status
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Declined => "declined",
            Self::Active => "active",
        }
    }
}

impl fmt::Display for ProtocolStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// A draft treatment plan tied to a confirmed diagnosis
///
/// Created only after `diagnosis_confirmed` is set; activated only via an
/// approved treatment action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreatmentProtocol {
    /// Protocol identifier
    pub id: String,
    /// Patient the protocol is for
    pub patient_id: String,
    /// Diagnosis event the protocol was built from
    pub diagnosis_event_id: String,
    /// Short protocol name
    pub name: String,
    /// Draft medication orders
    pub medications: Vec<MedicationOrder>,
    /// Recurring lab monitoring schedule
    pub monitoring: Vec<LabCheck>,
    /// Specialist referrals
    pub referrals: Vec<Referral>,
    /// Lifecycle status
    pub status: ProtocolStatus,
    /// When the draft was created
    pub created_at: NaiveDateTime,
}

impl TreatmentProtocol {
    /// Deterministic protocol id for a diagnosis event
    #[must_use]
    pub fn protocol_id(diagnosis_event_id: &str) -> String {
        format!("{diagnosis_event_id}-protocol")
    }

    /// Mark the protocol active after an approved treatment action
    pub fn activate(&mut self) -> Result<()> {
        match self.status {
            ProtocolStatus::Pending | ProtocolStatus::Approved => {
                self.status = ProtocolStatus::Active;
                Ok(())
            }
            other => Err(NephrologError::state_conflict(
                "treatment protocol",
                self.id.clone(),
                ProtocolStatus::Pending,
                other,
            )),
        }
    }

    /// Mark the protocol declined after a rejected treatment action
    pub fn decline(&mut self) -> Result<()> {
        match self.status {
            ProtocolStatus::Pending => {
                self.status = ProtocolStatus::Declined;
                Ok(())
            }
            other => Err(NephrologError::state_conflict(
                "treatment protocol",
                self.id.clone(),
                ProtocolStatus::Pending,
                other,
            )),
        }
    }
}
