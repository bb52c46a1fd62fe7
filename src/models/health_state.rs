//! Health-state record model

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::algorithm::kdigo::KdigoAssessment;

/// A classified kidney health state at one point in time
///
/// Created each time new labs are processed; immutable once written.
/// Record ids are deterministic per (patient, cycle) so that re-running a
/// scan over unchanged data maps onto the same rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStateRecord {
    /// Record identifier, unique per patient cycle
    pub id: String,
    /// Patient the record belongs to
    pub patient_id: String,
    /// When the underlying labs were measured
    pub measured_at: NaiveDateTime,
    /// eGFR value the classification was derived from
    pub egfr: f64,
    /// uACR value the classification was derived from, if measured
    pub uacr: Option<f64>,
    /// Derived KDIGO assessment
    pub assessment: KdigoAssessment,
    /// Monitoring cycle number, strictly increasing per patient
    pub cycle: u32,
}

impl HealthStateRecord {
    /// Create a record for a classified lab panel
    #[must_use]
    pub fn new(
        patient_id: impl Into<String>,
        measured_at: NaiveDateTime,
        egfr: f64,
        uacr: Option<f64>,
        assessment: KdigoAssessment,
        cycle: u32,
    ) -> Self {
        let patient_id = patient_id.into();
        Self {
            id: Self::record_id(&patient_id, cycle),
            patient_id,
            measured_at,
            egfr,
            uacr,
            assessment,
            cycle,
        }
    }

    /// Deterministic record id for a patient cycle
    #[must_use]
    pub fn record_id(patient_id: &str, cycle: u32) -> String {
        format!("{patient_id}-c{cycle:04}")
    }
}
