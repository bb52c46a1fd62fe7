//! Patient and laboratory panel models

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::{NephrologError, Result};

/// A patient known to the monitoring core
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patient {
    /// Opaque patient identifier
    pub id: String,
    /// Comorbid conditions relevant to kidney care (e.g. diabetes, hypertension)
    pub conditions: Vec<String>,
}

impl Patient {
    /// Create a new patient with no recorded conditions
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            conditions: Vec::new(),
        }
    }

    /// Attach a comorbid condition
    #[must_use]
    pub fn with_condition(mut self, condition: impl Into<String>) -> Self {
        self.conditions.push(condition.into());
        self
    }

    /// Check whether a condition is present (case-insensitive)
    #[must_use]
    pub fn has_condition(&self, condition: &str) -> bool {
        self.conditions
            .iter()
            .any(|c| c.eq_ignore_ascii_case(condition))
    }
}

/// One set of kidney-function lab values for a patient
///
/// eGFR is mandatory; construction fails fast on a missing or non-physical
/// value. uACR is optional and its absence degrades downstream risk
/// precision rather than erroring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabPanel {
    /// Patient the panel belongs to
    pub patient_id: String,
    /// When the sample was measured
    pub measured_at: NaiveDateTime,
    /// Estimated glomerular filtration rate (mL/min/1.73m²)
    pub egfr: f64,
    /// Urine albumin-to-creatinine ratio (mg/g), if measured
    pub uacr: Option<f64>,
}

impl LabPanel {
    /// Create a validated lab panel
    pub fn new(
        patient_id: impl Into<String>,
        measured_at: NaiveDateTime,
        egfr: f64,
        uacr: Option<f64>,
    ) -> Result<Self> {
        if !egfr.is_finite() || egfr <= 0.0 {
            return Err(NephrologError::validation(
                "egfr",
                format!("must be a finite value above zero, got {egfr}"),
            ));
        }
        if let Some(value) = uacr {
            if !value.is_finite() || value < 0.0 {
                return Err(NephrologError::validation(
                    "uacr",
                    format!("must be a finite non-negative value, got {value}"),
                ));
            }
        }
        Ok(Self {
            patient_id: patient_id.into(),
            measured_at,
            egfr,
            uacr,
        })
    }
}
