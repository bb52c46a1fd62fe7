//! KDIGO classification
//!
//! This module implements the KDIGO classification of kidney function:
//! a pure mapping from eGFR/uACR lab values onto the two-axis grid of
//! eGFR category (G1-G5) and albuminuria category (A1-A3), the composite
//! heat-map risk level, and the CKD stage label.

pub mod categories;
pub mod risk;

pub use categories::{AlbuminuriaCategory, EgfrCategory};
pub use risk::{CkdStage, RiskLevel, heat_map_risk};

use serde::{Deserialize, Serialize};
use std::fmt;

/// A full KDIGO assessment of one lab panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KdigoAssessment {
    /// eGFR axis category
    pub egfr_category: EgfrCategory,
    /// Albuminuria axis category
    pub albuminuria_category: AlbuminuriaCategory,
    /// Composite heat-map risk level
    pub risk_level: RiskLevel,
    /// Stage label derived from the eGFR axis
    pub stage: CkdStage,
}

impl fmt::Display for KdigoAssessment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} ({}, risk {})",
            self.egfr_category, self.albuminuria_category, self.stage, self.risk_level
        )
    }
}

/// Classify a lab panel onto the KDIGO grid
///
/// Deterministic and side-effect free. Input validation happens at lab-panel
/// construction; this function is total over validated values. A missing
/// uACR yields an `Unknown` albuminuria category and the risk falls back to
/// the A1 column of the heat-map.
#[must_use]
pub fn classify(egfr: f64, uacr: Option<f64>) -> KdigoAssessment {
    let egfr_category = EgfrCategory::from_egfr(egfr);
    let albuminuria_category = AlbuminuriaCategory::from_uacr(uacr);
    KdigoAssessment {
        egfr_category,
        albuminuria_category,
        risk_level: heat_map_risk(egfr_category, albuminuria_category),
        stage: CkdStage::from_category(egfr_category),
    }
}
