//! Composite risk and stage derivation
//!
//! This module maps a KDIGO grid cell to the published heat-map risk level
//! and derives the CKD stage label from the eGFR axis.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::categories::{AlbuminuriaCategory, EgfrCategory};

/// Composite risk levels from the KDIGO heat-map
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskLevel {
    /// Green cells of the heat-map
    Low = 1,
    /// Yellow cells
    Moderate = 2,
    /// Orange cells
    High = 3,
    /// Red cells
    VeryHigh = 4,
}

impl RiskLevel {
    /// Severity rank of this risk level (1 = lowest)
    #[must_use]
    pub const fn severity_rank(self) -> u8 {
        self as u8
    }

    /// Get the display name for this risk level
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Moderate => "moderate",
            Self::High => "high",
            Self::VeryHigh => "very_high",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// CKD stage labels derived from the eGFR axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CkdStage {
    /// eGFR category G1
    Stage1 = 1,
    /// eGFR category G2
    Stage2 = 2,
    /// eGFR category G3a
    Stage3a = 3,
    /// eGFR category G3b
    Stage3b = 4,
    /// eGFR category G4
    Stage4 = 5,
    /// eGFR category G5
    Stage5 = 6,
}

impl CkdStage {
    /// Derive the stage label from an eGFR category
    #[must_use]
    pub const fn from_category(category: EgfrCategory) -> Self {
        match category {
            EgfrCategory::G1 => Self::Stage1,
            EgfrCategory::G2 => Self::Stage2,
            EgfrCategory::G3a => Self::Stage3a,
            EgfrCategory::G3b => Self::Stage3b,
            EgfrCategory::G4 => Self::Stage4,
            EgfrCategory::G5 => Self::Stage5,
        }
    }

    /// Queue priority for doctor review at this stage (lower sorts first)
    #[must_use]
    pub const fn severity_priority(self) -> u8 {
        match self {
            Self::Stage4 | Self::Stage5 => 1,
            Self::Stage3a | Self::Stage3b => 2,
            Self::Stage1 | Self::Stage2 => 3,
        }
    }

    /// Get the display name for this stage
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Stage1 => "CKD Stage 1",
            Self::Stage2 => "CKD Stage 2",
            Self::Stage3a => "CKD Stage 3a",
            Self::Stage3b => "CKD Stage 3b",
            Self::Stage4 => "CKD Stage 4",
            Self::Stage5 => "CKD Stage 5",
        }
    }
}

impl fmt::Display for CkdStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Look up the heat-map risk level for a grid cell
///
/// An unknown albuminuria category falls back to the A1 column, degrading
/// precision rather than failing.
#[must_use]
pub const fn heat_map_risk(egfr: EgfrCategory, albuminuria: AlbuminuriaCategory) -> RiskLevel {
    use AlbuminuriaCategory::{A1, A2, A3, Unknown};
    use EgfrCategory::{G1, G2, G3a, G3b, G4, G5};

    match (egfr, albuminuria) {
        (G1 | G2, A1 | Unknown) => RiskLevel::Low,
        (G1 | G2, A2) | (G3a, A1 | Unknown) => RiskLevel::Moderate,
        (G1 | G2, A3) | (G3a, A2) | (G3b, A1 | Unknown) => RiskLevel::High,
        (G3a, A3) | (G3b, A2 | A3) | (G4 | G5, _) => RiskLevel::VeryHigh,
    }
}
