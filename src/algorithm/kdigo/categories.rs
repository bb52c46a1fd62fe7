//! KDIGO grid axis categories
//!
//! This module defines the two axes of the KDIGO classification grid:
//! eGFR categories G1-G5 and albuminuria categories A1-A3.

use serde::{Deserialize, Serialize};
use std::fmt;

/// eGFR categories, ordered by increasing severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EgfrCategory {
    /// Normal or high function (eGFR ≥ 90)
    G1 = 1,
    /// Mildly decreased (60-89)
    G2 = 2,
    /// Mildly to moderately decreased (45-59)
    G3a = 3,
    /// Moderately to severely decreased (30-44)
    G3b = 4,
    /// Severely decreased (15-29)
    G4 = 5,
    /// Kidney failure (< 15)
    G5 = 6,
}

impl EgfrCategory {
    /// Categorize an eGFR value (mL/min/1.73m²)
    #[must_use]
    pub fn from_egfr(egfr: f64) -> Self {
        if egfr >= 90.0 {
            Self::G1
        } else if egfr >= 60.0 {
            Self::G2
        } else if egfr >= 45.0 {
            Self::G3a
        } else if egfr >= 30.0 {
            Self::G3b
        } else if egfr >= 15.0 {
            Self::G4
        } else {
            Self::G5
        }
    }

    /// Severity rank of this category (1 = least severe)
    #[must_use]
    pub const fn severity_rank(self) -> u8 {
        self as u8
    }

    /// Get the display name for this category
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::G1 => "G1",
            Self::G2 => "G2",
            Self::G3a => "G3a",
            Self::G3b => "G3b",
            Self::G4 => "G4",
            Self::G5 => "G5",
        }
    }

    /// Whether this category is in the severely reduced range
    #[must_use]
    pub const fn is_severely_reduced(self) -> bool {
        matches!(self, Self::G4 | Self::G5)
    }

    /// Get all eGFR categories in severity order
    #[must_use]
    pub fn all_categories() -> Vec<Self> {
        vec![Self::G1, Self::G2, Self::G3a, Self::G3b, Self::G4, Self::G5]
    }
}

impl fmt::Display for EgfrCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Albuminuria categories, ordered by increasing severity
///
/// `Unknown` is not a severity tier; it marks an absent uACR measurement
/// and is excluded from ordinal comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlbuminuriaCategory {
    /// Normal to mildly increased (uACR < 30 mg/g)
    A1 = 1,
    /// Moderately increased (30-300)
    A2 = 2,
    /// Severely increased (> 300)
    A3 = 3,
    /// uACR not measured
    Unknown = 0,
}

impl AlbuminuriaCategory {
    /// Categorize an optional uACR value (mg/g)
    #[must_use]
    pub fn from_uacr(uacr: Option<f64>) -> Self {
        match uacr {
            None => Self::Unknown,
            Some(value) if value < 30.0 => Self::A1,
            Some(value) if value <= 300.0 => Self::A2,
            Some(_) => Self::A3,
        }
    }

    /// Severity rank, or `None` when the measurement is absent
    #[must_use]
    pub const fn severity_rank(self) -> Option<u8> {
        match self {
            Self::Unknown => None,
            Self::A1 => Some(1),
            Self::A2 => Some(2),
            Self::A3 => Some(3),
        }
    }

    /// Get the display name for this category
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::A1 => "A1",
            Self::A2 => "A2",
            Self::A3 => "A3",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for AlbuminuriaCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
