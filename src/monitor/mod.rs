//! Monitoring scans
//!
//! The live progression scan, its alert and recommendation engines, the
//! independent uACR trend scan, and the structurally isolated synthetic
//! cohort generator.

pub mod alerts;
pub mod progression;
pub mod recommend;
pub mod synthetic;
pub mod uacr;

pub use alerts::AlertEngine;
pub use progression::{ProgressionMonitor, ScanSummary};
pub use recommend::RecommendationEngine;
pub use synthetic::{SyntheticCohort, SyntheticGenerator};
pub use uacr::{UacrFinding, UacrMonitor, UacrScanSummary, UacrSeverity};
