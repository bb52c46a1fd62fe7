//! A Rust library for chronic kidney disease progression monitoring:
//! KDIGO classification of lab values, longitudinal state-transition
//! detection, alert and recommendation generation, the two-result
//! diagnosis confirmation protocol, and a doctor-action queue gating
//! automated clinical decisions behind explicit human confirmation.

pub mod algorithm;
pub mod config;
pub mod error;
pub mod models;
pub mod monitor;
pub mod queue;
pub mod store;
pub mod utils;

// Re-export the most common types for easier use
// Core types
pub use config::{ConfirmationConfig, ScanConfig, UacrConfig};
pub use error::{NephrologError, Result};

// Classification
pub use algorithm::kdigo::{
    AlbuminuriaCategory, CkdStage, EgfrCategory, KdigoAssessment, RiskLevel, classify,
};
pub use algorithm::{DiagnosisDetector, TransitionDetector, TreatmentProtocolBuilder};

// Scans and engines
pub use monitor::{
    AlertEngine, ProgressionMonitor, RecommendationEngine, ScanSummary, SyntheticGenerator,
    UacrMonitor, UacrSeverity,
};

// Storage boundary and the doctor-action queue
pub use queue::{CompletionOutcome, DoctorActionQueue};
pub use store::{ActionFilter, CycleWrite, HealthStore, MemoryStore};
