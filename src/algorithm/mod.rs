//! Clinical algorithms
//!
//! Pure decision logic: KDIGO grid classification, longitudinal transition
//! detection, the diagnosis confirmation protocol, and treatment drafting.
//! Nothing in here touches the store.

pub mod diagnosis;
pub mod kdigo;
pub mod transition;
pub mod treatment;

pub use diagnosis::{DiagnosisDetector, StepOutcome};
pub use kdigo::{classify, KdigoAssessment};
pub use transition::TransitionDetector;
pub use treatment::TreatmentProtocolBuilder;
