//! Domain entity models
//!
//! This module contains the tagged records persisted by the monitoring core.
//! Loosely typed store rows are validated into these models at the storage
//! boundary on read.

pub mod action;
pub mod alert;
pub mod diagnosis;
pub mod health_state;
pub mod lab;
pub mod recommendation;
pub mod transition;
pub mod treatment;

pub use action::{ActionStatus, ActionType, DoctorAction};
pub use alert::{AlertSeverity, AlertStatus, AlertType, MonitoringAlert};
pub use diagnosis::{DetectionTrigger, DiagnosisEvent, DiagnosisPhase, DiagnosisTrackerState};
pub use health_state::HealthStateRecord;
pub use lab::{LabPanel, Patient};
pub use recommendation::{ActionRecommendation, RecommendationStatus, RecommendationType, Urgency};
pub use transition::{ChangeType, StateTransition};
pub use treatment::{LabCheck, MedicationOrder, ProtocolStatus, Referral, TreatmentProtocol};
