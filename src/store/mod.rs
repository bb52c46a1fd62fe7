//! Durable store boundary
//!
//! The monitoring core treats persistence as an external collaborator: a
//! keyed, time-ordered collection addressable by patient id, with atomic
//! multi-row writes per patient cycle. `HealthStore` is that contract;
//! `MemoryStore` is the in-process reference implementation used by tests
//! and the demo binary.

pub mod memory;

pub use memory::MemoryStore;

use crate::error::Result;
use crate::models::action::{ActionStatus, ActionType, DoctorAction};
use crate::models::alert::{AlertStatus, MonitoringAlert};
use crate::models::diagnosis::{DiagnosisEvent, DiagnosisTrackerState};
use crate::models::health_state::HealthStateRecord;
use crate::models::lab::{LabPanel, Patient};
use crate::models::recommendation::{ActionRecommendation, RecommendationStatus};
use crate::models::transition::StateTransition;
use crate::models::treatment::{ProtocolStatus, TreatmentProtocol};

/// All writes produced by one patient cycle
///
/// Applied atomically: a crash mid-cycle must never leave a transition
/// recorded without its alerts and recommendations, nor a diagnosis without
/// its tracker update. Every entity carries a deterministic id, so applying
/// the same write twice is a no-op.
#[derive(Debug, Clone)]
pub struct CycleWrite {
    /// The newly classified health-state record
    pub record: HealthStateRecord,
    /// Transition against the previous record, when non-stable
    pub transition: Option<StateTransition>,
    /// Alerts raised by this cycle
    pub alerts: Vec<MonitoringAlert>,
    /// Recommendations generated by this cycle
    pub recommendations: Vec<ActionRecommendation>,
    /// Diagnosis event emitted by the confirmation protocol, if any
    pub diagnosis_event: Option<DiagnosisEvent>,
    /// Doctor action queued alongside the diagnosis event, if any
    pub action: Option<DoctorAction>,
    /// Updated confirmation-tracker position
    pub tracker: DiagnosisTrackerState,
}

impl CycleWrite {
    /// Start a cycle write holding only the record and tracker update
    #[must_use]
    pub fn new(record: HealthStateRecord, tracker: DiagnosisTrackerState) -> Self {
        Self {
            record,
            transition: None,
            alerts: Vec::new(),
            recommendations: Vec::new(),
            diagnosis_event: None,
            action: None,
            tracker,
        }
    }
}

/// Filter for doctor-action listings
#[derive(Debug, Clone, Default)]
pub struct ActionFilter {
    /// Restrict to one patient
    pub patient_id: Option<String>,
    /// Restrict to one action type
    pub action_type: Option<ActionType>,
    /// Restrict to one status
    pub status: Option<ActionStatus>,
    /// Keep only actions at least this urgent (lower number = more urgent)
    pub max_priority: Option<u8>,
}

impl ActionFilter {
    /// Whether an action passes the filter
    #[must_use]
    pub fn matches(&self, action: &DoctorAction) -> bool {
        self.patient_id
            .as_ref()
            .is_none_or(|id| *id == action.patient_id)
            && self.action_type.is_none_or(|t| t == action.action_type)
            && self.status.is_none_or(|s| s == action.status)
            && self.max_priority.is_none_or(|p| action.priority <= p)
    }
}

/// Contract between the monitoring core and the durable store
///
/// Implementations must make `commit_cycle` atomic and `complete_action` a
/// check-and-set: two concurrent completion attempts on the same action
/// yield exactly one success and one state-conflict error.
pub trait HealthStore: Send + Sync {
    /// All patient ids known to the store
    fn patient_ids(&self) -> Result<Vec<String>>;

    /// Look up one patient
    fn patient(&self, patient_id: &str) -> Result<Patient>;

    /// A patient's lab panels in measurement order
    fn lab_history(&self, patient_id: &str) -> Result<Vec<LabPanel>>;

    /// A patient's health-state records in measurement order
    fn records(&self, patient_id: &str) -> Result<Vec<HealthStateRecord>>;

    /// A patient's recorded state transitions
    fn transitions(&self, patient_id: &str) -> Result<Vec<StateTransition>>;

    /// A patient's confirmation-tracker position, if one was persisted
    fn tracker(&self, patient_id: &str) -> Result<Option<DiagnosisTrackerState>>;

    /// Apply one patient cycle's writes as a single atomic unit
    fn commit_cycle(&self, write: CycleWrite) -> Result<()>;

    /// Insert a standalone alert; returns false when it already exists
    fn insert_alert(&self, alert: MonitoringAlert) -> Result<bool>;

    /// A patient's alerts, most urgent first
    fn alerts(&self, patient_id: &str) -> Result<Vec<MonitoringAlert>>;

    /// Move an alert through its status lifecycle
    fn update_alert_status(&self, alert_id: &str, status: AlertStatus) -> Result<MonitoringAlert>;

    /// A patient's recommendations, most urgent first
    fn recommendations(&self, patient_id: &str) -> Result<Vec<ActionRecommendation>>;

    /// Move a recommendation through its status lifecycle
    fn update_recommendation_status(
        &self,
        recommendation_id: &str,
        status: RecommendationStatus,
    ) -> Result<ActionRecommendation>;

    /// A patient's diagnosis events
    fn diagnosis_events(&self, patient_id: &str) -> Result<Vec<DiagnosisEvent>>;

    /// Look up one diagnosis event
    fn diagnosis_event(&self, event_id: &str) -> Result<DiagnosisEvent>;

    /// Mark a diagnosis doctor-confirmed
    fn set_diagnosis_confirmed(&self, event_id: &str) -> Result<DiagnosisEvent>;

    /// Add a pending doctor action; rejects a duplicate for the same
    /// (patient, type, referent)
    fn enqueue_action(&self, action: DoctorAction) -> Result<()>;

    /// Look up one doctor action
    fn action(&self, action_id: &str) -> Result<DoctorAction>;

    /// Doctor actions passing a filter
    fn actions(&self, filter: &ActionFilter) -> Result<Vec<DoctorAction>>;

    /// Complete a pending action exactly once (check-and-set on status)
    fn complete_action(
        &self,
        action_id: &str,
        actor: &str,
        notes: Option<String>,
        approved: bool,
        completed_at: chrono::NaiveDateTime,
    ) -> Result<DoctorAction>;

    /// Persist a drafted treatment protocol
    fn insert_protocol(&self, protocol: TreatmentProtocol) -> Result<()>;

    /// Look up one treatment protocol
    fn protocol(&self, protocol_id: &str) -> Result<TreatmentProtocol>;

    /// A patient's treatment protocols
    fn protocols(&self, patient_id: &str) -> Result<Vec<TreatmentProtocol>>;

    /// Move a protocol to approved/declined/active
    fn update_protocol_status(
        &self,
        protocol_id: &str,
        status: ProtocolStatus,
    ) -> Result<TreatmentProtocol>;
}
