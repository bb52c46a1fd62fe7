//! In-memory reference store
//!
//! Backs tests and the demo binary. One mutex over the whole state makes
//! every trait operation atomic, which is exactly the contract a real
//! durable store has to provide per patient cycle.

use chrono::NaiveDateTime;
use rustc_hash::FxHashMap;
use std::sync::{Mutex, MutexGuard};

use crate::error::{NephrologError, Result};
use crate::models::action::{ActionStatus, DoctorAction};
use crate::models::alert::{AlertStatus, MonitoringAlert};
use crate::models::diagnosis::{DiagnosisEvent, DiagnosisTrackerState};
use crate::models::health_state::HealthStateRecord;
use crate::models::lab::{LabPanel, Patient};
use crate::models::recommendation::{ActionRecommendation, RecommendationStatus};
use crate::models::transition::StateTransition;
use crate::models::treatment::{ProtocolStatus, TreatmentProtocol};

use super::{ActionFilter, CycleWrite, HealthStore};

#[derive(Debug, Default)]
struct StoreInner {
    patients: FxHashMap<String, Patient>,
    labs: FxHashMap<String, Vec<LabPanel>>,
    records: FxHashMap<String, Vec<HealthStateRecord>>,
    transitions: FxHashMap<String, Vec<StateTransition>>,
    trackers: FxHashMap<String, DiagnosisTrackerState>,
    alerts: FxHashMap<String, MonitoringAlert>,
    recommendations: FxHashMap<String, ActionRecommendation>,
    diagnosis_events: FxHashMap<String, DiagnosisEvent>,
    protocols: FxHashMap<String, TreatmentProtocol>,
    actions: FxHashMap<String, DoctorAction>,
}

/// In-memory implementation of the store contract
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<StoreInner>,
}

impl MemoryStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a patient
    pub fn add_patient(&self, patient: Patient) -> Result<()> {
        let mut inner = self.lock()?;
        inner.patients.insert(patient.id.clone(), patient);
        Ok(())
    }

    /// Record a lab panel, kept in measurement order
    pub fn add_lab(&self, lab: LabPanel) -> Result<()> {
        let mut inner = self.lock()?;
        if !inner.patients.contains_key(&lab.patient_id) {
            return Err(NephrologError::not_found("patient", &lab.patient_id));
        }
        let series = inner.labs.entry(lab.patient_id.clone()).or_default();
        series.push(lab);
        series.sort_by_key(|panel| panel.measured_at);
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, StoreInner>> {
        self.inner
            .lock()
            .map_err(|_| NephrologError::Storage("store mutex poisoned".to_string()))
    }
}

impl HealthStore for MemoryStore {
    fn patient_ids(&self) -> Result<Vec<String>> {
        let inner = self.lock()?;
        let mut ids: Vec<String> = inner.patients.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }

    fn patient(&self, patient_id: &str) -> Result<Patient> {
        let inner = self.lock()?;
        inner
            .patients
            .get(patient_id)
            .cloned()
            .ok_or_else(|| NephrologError::not_found("patient", patient_id))
    }

    fn lab_history(&self, patient_id: &str) -> Result<Vec<LabPanel>> {
        let inner = self.lock()?;
        if !inner.patients.contains_key(patient_id) {
            return Err(NephrologError::not_found("patient", patient_id));
        }
        Ok(inner.labs.get(patient_id).cloned().unwrap_or_default())
    }

    fn records(&self, patient_id: &str) -> Result<Vec<HealthStateRecord>> {
        let inner = self.lock()?;
        Ok(inner.records.get(patient_id).cloned().unwrap_or_default())
    }

    fn transitions(&self, patient_id: &str) -> Result<Vec<StateTransition>> {
        let inner = self.lock()?;
        Ok(inner.transitions.get(patient_id).cloned().unwrap_or_default())
    }

    fn tracker(&self, patient_id: &str) -> Result<Option<DiagnosisTrackerState>> {
        let inner = self.lock()?;
        Ok(inner.trackers.get(patient_id).cloned())
    }

    fn commit_cycle(&self, write: CycleWrite) -> Result<()> {
        // The single lock makes the whole cycle atomic; deterministic ids
        // make re-application a no-op.
        let mut inner = self.lock()?;
        let patient_id = write.record.patient_id.clone();

        let records = inner.records.entry(patient_id.clone()).or_default();
        if !records.iter().any(|r| r.id == write.record.id) {
            records.push(write.record);
            records.sort_by_key(|r| r.measured_at);
        }

        if let Some(transition) = write.transition {
            let transitions = inner.transitions.entry(patient_id.clone()).or_default();
            if !transitions.iter().any(|t| t.id == transition.id) {
                transitions.push(transition);
            }
        }

        for alert in write.alerts {
            inner.alerts.entry(alert.id.clone()).or_insert(alert);
        }
        for recommendation in write.recommendations {
            inner
                .recommendations
                .entry(recommendation.id.clone())
                .or_insert(recommendation);
        }
        if let Some(event) = write.diagnosis_event {
            inner.diagnosis_events.entry(event.id.clone()).or_insert(event);
        }
        if let Some(action) = write.action {
            inner.actions.entry(action.id.clone()).or_insert(action);
        }
        inner.trackers.insert(patient_id, write.tracker);
        Ok(())
    }

    fn insert_alert(&self, alert: MonitoringAlert) -> Result<bool> {
        let mut inner = self.lock()?;
        if inner.alerts.contains_key(&alert.id) {
            return Ok(false);
        }
        inner.alerts.insert(alert.id.clone(), alert);
        Ok(true)
    }

    fn alerts(&self, patient_id: &str) -> Result<Vec<MonitoringAlert>> {
        let inner = self.lock()?;
        let mut alerts: Vec<MonitoringAlert> = inner
            .alerts
            .values()
            .filter(|a| a.patient_id == patient_id)
            .cloned()
            .collect();
        alerts.sort_by_key(|a| (a.priority, a.created_at));
        Ok(alerts)
    }

    fn update_alert_status(&self, alert_id: &str, status: AlertStatus) -> Result<MonitoringAlert> {
        let mut inner = self.lock()?;
        let alert = inner
            .alerts
            .get_mut(alert_id)
            .ok_or_else(|| NephrologError::not_found("alert", alert_id))?;
        alert.transition_status(status)?;
        Ok(alert.clone())
    }

    fn recommendations(&self, patient_id: &str) -> Result<Vec<ActionRecommendation>> {
        let inner = self.lock()?;
        let mut recommendations: Vec<ActionRecommendation> = inner
            .recommendations
            .values()
            .filter(|r| r.patient_id == patient_id)
            .cloned()
            .collect();
        recommendations.sort_by_key(|r| (r.priority, r.created_at));
        Ok(recommendations)
    }

    fn update_recommendation_status(
        &self,
        recommendation_id: &str,
        status: RecommendationStatus,
    ) -> Result<ActionRecommendation> {
        let mut inner = self.lock()?;
        let recommendation = inner
            .recommendations
            .get_mut(recommendation_id)
            .ok_or_else(|| NephrologError::not_found("recommendation", recommendation_id))?;
        recommendation.transition_status(status)?;
        Ok(recommendation.clone())
    }

    fn diagnosis_events(&self, patient_id: &str) -> Result<Vec<DiagnosisEvent>> {
        let inner = self.lock()?;
        let mut events: Vec<DiagnosisEvent> = inner
            .diagnosis_events
            .values()
            .filter(|e| e.patient_id == patient_id)
            .cloned()
            .collect();
        events.sort_by_key(|e| e.first_abnormal_date);
        Ok(events)
    }

    fn diagnosis_event(&self, event_id: &str) -> Result<DiagnosisEvent> {
        let inner = self.lock()?;
        inner
            .diagnosis_events
            .get(event_id)
            .cloned()
            .ok_or_else(|| NephrologError::not_found("diagnosis event", event_id))
    }

    fn set_diagnosis_confirmed(&self, event_id: &str) -> Result<DiagnosisEvent> {
        let mut inner = self.lock()?;
        let event = inner
            .diagnosis_events
            .get_mut(event_id)
            .ok_or_else(|| NephrologError::not_found("diagnosis event", event_id))?;
        event.diagnosis_confirmed = true;
        Ok(event.clone())
    }

    fn enqueue_action(&self, action: DoctorAction) -> Result<()> {
        let mut inner = self.lock()?;
        if let Some(existing) = inner.actions.get(&action.id) {
            return Err(NephrologError::state_conflict(
                "doctor action",
                action.id.clone(),
                "no existing entry for this referent",
                existing.status,
            ));
        }
        inner.actions.insert(action.id.clone(), action);
        Ok(())
    }

    fn action(&self, action_id: &str) -> Result<DoctorAction> {
        let inner = self.lock()?;
        inner
            .actions
            .get(action_id)
            .cloned()
            .ok_or_else(|| NephrologError::not_found("doctor action", action_id))
    }

    fn actions(&self, filter: &ActionFilter) -> Result<Vec<DoctorAction>> {
        let inner = self.lock()?;
        let mut actions: Vec<DoctorAction> = inner
            .actions
            .values()
            .filter(|a| filter.matches(a))
            .cloned()
            .collect();
        actions.sort_by_key(|a| (a.priority, a.created_at));
        Ok(actions)
    }

    fn complete_action(
        &self,
        action_id: &str,
        actor: &str,
        notes: Option<String>,
        approved: bool,
        completed_at: NaiveDateTime,
    ) -> Result<DoctorAction> {
        // Check-and-set under the store lock: of two concurrent attempts,
        // exactly one observes Pending.
        let mut inner = self.lock()?;
        let action = inner
            .actions
            .get_mut(action_id)
            .ok_or_else(|| NephrologError::not_found("doctor action", action_id))?;
        if action.status.is_terminal() {
            return Err(NephrologError::state_conflict(
                "doctor action",
                action_id,
                ActionStatus::Pending,
                action.status,
            ));
        }
        action.status = if approved {
            ActionStatus::Completed
        } else {
            ActionStatus::Declined
        };
        action.completed_by = Some(actor.to_string());
        action.completion_notes = notes;
        action.completed_at = Some(completed_at);
        Ok(action.clone())
    }

    fn insert_protocol(&self, protocol: TreatmentProtocol) -> Result<()> {
        let mut inner = self.lock()?;
        if inner.protocols.contains_key(&protocol.id) {
            return Err(NephrologError::state_conflict(
                "treatment protocol",
                protocol.id.clone(),
                "no existing protocol for this diagnosis",
                "already drafted",
            ));
        }
        inner.protocols.insert(protocol.id.clone(), protocol);
        Ok(())
    }

    fn protocol(&self, protocol_id: &str) -> Result<TreatmentProtocol> {
        let inner = self.lock()?;
        inner
            .protocols
            .get(protocol_id)
            .cloned()
            .ok_or_else(|| NephrologError::not_found("treatment protocol", protocol_id))
    }

    fn protocols(&self, patient_id: &str) -> Result<Vec<TreatmentProtocol>> {
        let inner = self.lock()?;
        let mut protocols: Vec<TreatmentProtocol> = inner
            .protocols
            .values()
            .filter(|p| p.patient_id == patient_id)
            .cloned()
            .collect();
        protocols.sort_by_key(|p| p.created_at);
        Ok(protocols)
    }

    fn update_protocol_status(
        &self,
        protocol_id: &str,
        status: ProtocolStatus,
    ) -> Result<TreatmentProtocol> {
        let mut inner = self.lock()?;
        let protocol = inner
            .protocols
            .get_mut(protocol_id)
            .ok_or_else(|| NephrologError::not_found("treatment protocol", protocol_id))?;
        match status {
            ProtocolStatus::Active => protocol.activate()?,
            ProtocolStatus::Declined => protocol.decline()?,
            other => protocol.status = other,
        }
        Ok(protocol.clone())
    }
}
