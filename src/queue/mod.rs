//! Doctor action queue
//!
//! Human-confirmation tasks gating automated clinical decisions. Completion
//! is the only cross-request mutation in the core and is guarded by a
//! check-and-set on action status: of two concurrent attempts, exactly one
//! succeeds and the other fails with a state conflict.

use chrono::NaiveDateTime;
use itertools::Itertools;
use log::info;
use std::sync::Arc;

use crate::algorithm::kdigo::CkdStage;
use crate::algorithm::treatment::TreatmentProtocolBuilder;
use crate::error::Result;
use crate::models::action::{ActionType, DoctorAction};
use crate::models::treatment::{ProtocolStatus, TreatmentProtocol};
use crate::store::{ActionFilter, HealthStore};

/// What a completed action changed downstream
#[derive(Debug, Clone)]
pub struct CompletionOutcome {
    /// The action in its terminal state
    pub action: DoctorAction,
    /// Protocol drafted (diagnosis confirmed) or updated (treatment decided)
    pub protocol: Option<TreatmentProtocol>,
}

/// Queue of pending human-confirmation tasks
pub struct DoctorActionQueue {
    store: Arc<dyn HealthStore>,
}

impl DoctorActionQueue {
    /// Create a queue over a store
    #[must_use]
    pub fn new(store: Arc<dyn HealthStore>) -> Self {
        Self { store }
    }

    /// Add a pending action
    ///
    /// At most one active action may exist per (patient, action type,
    /// referent); a duplicate is rejected with a state conflict.
    pub fn enqueue(&self, action: DoctorAction) -> Result<()> {
        self.store.enqueue_action(action)
    }

    /// List actions passing a filter, most urgent first, oldest first within
    /// a priority
    pub fn list(&self, filter: &ActionFilter) -> Result<Vec<DoctorAction>> {
        Ok(self
            .store
            .actions(filter)?
            .into_iter()
            .sorted_by_key(|a| (a.priority, a.created_at, a.id.clone()))
            .collect())
    }

    /// Complete a pending action exactly once
    ///
    /// Approving a diagnosis confirmation marks the diagnosis confirmed,
    /// drafts the treatment protocol, and queues the treatment-approval
    /// action; approving a treatment action activates the protocol.
    /// Declining leaves the gated decision unapplied. A second completion
    /// attempt fails with a state conflict.
    pub fn complete(
        &self,
        action_id: &str,
        actor: &str,
        notes: Option<String>,
        approved: bool,
        completed_at: NaiveDateTime,
    ) -> Result<CompletionOutcome> {
        let action = self
            .store
            .complete_action(action_id, actor, notes, approved, completed_at)?;
        info!(
            "action {action_id} ({}) {} by {actor}",
            action.action_type,
            if approved { "approved" } else { "declined" }
        );

        let protocol = match action.action_type {
            ActionType::ConfirmDiagnosis => {
                if approved {
                    Some(self.apply_confirmed_diagnosis(&action, completed_at)?)
                } else {
                    None
                }
            }
            ActionType::ApproveTreatment => {
                let status = if approved {
                    ProtocolStatus::Active
                } else {
                    ProtocolStatus::Declined
                };
                Some(self.store.update_protocol_status(&action.referent_id, status)?)
            }
        };

        Ok(CompletionOutcome { action, protocol })
    }

    /// Confirmed diagnosis: draft the protocol and gate it behind its own
    /// approval action
    fn apply_confirmed_diagnosis(
        &self,
        action: &DoctorAction,
        completed_at: NaiveDateTime,
    ) -> Result<TreatmentProtocol> {
        let event = self.store.set_diagnosis_confirmed(&action.referent_id)?;
        let patient = self.store.patient(&action.patient_id)?;

        let protocol = TreatmentProtocolBuilder::for_event(&event, completed_at)?
            .with_patient(&patient)
            .build();
        self.store.insert_protocol(protocol.clone())?;

        let priority = if event.stage >= CkdStage::Stage4 { 1 } else { 2 };
        self.enqueue(DoctorAction::new(
            &event.patient_id,
            ActionType::ApproveTreatment,
            &protocol.id,
            priority,
            completed_at,
        ))?;
        info!(
            "diagnosis {} confirmed; protocol {} drafted and queued for approval",
            event.id, protocol.id
        );
        Ok(protocol)
    }
}
