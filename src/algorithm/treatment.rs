//! Treatment protocol drafting
//!
//! Builds a stage-appropriate draft protocol from a confirmed diagnosis.
//! Unreachable until the diagnosis is doctor-confirmed.

use chrono::NaiveDateTime;

use crate::algorithm::kdigo::{AlbuminuriaCategory, CkdStage};
use crate::error::{NephrologError, Result};
use crate::models::diagnosis::DiagnosisEvent;
use crate::models::lab::Patient;
use crate::models::treatment::{
    LabCheck, MedicationOrder, ProtocolStatus, Referral, TreatmentProtocol,
};

/// Builder assembling a draft treatment protocol step by step
#[derive(Debug)]
pub struct TreatmentProtocolBuilder<'a> {
    event: &'a DiagnosisEvent,
    patient: Option<&'a Patient>,
    created_at: NaiveDateTime,
}

impl<'a> TreatmentProtocolBuilder<'a> {
    /// Start a draft for a confirmed diagnosis
    ///
    /// Fails with a state conflict when the diagnosis has not been
    /// doctor-confirmed; treatment drafting is never reachable before that.
    pub fn for_event(event: &'a DiagnosisEvent, created_at: NaiveDateTime) -> Result<Self> {
        if !event.diagnosis_confirmed {
            return Err(NephrologError::state_conflict(
                "diagnosis event",
                event.id.clone(),
                "diagnosis_confirmed",
                "unconfirmed",
            ));
        }
        Ok(Self {
            event,
            patient: None,
            created_at,
        })
    }

    /// Attach patient context so comorbidities shape the draft
    #[must_use]
    pub fn with_patient(mut self, patient: &'a Patient) -> Self {
        self.patient = Some(patient);
        self
    }

    /// Build the draft protocol
    #[must_use]
    pub fn build(self) -> TreatmentProtocol {
        let event = self.event;
        let stage = event.stage;
        let albuminuria = AlbuminuriaCategory::from_uacr(event.uacr_at_diagnosis);

        let mut medications = Vec::new();
        let mut referrals = Vec::new();

        if albuminuria.severity_rank().unwrap_or(1) >= 2 {
            medications.push(MedicationOrder {
                drug_class: "ACE inhibitor or ARB".to_string(),
                instruction: "Start at low dose, titrate to maximally tolerated".to_string(),
            });
        }
        if stage >= CkdStage::Stage3a {
            medications.push(MedicationOrder {
                drug_class: "SGLT2 inhibitor".to_string(),
                instruction: "Initiate unless contraindicated".to_string(),
            });
        }
        if stage >= CkdStage::Stage3b {
            medications.push(MedicationOrder {
                drug_class: "Statin".to_string(),
                instruction: "Review lipid management".to_string(),
            });
        }
        if self.patient.is_some_and(|p| p.has_condition("diabetes")) {
            medications.push(MedicationOrder {
                drug_class: "Glycemic control review".to_string(),
                instruction: "Reassess agents for renal dosing".to_string(),
            });
        }

        if stage >= CkdStage::Stage4 {
            referrals.push(Referral {
                specialty: "Nephrology".to_string(),
                reason: format!("{stage} at diagnosis"),
                urgent: true,
            });
        } else if albuminuria == AlbuminuriaCategory::A3 {
            referrals.push(Referral {
                specialty: "Nephrology".to_string(),
                reason: "Severely increased albuminuria".to_string(),
                urgent: false,
            });
        }

        TreatmentProtocol {
            id: TreatmentProtocol::protocol_id(&event.id),
            patient_id: event.patient_id.clone(),
            diagnosis_event_id: event.id.clone(),
            name: format!("{stage} management protocol"),
            medications,
            monitoring: Self::monitoring_schedule(stage),
            referrals,
            status: ProtocolStatus::Pending,
            created_at: self.created_at,
        }
    }

    /// Re-test intervals tighten with stage
    fn monitoring_schedule(stage: CkdStage) -> Vec<LabCheck> {
        let interval_days = match stage {
            CkdStage::Stage1 | CkdStage::Stage2 => 365,
            CkdStage::Stage3a => 180,
            CkdStage::Stage3b => 90,
            CkdStage::Stage4 | CkdStage::Stage5 => 45,
        };
        vec![
            LabCheck {
                test: "eGFR".to_string(),
                interval_days,
            },
            LabCheck {
                test: "uACR".to_string(),
                interval_days,
            },
            LabCheck {
                test: "Serum potassium".to_string(),
                interval_days,
            },
        ]
    }
}
