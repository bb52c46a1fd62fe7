//! CKD diagnosis confirmation protocol
//!
//! This module implements the per-patient two-result confirmation state
//! machine: a first abnormal result opens a pending period, a second
//! abnormal result inside the 90±14-day window produces a diagnosis event,
//! and anything that breaks persistence of the abnormality resets the
//! machine to normal. Doctor confirmation happens elsewhere; the detector
//! only ever emits unconfirmed events.

use chrono::NaiveDate;
use log::debug;

use crate::algorithm::kdigo;
use crate::config::ConfirmationConfig;
use crate::models::diagnosis::{DetectionTrigger, DiagnosisEvent, DiagnosisPhase};
use crate::models::lab::LabPanel;

/// Outcome of feeding one lab result to the state machine
#[derive(Debug, Clone)]
pub struct StepOutcome {
    /// State-machine position after the result
    pub phase: DiagnosisPhase,
    /// Diagnosis event, emitted only on the confirming step
    pub event: Option<DiagnosisEvent>,
}

/// Per-patient confirmation state machine
#[derive(Debug, Clone, Default)]
pub struct DiagnosisDetector {
    config: ConfirmationConfig,
}

impl DiagnosisDetector {
    /// Create a detector with the given protocol settings
    #[must_use]
    pub const fn new(config: ConfirmationConfig) -> Self {
        Self { config }
    }

    /// Classify a panel's abnormality, if any
    #[must_use]
    pub fn abnormality(&self, lab: &LabPanel) -> Option<DetectionTrigger> {
        let low_egfr = lab.egfr < self.config.abnormal_egfr_below;
        let elevated_uacr = lab
            .uacr
            .is_some_and(|value| value > self.config.abnormal_uacr_above);
        match (low_egfr, elevated_uacr) {
            (true, true) => Some(DetectionTrigger::Both),
            (true, false) => Some(DetectionTrigger::LowEgfr),
            (false, true) => Some(DetectionTrigger::ElevatedUacr),
            (false, false) => None,
        }
    }

    /// Feed one lab result to the machine
    pub fn observe(&self, phase: &DiagnosisPhase, lab: &LabPanel) -> StepOutcome {
        let result_date = lab.measured_at.date();
        let abnormality = self.abnormality(lab);

        match phase {
            DiagnosisPhase::Normal => match abnormality {
                Some(trigger) => {
                    debug!(
                        "patient {}: first abnormal result ({trigger}) on {result_date}",
                        lab.patient_id
                    );
                    StepOutcome {
                        phase: Self::open_pending(result_date, lab, trigger),
                        event: None,
                    }
                }
                None => StepOutcome {
                    phase: DiagnosisPhase::Normal,
                    event: None,
                },
            },

            DiagnosisPhase::AbnormalPending {
                first_date,
                first_egfr,
                first_uacr,
                trigger,
            }
            | DiagnosisPhase::ConfirmationDue {
                first_date,
                first_egfr,
                first_uacr,
                trigger,
            } => self.observe_pending(
                lab,
                result_date,
                *first_date,
                *first_egfr,
                *first_uacr,
                *trigger,
                abnormality,
            ),

            // A confirmed diagnosis is owned by the doctor-action flow;
            // further results do not move the machine.
            DiagnosisPhase::Confirmed { event_id } => StepOutcome {
                phase: DiagnosisPhase::Confirmed {
                    event_id: event_id.clone(),
                },
                event: None,
            },
        }
    }

    /// Reset a pending period whose window has already closed
    ///
    /// Used by scans to expire trackers between results: once the window
    /// lapses with no qualifying result the patient returns to normal.
    #[must_use]
    pub fn check_lapse(&self, phase: &DiagnosisPhase, as_of: NaiveDate) -> DiagnosisPhase {
        match phase {
            DiagnosisPhase::AbnormalPending { first_date, .. }
            | DiagnosisPhase::ConfirmationDue { first_date, .. }
                if (as_of - *first_date).num_days() > self.config.window_close() =>
            {
                DiagnosisPhase::Normal
            }
            other => other.clone(),
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn observe_pending(
        &self,
        lab: &LabPanel,
        result_date: NaiveDate,
        first_date: NaiveDate,
        first_egfr: f64,
        first_uacr: Option<f64>,
        trigger: DetectionTrigger,
        abnormality: Option<DetectionTrigger>,
    ) -> StepOutcome {
        let Some(new_trigger) = abnormality else {
            // Persistence of the abnormality is broken; no false-positive
            // diagnosis from a single outlier.
            debug!(
                "patient {}: normal result on {result_date} resets pending period from {first_date}",
                lab.patient_id
            );
            return StepOutcome {
                phase: DiagnosisPhase::Normal,
                event: None,
            };
        };

        let days_since_first = (result_date - first_date).num_days();

        if days_since_first < self.config.window_open() {
            // Window not open yet; the earlier abnormal result stands.
            StepOutcome {
                phase: DiagnosisPhase::ConfirmationDue {
                    first_date,
                    first_egfr,
                    first_uacr,
                    trigger,
                },
                event: None,
            }
        } else if days_since_first <= self.config.window_close() {
            let assessment = kdigo::classify(lab.egfr, lab.uacr);
            let event = DiagnosisEvent {
                id: DiagnosisEvent::event_id(&lab.patient_id, first_date),
                patient_id: lab.patient_id.clone(),
                egfr_at_diagnosis: lab.egfr,
                uacr_at_diagnosis: lab.uacr,
                stage: assessment.stage,
                trigger,
                first_abnormal_date: first_date,
                confirmatory_date: result_date,
                diagnosis_confirmed: false,
            };
            debug!(
                "patient {}: confirmatory result on day {days_since_first} produces {} ({})",
                lab.patient_id, event.id, event.stage
            );
            StepOutcome {
                phase: DiagnosisPhase::Confirmed {
                    event_id: event.id.clone(),
                },
                event: Some(event),
            }
        } else {
            // Window lapsed; this abnormal result opens a fresh pending
            // period instead of being lost.
            debug!(
                "patient {}: result on day {days_since_first} is past the window, restarting pending period",
                lab.patient_id
            );
            StepOutcome {
                phase: Self::open_pending(result_date, lab, new_trigger),
                event: None,
            }
        }
    }

    /// Record a first abnormal result; the confirmatory clock starts as soon
    /// as the entry is recorded
    fn open_pending(
        result_date: NaiveDate,
        lab: &LabPanel,
        trigger: DetectionTrigger,
    ) -> DiagnosisPhase {
        let pending = DiagnosisPhase::AbnormalPending {
            first_date: result_date,
            first_egfr: lab.egfr,
            first_uacr: lab.uacr,
            trigger,
        };
        Self::advance(pending)
    }

    /// The automatic AbnormalPending → ConfirmationDue step
    fn advance(phase: DiagnosisPhase) -> DiagnosisPhase {
        match phase {
            DiagnosisPhase::AbnormalPending {
                first_date,
                first_egfr,
                first_uacr,
                trigger,
            } => DiagnosisPhase::ConfirmationDue {
                first_date,
                first_egfr,
                first_uacr,
                trigger,
            },
            other => other,
        }
    }
}
