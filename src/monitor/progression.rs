//! Population progression scan
//!
//! Orchestrates the per-patient monitoring cycle: classify the newest labs,
//! detect the transition against the previous state, persist atomically,
//! and fan out to alerting, recommendations, and the diagnosis protocol.
//! Patients are independent work units over a bounded worker pool; a failed
//! unit is logged and skipped, never aborting the rest of the batch.

use log::{info, warn};
use rayon::prelude::*;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::algorithm::diagnosis::DiagnosisDetector;
use crate::algorithm::kdigo;
use crate::algorithm::transition::TransitionDetector;
use crate::config::ScanConfig;
use crate::error::{NephrologError, Result};
use crate::models::action::{ActionType, DoctorAction};
use crate::models::diagnosis::{DiagnosisPhase, DiagnosisTrackerState};
use crate::models::health_state::HealthStateRecord;
use crate::models::lab::LabPanel;
use crate::monitor::alerts::AlertEngine;
use crate::monitor::recommend::RecommendationEngine;
use crate::store::{CycleWrite, HealthStore};
use crate::utils::progress;

/// Counts from one population scan
#[derive(Debug, Clone, Default)]
pub struct ScanSummary {
    /// Patients whose unit ran to completion
    pub patients_processed: usize,
    /// Cycles (new records) created
    pub cycles_processed: usize,
    /// Non-stable transitions recorded
    pub transitions_recorded: usize,
    /// Alerts raised
    pub alerts_raised: usize,
    /// Recommendations generated
    pub recommendations_generated: usize,
    /// Diagnosis events emitted
    pub diagnoses_detected: usize,
    /// Patients whose unit failed persistently and was skipped
    pub patients_skipped: Vec<String>,
    /// Patients not started because the scan was cancelled
    pub patients_cancelled: usize,
}

/// Per-patient counts folded into the scan summary
#[derive(Debug, Clone, Copy, Default)]
struct UnitOutcome {
    cycles: usize,
    transitions: usize,
    alerts: usize,
    recommendations: usize,
    diagnoses: usize,
}

/// The live progression scan
pub struct ProgressionMonitor {
    store: Arc<dyn HealthStore>,
    config: ScanConfig,
    transition_detector: TransitionDetector,
    diagnosis_detector: DiagnosisDetector,
    alert_engine: AlertEngine,
    recommendation_engine: RecommendationEngine,
}

impl ProgressionMonitor {
    /// Create a monitor over a store
    #[must_use]
    pub fn new(store: Arc<dyn HealthStore>, config: ScanConfig) -> Self {
        let transition_detector = TransitionDetector::new(config.rapid_decline_fraction);
        let diagnosis_detector = DiagnosisDetector::new(config.confirmation.clone());
        let alert_engine = AlertEngine::new(config.rapid_decline_fraction);
        Self {
            store,
            config,
            transition_detector,
            diagnosis_detector,
            alert_engine,
            recommendation_engine: RecommendationEngine,
        }
    }

    /// Create cycle zero for every patient with labs but no processed history
    ///
    /// Classifies the most recent panel only; no transitions, alerts, or
    /// recommendations are produced at baseline. The diagnosis protocol does
    /// observe the baseline result, so an abnormal baseline opens a pending
    /// period.
    pub fn initialize_baseline(&self) -> Result<usize> {
        let mut initialized = 0;
        for patient_id in self.store.patient_ids()? {
            if !self.store.records(&patient_id)?.is_empty() {
                continue;
            }
            let labs = self.store.lab_history(&patient_id)?;
            let Some(lab) = labs.last() else { continue };

            let assessment = kdigo::classify(lab.egfr, lab.uacr);
            let record = HealthStateRecord::new(
                &patient_id,
                lab.measured_at,
                lab.egfr,
                lab.uacr,
                assessment,
                0,
            );
            let step = self.diagnosis_detector.observe(&DiagnosisPhase::Normal, lab);
            let mut write = CycleWrite::new(
                record,
                DiagnosisTrackerState {
                    patient_id: patient_id.clone(),
                    phase: step.phase,
                    updated_at: lab.measured_at,
                },
            );
            // A baseline cannot confirm a diagnosis; only the pending phase
            // carries over.
            debug_assert!(step.event.is_none());
            write.diagnosis_event = step.event;
            self.store.commit_cycle(write)?;
            initialized += 1;
        }
        info!("baseline initialized for {initialized} patients");
        Ok(initialized)
    }

    /// Run a full population scan
    pub fn run_scan(&self) -> Result<ScanSummary> {
        self.run_scan_cancellable(&AtomicBool::new(false))
    }

    /// Run a population scan that stops enqueuing patients once `cancel` is
    /// set; in-flight patient units always run to completion
    pub fn run_scan_cancellable(&self, cancel: &AtomicBool) -> Result<ScanSummary> {
        let patient_ids = self.store.patient_ids()?;
        info!(
            "progression scan over {} patients with {} workers",
            patient_ids.len(),
            self.config.worker_threads
        );

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.worker_threads)
            .build()
            .map_err(|e| NephrologError::Storage(format!("worker pool: {e}")))?;

        let bar = self.config.show_progress.then(|| {
            progress::create_main_progress_bar(patient_ids.len() as u64, Some("Scanning cohort"))
        });

        let results: Vec<(String, Option<Result<UnitOutcome>>)> = pool.install(|| {
            patient_ids
                .par_iter()
                .map(|patient_id| {
                    if cancel.load(Ordering::Relaxed) {
                        return (patient_id.clone(), None);
                    }
                    let outcome = self.process_patient_with_retries(patient_id);
                    if let Some(bar) = &bar {
                        bar.inc(1);
                    }
                    (patient_id.clone(), Some(outcome))
                })
                .collect()
        });
        if let Some(bar) = &bar {
            progress::finish_progress_bar(bar, Some("Scan complete"));
        }

        let mut summary = ScanSummary::default();
        for (patient_id, result) in results {
            match result {
                None => summary.patients_cancelled += 1,
                Some(Ok(outcome)) => {
                    summary.patients_processed += 1;
                    summary.cycles_processed += outcome.cycles;
                    summary.transitions_recorded += outcome.transitions;
                    summary.alerts_raised += outcome.alerts;
                    summary.recommendations_generated += outcome.recommendations;
                    summary.diagnoses_detected += outcome.diagnoses;
                }
                Some(Err(err)) => {
                    warn!("scan: skipping patient {patient_id}: {err}");
                    summary.patients_skipped.push(patient_id);
                }
            }
        }
        info!(
            "scan done: {} patients, {} cycles, {} transitions, {} alerts, {} recommendations, {} diagnoses, {} skipped",
            summary.patients_processed,
            summary.cycles_processed,
            summary.transitions_recorded,
            summary.alerts_raised,
            summary.recommendations_generated,
            summary.diagnoses_detected,
            summary.patients_skipped.len()
        );
        Ok(summary)
    }

    /// Retry transient storage failures at per-patient granularity
    fn process_patient_with_retries(&self, patient_id: &str) -> Result<UnitOutcome> {
        let mut attempt = 0;
        loop {
            match self.process_patient(patient_id) {
                Err(err) if err.is_transient() && attempt < self.config.transient_retries => {
                    attempt += 1;
                    warn!("patient {patient_id}: transient failure (attempt {attempt}): {err}");
                }
                other => return other,
            }
        }
    }

    /// One patient's idempotent unit of work
    ///
    /// Every lab newer than the last processed record becomes one cycle:
    /// classify, detect the transition, derive alerts/recommendations, step
    /// the diagnosis protocol, and commit the lot atomically. Unchanged data
    /// yields no cycles, so re-running is free of duplicates.
    fn process_patient(&self, patient_id: &str) -> Result<UnitOutcome> {
        let labs = self.store.lab_history(patient_id)?;
        let records = self.store.records(patient_id)?;
        let mut previous = records.last().cloned();
        let mut phase = self
            .store
            .tracker(patient_id)?
            .map_or(DiagnosisPhase::Normal, |t| t.phase);

        let mut outcome = UnitOutcome::default();
        for lab in labs {
            if previous
                .as_ref()
                .is_some_and(|record| lab.measured_at <= record.measured_at)
            {
                continue;
            }
            let (write, next_phase, unit) = self.build_cycle(patient_id, &lab, previous.as_ref(), &phase)?;
            previous = Some(write.record.clone());
            phase = next_phase;
            self.store.commit_cycle(write)?;

            outcome.cycles += 1;
            outcome.transitions += unit.transitions;
            outcome.alerts += unit.alerts;
            outcome.recommendations += unit.recommendations;
            outcome.diagnoses += unit.diagnoses;
        }
        Ok(outcome)
    }

    /// Assemble the atomic write set for one cycle
    fn build_cycle(
        &self,
        patient_id: &str,
        lab: &LabPanel,
        previous: Option<&HealthStateRecord>,
        phase: &DiagnosisPhase,
    ) -> Result<(CycleWrite, DiagnosisPhase, UnitOutcome)> {
        let mut unit = UnitOutcome::default();
        let assessment = kdigo::classify(lab.egfr, lab.uacr);
        let cycle = previous.map_or(0, |record| record.cycle + 1);
        let record = HealthStateRecord::new(
            patient_id,
            lab.measured_at,
            lab.egfr,
            lab.uacr,
            assessment,
            cycle,
        );

        // Expire a lapsed confirmation window before feeding the new result.
        let phase = self
            .diagnosis_detector
            .check_lapse(phase, lab.measured_at.date());
        let step = self.diagnosis_detector.observe(&phase, lab);

        let mut write = CycleWrite::new(
            record.clone(),
            DiagnosisTrackerState {
                patient_id: patient_id.to_string(),
                phase: step.phase.clone(),
                updated_at: lab.measured_at,
            },
        );

        if let Some(previous) = previous {
            if let Some(transition) = self.transition_detector.detect(previous, &record)? {
                if let Some(alert) = self.alert_engine.evaluate(previous, &record, &transition) {
                    unit.alerts += 1;
                    write.alerts.push(alert);
                }
                let recommendations = self.recommendation_engine.evaluate(&record, &transition);
                unit.recommendations += recommendations.len();
                write.recommendations.extend(recommendations);
                unit.transitions += 1;
                write.transition = Some(transition);
            }
        }

        if let Some(event) = step.event {
            write.action = Some(DoctorAction::new(
                patient_id,
                ActionType::ConfirmDiagnosis,
                &event.id,
                event.stage.severity_priority(),
                lab.measured_at,
            ));
            write.diagnosis_event = Some(event);
            unit.diagnoses += 1;
        }

        Ok((write, step.phase, unit))
    }
}
