//! Synthetic cohort generation
//!
//! Produces simulated progression data for demonstrations and tests. This
//! path shares the classifier with live monitoring and nothing else: it
//! returns plain patients and lab panels, has no store access, and cannot
//! reach the alerting or diagnosis pipeline.

use chrono::{Duration, NaiveDateTime};
use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rustc_hash::FxHashMap;

use crate::algorithm::kdigo;
use crate::error::Result;
use crate::models::lab::{LabPanel, Patient};

/// Upper bound on generated cycles per patient
pub const MAX_CYCLES: u32 = 24;

/// Days between generated cycles
const CYCLE_INTERVAL_DAYS: i64 = 30;

/// A generated population with its lab series
#[derive(Debug, Clone)]
pub struct SyntheticCohort {
    /// Generated patients
    pub patients: Vec<Patient>,
    /// Generated lab panels, in measurement order per patient
    pub labs: Vec<LabPanel>,
}

/// Seeded generator for simulated CKD progression
#[derive(Debug, Clone)]
pub struct SyntheticGenerator {
    seed: u64,
}

impl SyntheticGenerator {
    /// Create a generator; the same seed reproduces the same cohort
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Generate a cohort of `patient_count` patients with `cycles` monthly
    /// lab panels each
    ///
    /// The cycle count is clamped to [1, `MAX_CYCLES`]; generation is
    /// bounded by construction and never open-ended.
    pub fn generate(
        &self,
        patient_count: usize,
        cycles: u32,
        start: NaiveDateTime,
    ) -> Result<SyntheticCohort> {
        let cycles = cycles.clamp(1, MAX_CYCLES);
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut patients = Vec::with_capacity(patient_count);
        let mut labs = Vec::with_capacity(patient_count * cycles as usize);

        for index in 0..patient_count {
            let patient_id = format!("sim-{index:04}");
            let mut patient = Patient::new(&patient_id);
            if rng.random_bool(0.4) {
                patient = patient.with_condition("diabetes");
            }
            if rng.random_bool(0.5) {
                patient = patient.with_condition("hypertension");
            }

            let mut egfr: f64 = rng.random_range(35.0..110.0);
            let mut uacr: f64 = rng.random_range(5.0..80.0);
            let decline: f64 = rng.random_range(0.90..1.0);
            let uacr_drift: f64 = rng.random_range(1.0..1.15);

            for cycle in 0..cycles {
                let measured_at = start + Duration::days(CYCLE_INTERVAL_DAYS * i64::from(cycle));
                let with_uacr = rng.random_bool(0.8);
                labs.push(LabPanel::new(
                    &patient_id,
                    measured_at,
                    egfr,
                    with_uacr.then_some(uacr),
                )?);
                egfr = (egfr * decline).max(5.0);
                uacr = (uacr * uacr_drift).min(1200.0);
            }
            patients.push(patient);
        }

        self.log_distribution(&labs);
        Ok(SyntheticCohort { patients, labs })
    }

    /// Summarize the generated end states through the shared classifier
    fn log_distribution(&self, labs: &[LabPanel]) {
        let mut latest: FxHashMap<&str, &LabPanel> = FxHashMap::default();
        for lab in labs {
            latest.insert(lab.patient_id.as_str(), lab);
        }
        let mut by_stage: FxHashMap<&'static str, usize> = FxHashMap::default();
        for lab in latest.values() {
            let assessment = kdigo::classify(lab.egfr, lab.uacr);
            *by_stage.entry(assessment.stage.display_name()).or_insert(0) += 1;
        }
        let mut stages: Vec<_> = by_stage.into_iter().collect();
        stages.sort();
        for (stage, count) in stages {
            info!("synthetic cohort (seed {}): {count} x {stage}", self.seed);
        }
    }
}
