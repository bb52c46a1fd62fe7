use anyhow::Context;
use chrono::NaiveDate;
use log::{info, warn};
use std::sync::Arc;

use nephrolog::models::ActionStatus;
use nephrolog::store::ActionFilter;
use nephrolog::{
    DoctorActionQueue, MemoryStore, ProgressionMonitor, ScanConfig, SyntheticGenerator,
    UacrMonitor,
};

fn main() -> anyhow::Result<()> {
    // Setup logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ScanConfig {
        show_progress: true,
        ..ScanConfig::default()
    };
    info!("{config}");

    // Generate a simulated cohort and load it into the in-memory store
    let start = NaiveDate::from_ymd_opt(2024, 1, 1)
        .and_then(|d| d.and_hms_opt(8, 0, 0))
        .context("demo start date")?;
    let cohort = SyntheticGenerator::new(42)
        .generate(200, 12, start)
        .context("generating synthetic cohort")?;

    let store = Arc::new(MemoryStore::new());
    for patient in &cohort.patients {
        store.add_patient(patient.clone())?;
    }
    for lab in &cohort.labs {
        store.add_lab(lab.clone())?;
    }
    info!(
        "loaded {} patients and {} lab panels",
        cohort.patients.len(),
        cohort.labs.len()
    );

    // Baseline, then a full progression scan and an independent uACR scan
    let monitor = ProgressionMonitor::new(store.clone(), config.clone());
    let initialized = monitor
        .initialize_baseline()
        .context("initializing baseline cycle")?;
    info!("baseline cycle created for {initialized} patients");

    let summary = monitor.run_scan().context("running progression scan")?;
    info!(
        "progression scan: {} cycles, {} transitions, {} alerts, {} recommendations, {} diagnoses",
        summary.cycles_processed,
        summary.transitions_recorded,
        summary.alerts_raised,
        summary.recommendations_generated,
        summary.diagnoses_detected
    );

    let uacr_summary = UacrMonitor::new(store.clone(), config.uacr.clone())
        .run_scan()
        .context("running uACR scan")?;
    info!(
        "uACR scan: {} alerts over {} patients",
        uacr_summary.alerts_raised, uacr_summary.patients_evaluated
    );

    // Show the doctor's pending queue
    let queue = DoctorActionQueue::new(store.clone());
    let pending = queue.list(&ActionFilter {
        status: Some(ActionStatus::Pending),
        ..ActionFilter::default()
    })?;
    info!("{} doctor actions pending review", pending.len());
    for action in pending.iter().take(5) {
        info!(
            "  [p{}] {} for patient {} (referent {})",
            action.priority, action.action_type, action.patient_id, action.referent_id
        );
    }

    match serde_json::to_string_pretty(&pending) {
        Ok(json) => println!("{json}"),
        Err(e) => warn!("failed to serialize pending actions: {e}"),
    }

    Ok(())
}
