#[cfg(test)]
mod tests {
    use chrono::{Duration, NaiveDate, NaiveDateTime};
    use std::sync::Arc;
    use std::sync::atomic::AtomicBool;

    use nephrolog::models::{ActionType, AlertSeverity, ChangeType, LabPanel, Patient};
    use nephrolog::store::ActionFilter;
    use nephrolog::{
        CkdStage, HealthStore, MemoryStore, ProgressionMonitor, RiskLevel, ScanConfig,
    };

    fn day(offset: i64) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap()
            + Duration::days(offset)
    }

    fn test_config() -> ScanConfig {
        ScanConfig {
            worker_threads: 2,
            show_progress: false,
            ..ScanConfig::default()
        }
    }

    fn store_with(labs: &[(&str, i64, f64, Option<f64>)]) -> Arc<MemoryStore> {
        let store = Arc::new(MemoryStore::new());
        for (patient, _, _, _) in labs {
            let _ = store.add_patient(
                Patient::new(*patient)
                    .with_condition("diabetes")
                    .with_condition("hypertension"),
            );
        }
        for (patient, offset, egfr, uacr) in labs {
            store
                .add_lab(LabPanel::new(*patient, day(*offset), *egfr, *uacr).unwrap())
                .unwrap();
        }
        store
    }

    #[test]
    fn test_baseline_creates_cycle_zero_only() {
        let store = store_with(&[("p1", 0, 55.0, Some(20.0))]);
        let monitor = ProgressionMonitor::new(store.clone(), test_config());

        assert_eq!(monitor.initialize_baseline().unwrap(), 1);
        let records = store.records("p1").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].cycle, 0);
        assert!(store.transitions("p1").unwrap().is_empty());

        // Second call finds the history initialized and does nothing
        assert_eq!(monitor.initialize_baseline().unwrap(), 0);
    }

    #[test]
    fn test_progression_scenario_over_twelve_months() {
        // eGFR 55 -> 48 -> 42 with diabetes and hypertension present
        let store = store_with(&[
            ("p1", 0, 55.0, None),
            ("p1", 180, 48.0, None),
            ("p1", 360, 42.0, None),
        ]);
        let monitor = ProgressionMonitor::new(store.clone(), test_config());
        let summary = monitor.run_scan().unwrap();

        assert_eq!(summary.patients_processed, 1);
        assert_eq!(summary.cycles_processed, 3);

        let records = store.records("p1").unwrap();
        assert_eq!(records.len(), 3);
        let final_assessment = records[2].assessment;
        assert_eq!(final_assessment.stage, CkdStage::Stage3b);
        assert_eq!(final_assessment.risk_level, RiskLevel::High);

        // 55 -> 48 stays within G3a (stable, not recorded); 48 -> 42 worsens
        let transitions = store.transitions("p1").unwrap();
        assert_eq!(transitions.len(), 1);
        let transition = &transitions[0];
        assert_eq!(transition.change_type, ChangeType::Worsened);
        assert!(!transition.crossed_critical_threshold);

        // One-tier risk increase fires a warning alert
        let alerts = store.alerts("p1").unwrap();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].severity, AlertSeverity::Warning);

        let recommendations = store.recommendations("p1").unwrap();
        assert!(!recommendations.is_empty());
    }

    #[test]
    fn test_scan_is_idempotent_over_unchanged_data() {
        let store = store_with(&[
            ("p1", 0, 55.0, None),
            ("p1", 180, 48.0, None),
            ("p1", 360, 42.0, None),
            ("p2", 0, 95.0, Some(10.0)),
        ]);
        let monitor = ProgressionMonitor::new(store.clone(), test_config());
        monitor.run_scan().unwrap();

        let transitions_before = store.transitions("p1").unwrap().len();
        let alerts_before = store.alerts("p1").unwrap().len();
        let recommendations_before = store.recommendations("p1").unwrap().len();

        let second = monitor.run_scan().unwrap();
        assert_eq!(second.cycles_processed, 0);
        assert_eq!(second.transitions_recorded, 0);
        assert_eq!(second.alerts_raised, 0);

        assert_eq!(store.transitions("p1").unwrap().len(), transitions_before);
        assert_eq!(store.alerts("p1").unwrap().len(), alerts_before);
        assert_eq!(
            store.recommendations("p1").unwrap().len(),
            recommendations_before
        );
    }

    #[test]
    fn test_scan_picks_up_labs_added_after_baseline() {
        let store = store_with(&[("p1", 0, 55.0, None)]);
        let monitor = ProgressionMonitor::new(store.clone(), test_config());
        monitor.initialize_baseline().unwrap();

        store
            .add_lab(LabPanel::new("p1", day(180), 40.0, None).unwrap())
            .unwrap();
        let summary = monitor.run_scan().unwrap();
        assert_eq!(summary.cycles_processed, 1);
        assert_eq!(summary.transitions_recorded, 1);

        // 55 -> 40 is a 27% decline: rapid progressor
        let transition = &store.transitions("p1").unwrap()[0];
        assert!(transition.crossed_critical_threshold);
        assert!(transition.egfr_relative_change <= -0.25);
    }

    #[test]
    fn test_diagnosis_confirmation_through_the_scan() {
        // Abnormal day 0, confirmatory day 95: diagnosis + queued action
        let store = store_with(&[("p1", 0, 55.0, None), ("p1", 95, 52.0, None)]);
        let monitor = ProgressionMonitor::new(store.clone(), test_config());
        let summary = monitor.run_scan().unwrap();
        assert_eq!(summary.diagnoses_detected, 1);

        let events = store.diagnosis_events("p1").unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].stage, CkdStage::Stage3a);
        assert!(!events[0].diagnosis_confirmed);

        let actions = store
            .actions(&ActionFilter {
                action_type: Some(ActionType::ConfirmDiagnosis),
                ..ActionFilter::default()
            })
            .unwrap();
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].referent_id, events[0].id);
    }

    #[test]
    fn test_late_confirmatory_result_does_not_diagnose() {
        // Day 130 is outside the window: no event, fresh pending period
        let store = store_with(&[("p1", 0, 55.0, None), ("p1", 130, 52.0, None)]);
        let monitor = ProgressionMonitor::new(store.clone(), test_config());
        let summary = monitor.run_scan().unwrap();
        assert_eq!(summary.diagnoses_detected, 0);
        assert!(store.diagnosis_events("p1").unwrap().is_empty());
    }

    #[test]
    fn test_cancelled_scan_enqueues_nothing() {
        let store = store_with(&[("p1", 0, 55.0, None), ("p2", 0, 62.0, None)]);
        let monitor = ProgressionMonitor::new(store.clone(), test_config());

        let cancel = AtomicBool::new(true);
        let summary = monitor.run_scan_cancellable(&cancel).unwrap();
        assert_eq!(summary.patients_cancelled, 2);
        assert_eq!(summary.cycles_processed, 0);
        assert!(store.records("p1").unwrap().is_empty());
    }

    #[test]
    fn test_patients_without_new_labs_are_untouched() {
        let store = store_with(&[("p1", 0, 95.0, Some(5.0))]);
        let monitor = ProgressionMonitor::new(store.clone(), test_config());
        monitor.run_scan().unwrap();

        // Healthy stable patient: one record, nothing else
        assert_eq!(store.records("p1").unwrap().len(), 1);
        assert!(store.transitions("p1").unwrap().is_empty());
        assert!(store.alerts("p1").unwrap().is_empty());
        assert!(store.recommendations("p1").unwrap().is_empty());
        assert!(store.diagnosis_events("p1").unwrap().is_empty());
    }
}
