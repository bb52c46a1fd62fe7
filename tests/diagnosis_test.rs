#[cfg(test)]
mod tests {
    use chrono::{Duration, NaiveDate, NaiveDateTime};
    use nephrolog::models::{DiagnosisPhase, LabPanel};
    use nephrolog::{CkdStage, DiagnosisDetector};

    fn day(offset: i64) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap()
            + Duration::days(offset)
    }

    fn lab(offset: i64, egfr: f64, uacr: Option<f64>) -> LabPanel {
        LabPanel::new("p1", day(offset), egfr, uacr).unwrap()
    }

    #[test]
    fn test_first_abnormal_opens_pending_period() {
        let detector = DiagnosisDetector::default();
        let step = detector.observe(&DiagnosisPhase::Normal, &lab(0, 55.0, None));
        assert!(step.event.is_none());
        assert!(matches!(step.phase, DiagnosisPhase::ConfirmationDue { .. }));
    }

    #[test]
    fn test_normal_result_does_not_move_the_machine() {
        let detector = DiagnosisDetector::default();
        let step = detector.observe(&DiagnosisPhase::Normal, &lab(0, 75.0, Some(10.0)));
        assert!(step.event.is_none());
        assert_eq!(step.phase, DiagnosisPhase::Normal);
    }

    #[test]
    fn test_confirmatory_result_inside_window_confirms() {
        // First abnormal on day 0, confirmatory on day 95
        let detector = DiagnosisDetector::default();
        let pending = detector
            .observe(&DiagnosisPhase::Normal, &lab(0, 55.0, None))
            .phase;
        let step = detector.observe(&pending, &lab(95, 52.0, None));

        let event = step.event.expect("confirmatory result should emit an event");
        assert_eq!(event.stage, CkdStage::Stage3a);
        assert_eq!(event.first_abnormal_date, day(0).date());
        assert_eq!(event.confirmatory_date, day(95).date());
        assert!(!event.diagnosis_confirmed);
        assert!(matches!(step.phase, DiagnosisPhase::Confirmed { .. }));
    }

    #[test]
    fn test_window_boundary_days_are_inclusive() {
        let detector = DiagnosisDetector::default();
        let pending = detector
            .observe(&DiagnosisPhase::Normal, &lab(0, 55.0, None))
            .phase;

        assert!(detector.observe(&pending, &lab(76, 52.0, None)).event.is_some());
        assert!(detector.observe(&pending, &lab(104, 52.0, None)).event.is_some());
        assert!(detector.observe(&pending, &lab(75, 52.0, None)).event.is_none());
        assert!(detector.observe(&pending, &lab(105, 52.0, None)).event.is_none());
    }

    #[test]
    fn test_early_abnormal_result_keeps_the_original_clock() {
        let detector = DiagnosisDetector::default();
        let pending = detector
            .observe(&DiagnosisPhase::Normal, &lab(0, 55.0, None))
            .phase;
        // Day 40 is before the window opens; the first result stands
        let step = detector.observe(&pending, &lab(40, 54.0, None));
        assert!(step.event.is_none());
        match &step.phase {
            DiagnosisPhase::ConfirmationDue { first_date, .. } => {
                assert_eq!(*first_date, day(0).date());
            }
            other => panic!("expected confirmation due, got {other}"),
        }
        // A qualifying result later still confirms against day 0
        assert!(detector.observe(&step.phase, &lab(95, 52.0, None)).event.is_some());
    }

    #[test]
    fn test_late_abnormal_result_restarts_pending() {
        // Day 130 is outside [76, 104]: no confirmation, fresh clock
        let detector = DiagnosisDetector::default();
        let pending = detector
            .observe(&DiagnosisPhase::Normal, &lab(0, 55.0, None))
            .phase;
        let step = detector.observe(&pending, &lab(130, 52.0, None));
        assert!(step.event.is_none());
        match &step.phase {
            DiagnosisPhase::ConfirmationDue { first_date, .. } => {
                assert_eq!(*first_date, day(130).date());
            }
            other => panic!("expected a restarted pending period, got {other}"),
        }
    }

    #[test]
    fn test_normal_confirmatory_result_resets() {
        let detector = DiagnosisDetector::default();
        let pending = detector
            .observe(&DiagnosisPhase::Normal, &lab(0, 55.0, None))
            .phase;
        let step = detector.observe(&pending, &lab(90, 68.0, Some(12.0)));
        assert!(step.event.is_none());
        assert_eq!(step.phase, DiagnosisPhase::Normal);
    }

    #[test]
    fn test_lapsed_window_resets_to_normal() {
        let detector = DiagnosisDetector::default();
        let pending = detector
            .observe(&DiagnosisPhase::Normal, &lab(0, 55.0, None))
            .phase;

        assert_eq!(
            detector.check_lapse(&pending, day(104).date()),
            pending,
            "window still open on day 104"
        );
        assert_eq!(
            detector.check_lapse(&pending, day(105).date()),
            DiagnosisPhase::Normal
        );
    }

    #[test]
    fn test_elevated_uacr_also_opens_pending() {
        let detector = DiagnosisDetector::default();
        let step = detector.observe(&DiagnosisPhase::Normal, &lab(0, 75.0, Some(45.0)));
        assert!(matches!(step.phase, DiagnosisPhase::ConfirmationDue { .. }));
    }

    #[test]
    fn test_confirmed_phase_is_sticky() {
        let detector = DiagnosisDetector::default();
        let pending = detector
            .observe(&DiagnosisPhase::Normal, &lab(0, 55.0, None))
            .phase;
        let confirmed = detector.observe(&pending, &lab(95, 52.0, None)).phase;
        let step = detector.observe(&confirmed, &lab(200, 70.0, None));
        assert!(step.event.is_none());
        assert_eq!(step.phase, confirmed);
    }
}
