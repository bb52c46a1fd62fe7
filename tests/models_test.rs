#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveDateTime};

    use nephrolog::models::{
        ActionRecommendation, AlertSeverity, AlertStatus, AlertType, LabPanel, MonitoringAlert,
        RecommendationStatus, RecommendationType, Urgency,
    };
    use nephrolog::NephrologError;

    fn at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_missing_egfr_fails_fast() {
        assert!(matches!(
            LabPanel::new("p1", at(), f64::NAN, None).unwrap_err(),
            NephrologError::Validation { field: "egfr", .. }
        ));
        assert!(matches!(
            LabPanel::new("p1", at(), 0.0, None).unwrap_err(),
            NephrologError::Validation { field: "egfr", .. }
        ));
        assert!(matches!(
            LabPanel::new("p1", at(), -10.0, None).unwrap_err(),
            NephrologError::Validation { field: "egfr", .. }
        ));
    }

    #[test]
    fn test_invalid_uacr_fails_fast() {
        assert!(matches!(
            LabPanel::new("p1", at(), 60.0, Some(-5.0)).unwrap_err(),
            NephrologError::Validation { field: "uacr", .. }
        ));
        // Absent uACR is valid input, not an error
        assert!(LabPanel::new("p1", at(), 60.0, None).is_ok());
    }

    #[test]
    fn test_alert_status_lifecycle() {
        let mut alert = MonitoringAlert::new(
            "p1",
            AlertSeverity::Warning,
            AlertType::StageProgression,
            "test",
            "p1-c0001",
            at(),
        );
        assert_eq!(alert.status, AlertStatus::Active);
        alert.transition_status(AlertStatus::Acknowledged).unwrap();
        alert.transition_status(AlertStatus::Resolved).unwrap();

        // Resolved is terminal
        let err = alert.transition_status(AlertStatus::Dismissed).unwrap_err();
        assert!(matches!(err, NephrologError::StateConflict { .. }));
    }

    #[test]
    fn test_alert_cannot_reactivate() {
        let mut alert = MonitoringAlert::new(
            "p1",
            AlertSeverity::Info,
            AlertType::AlbuminuriaTrend,
            "test",
            "uacr20240301",
            at(),
        );
        alert.transition_status(AlertStatus::Dismissed).unwrap();
        assert!(alert.transition_status(AlertStatus::Active).is_err());
    }

    #[test]
    fn test_recommendation_status_lifecycle() {
        let mut recommendation = ActionRecommendation::new(
            "p1",
            RecommendationType::ConfirmatoryLabs,
            Urgency::Urgent,
            2,
            3,
            at(),
        );
        assert_eq!(recommendation.status, RecommendationStatus::Pending);
        recommendation
            .transition_status(RecommendationStatus::InProgress)
            .unwrap();
        recommendation
            .transition_status(RecommendationStatus::Completed)
            .unwrap();
        assert!(
            recommendation
                .transition_status(RecommendationStatus::Dismissed)
                .is_err()
        );
    }

    #[test]
    fn test_deterministic_ids() {
        let a = ActionRecommendation::new(
            "p1",
            RecommendationType::MedicationReview,
            Urgency::Routine,
            3,
            7,
            at(),
        );
        let b = ActionRecommendation::new(
            "p1",
            RecommendationType::MedicationReview,
            Urgency::Routine,
            3,
            7,
            at(),
        );
        assert_eq!(a.id, b.id);

        let other_cycle = ActionRecommendation::new(
            "p1",
            RecommendationType::MedicationReview,
            Urgency::Routine,
            3,
            8,
            at(),
        );
        assert_ne!(a.id, other_cycle.id);
    }
}
