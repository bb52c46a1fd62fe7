#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveDateTime};

    use nephrolog::models::{DetectionTrigger, DiagnosisEvent, Patient, ProtocolStatus};
    use nephrolog::{CkdStage, NephrologError, TreatmentProtocolBuilder};

    fn at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
    }

    fn event(stage: CkdStage, egfr: f64, uacr: Option<f64>, confirmed: bool) -> DiagnosisEvent {
        DiagnosisEvent {
            id: DiagnosisEvent::event_id("p1", at().date()),
            patient_id: "p1".to_string(),
            egfr_at_diagnosis: egfr,
            uacr_at_diagnosis: uacr,
            stage,
            trigger: DetectionTrigger::LowEgfr,
            first_abnormal_date: at().date(),
            confirmatory_date: at().date(),
            diagnosis_confirmed: confirmed,
        }
    }

    #[test]
    fn test_unconfirmed_diagnosis_cannot_reach_drafting() {
        let event = event(CkdStage::Stage3a, 52.0, None, false);
        let err = TreatmentProtocolBuilder::for_event(&event, at()).unwrap_err();
        assert!(matches!(err, NephrologError::StateConflict { .. }));
    }

    #[test]
    fn test_stage_3a_draft_contents() {
        let event = event(CkdStage::Stage3a, 52.0, Some(80.0), true);
        let protocol = TreatmentProtocolBuilder::for_event(&event, at())
            .unwrap()
            .build();

        assert_eq!(protocol.status, ProtocolStatus::Pending);
        assert!(protocol.name.contains("Stage 3a"));
        // A2 albuminuria brings RAS blockade; stage 3 brings an SGLT2 inhibitor
        assert!(protocol.medications.iter().any(|m| m.drug_class.contains("ACE")));
        assert!(protocol.medications.iter().any(|m| m.drug_class.contains("SGLT2")));
        assert!(protocol.referrals.is_empty());
        assert!(protocol.monitoring.iter().all(|c| c.interval_days == 180));
    }

    #[test]
    fn test_stage_4_draft_refers_urgently_and_tightens_monitoring() {
        let event = event(CkdStage::Stage4, 25.0, Some(350.0), true);
        let protocol = TreatmentProtocolBuilder::for_event(&event, at())
            .unwrap()
            .build();

        let referral = protocol.referrals.first().expect("stage 4 must refer");
        assert_eq!(referral.specialty, "Nephrology");
        assert!(referral.urgent);
        assert!(protocol.monitoring.iter().all(|c| c.interval_days == 45));
    }

    #[test]
    fn test_normal_albuminuria_skips_ras_blockade() {
        let event = event(CkdStage::Stage3a, 52.0, Some(10.0), true);
        let protocol = TreatmentProtocolBuilder::for_event(&event, at())
            .unwrap()
            .build();
        assert!(!protocol.medications.iter().any(|m| m.drug_class.contains("ACE")));
    }

    #[test]
    fn test_diabetes_comorbidity_adds_glycemic_review() {
        let event = event(CkdStage::Stage3b, 38.0, Some(120.0), true);
        let patient = Patient::new("p1").with_condition("Diabetes");
        let protocol = TreatmentProtocolBuilder::for_event(&event, at())
            .unwrap()
            .with_patient(&patient)
            .build();
        assert!(protocol.medications.iter().any(|m| m.drug_class.contains("Glycemic")));
    }

    #[test]
    fn test_protocol_lifecycle_guards() {
        let event = event(CkdStage::Stage3a, 52.0, Some(80.0), true);
        let mut protocol = TreatmentProtocolBuilder::for_event(&event, at())
            .unwrap()
            .build();

        protocol.activate().unwrap();
        assert_eq!(protocol.status, ProtocolStatus::Active);
        // Declining an already-active protocol is a state conflict
        assert!(matches!(
            protocol.decline().unwrap_err(),
            NephrologError::StateConflict { .. }
        ));
    }
}
