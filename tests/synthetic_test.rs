#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use nephrolog::SyntheticGenerator;
    use nephrolog::monitor::synthetic::MAX_CYCLES;

    fn start() -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_same_seed_reproduces_the_cohort() {
        let a = SyntheticGenerator::new(7).generate(20, 6, start()).unwrap();
        let b = SyntheticGenerator::new(7).generate(20, 6, start()).unwrap();
        assert_eq!(a.patients.len(), b.patients.len());
        assert_eq!(a.labs.len(), b.labs.len());
        for (lab_a, lab_b) in a.labs.iter().zip(&b.labs) {
            assert_eq!(lab_a.patient_id, lab_b.patient_id);
            assert_eq!(lab_a.egfr, lab_b.egfr);
            assert_eq!(lab_a.uacr, lab_b.uacr);
        }
    }

    #[test]
    fn test_cycle_range_is_bounded() {
        let cohort = SyntheticGenerator::new(1).generate(3, 500, start()).unwrap();
        assert_eq!(cohort.labs.len(), 3 * MAX_CYCLES as usize);

        let cohort = SyntheticGenerator::new(1).generate(3, 0, start()).unwrap();
        assert_eq!(cohort.labs.len(), 3);
    }

    #[test]
    fn test_generated_labs_are_valid_and_ordered() {
        let cohort = SyntheticGenerator::new(9).generate(10, 12, start()).unwrap();
        for patient in &cohort.patients {
            let mut series: Vec<_> = cohort
                .labs
                .iter()
                .filter(|lab| lab.patient_id == patient.id)
                .collect();
            assert_eq!(series.len(), 12);
            series.sort_by_key(|lab| lab.measured_at);
            for window in series.windows(2) {
                assert!(window[0].measured_at < window[1].measured_at);
            }
            for lab in series {
                assert!(lab.egfr > 0.0);
            }
        }
    }
}
