//! Alert derivation
//!
//! Turns a worsened state transition into at most one clinician-facing
//! alert. Alerts are keyed by the later record of the compared pair, so a
//! re-run over the same pair maps onto the same alert row.

use crate::algorithm::kdigo::AlbuminuriaCategory;
use crate::models::alert::{AlertSeverity, AlertType, MonitoringAlert};
use crate::models::health_state::HealthStateRecord;
use crate::models::transition::{ChangeType, StateTransition};

/// eGFR below this is a hard clinical threshold (mL/min/1.73m²)
const CRITICAL_EGFR: f64 = 30.0;

/// Rule engine mapping transitions to alerts
#[derive(Debug, Clone)]
pub struct AlertEngine {
    rapid_decline_fraction: f64,
}

impl AlertEngine {
    /// Create an engine with the scan's rapid-progressor threshold
    #[must_use]
    pub const fn new(rapid_decline_fraction: f64) -> Self {
        Self {
            rapid_decline_fraction,
        }
    }

    /// Evaluate a transition against the alerting rules
    ///
    /// Fires only for a worsened change that crossed a critical threshold or
    /// climbed at least one composite risk tier; everything else yields
    /// nothing.
    #[must_use]
    pub fn evaluate(
        &self,
        previous: &HealthStateRecord,
        current: &HealthStateRecord,
        transition: &StateTransition,
    ) -> Option<MonitoringAlert> {
        if transition.change_type != ChangeType::Worsened {
            return None;
        }
        if !transition.crossed_critical_threshold && transition.risk_delta < 1 {
            return None;
        }

        let new_a3 = current.assessment.albuminuria_category == AlbuminuriaCategory::A3
            && previous.assessment.albuminuria_category != AlbuminuriaCategory::A3;
        let severity = if current.egfr < CRITICAL_EGFR || new_a3 {
            AlertSeverity::Critical
        } else {
            AlertSeverity::Warning
        };

        let alert_type = if current.assessment.egfr_category.is_severely_reduced()
            && !previous.assessment.egfr_category.is_severely_reduced()
        {
            AlertType::CriticalFunction
        } else if transition.egfr_relative_change <= -self.rapid_decline_fraction {
            AlertType::RapidDecline
        } else {
            AlertType::StageProgression
        };

        let message = format!(
            "Kidney health state worsened from {} to {} (eGFR {:.0} -> {:.0}, risk {})",
            previous.assessment.egfr_category,
            current.assessment.egfr_category,
            previous.egfr,
            current.egfr,
            current.assessment.risk_level,
        );

        Some(MonitoringAlert::new(
            &current.patient_id,
            severity,
            alert_type,
            message,
            &transition.to_record,
            transition.transition_date,
        ))
    }
}
