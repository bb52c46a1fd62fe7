//! Longitudinal state-transition detection
//!
//! Compares two temporally ordered health-state records for one patient and
//! determines whether the change is clinically meaningful.

use crate::error::{NephrologError, Result};
use crate::models::health_state::HealthStateRecord;
use crate::models::transition::{ChangeType, StateTransition};

/// Detector comparing consecutive health-state records
#[derive(Debug, Clone)]
pub struct TransitionDetector {
    /// Relative eGFR decline flagging a rapid progressor (fraction, 0..1)
    rapid_decline_fraction: f64,
}

impl Default for TransitionDetector {
    fn default() -> Self {
        Self {
            rapid_decline_fraction: 0.25,
        }
    }
}

impl TransitionDetector {
    /// Create a detector with a custom rapid-progressor threshold
    #[must_use]
    pub const fn new(rapid_decline_fraction: f64) -> Self {
        Self {
            rapid_decline_fraction,
        }
    }

    /// Compare an ordered pair of records
    ///
    /// Returns `Ok(None)` for a stable pair - the normal case, no transition
    /// is emitted. Rejects pairs from different patients or with out-of-order
    /// timestamps.
    pub fn detect(
        &self,
        previous: &HealthStateRecord,
        current: &HealthStateRecord,
    ) -> Result<Option<StateTransition>> {
        if previous.patient_id != current.patient_id {
            return Err(NephrologError::DataIntegrity(format!(
                "transition would span patients {} and {}",
                previous.patient_id, current.patient_id
            )));
        }
        if current.measured_at <= previous.measured_at {
            return Err(NephrologError::DataIntegrity(format!(
                "records {} and {} are not in time order ({} vs {})",
                previous.id, current.id, previous.measured_at, current.measured_at
            )));
        }

        let change_type = Self::change_type(previous, current);
        if change_type == ChangeType::Stable {
            return Ok(None);
        }

        let egfr_relative_change = (current.egfr - previous.egfr) / previous.egfr;
        let risk_delta = current.assessment.risk_level.severity_rank() as i8
            - previous.assessment.risk_level.severity_rank() as i8;

        Ok(Some(StateTransition {
            id: StateTransition::transition_id(&previous.id, &current.id),
            patient_id: current.patient_id.clone(),
            from_record: previous.id.clone(),
            to_record: current.id.clone(),
            change_type,
            crossed_critical_threshold: self.crossed_critical_threshold(
                previous,
                current,
                egfr_relative_change,
            ),
            risk_delta,
            egfr_relative_change,
            transition_date: current.measured_at,
        }))
    }

    /// Ordinal change across the two grid axes
    fn change_type(previous: &HealthStateRecord, current: &HealthStateRecord) -> ChangeType {
        let egfr_before = previous.assessment.egfr_category.severity_rank();
        let egfr_after = current.assessment.egfr_category.severity_rank();

        // Albuminuria only participates when measured on both sides
        let albuminuria = previous
            .assessment
            .albuminuria_category
            .severity_rank()
            .zip(current.assessment.albuminuria_category.severity_rank());

        let egfr_worsened = egfr_after > egfr_before;
        let egfr_improved = egfr_after < egfr_before;
        let (alb_worsened, alb_improved) =
            albuminuria.map_or((false, false), |(before, after)| (after > before, after < before));

        if egfr_worsened || alb_worsened {
            ChangeType::Worsened
        } else if egfr_improved || alb_improved {
            ChangeType::Improved
        } else {
            ChangeType::Stable
        }
    }

    /// Whether the pair breaches a hard clinical threshold
    ///
    /// True when the eGFR category newly enters G4/G5, the albuminuria
    /// category worsens by at least one tier, or the relative eGFR decline
    /// reaches the rapid-progressor fraction.
    fn crossed_critical_threshold(
        &self,
        previous: &HealthStateRecord,
        current: &HealthStateRecord,
        egfr_relative_change: f64,
    ) -> bool {
        let entered_severe = current.assessment.egfr_category.is_severely_reduced()
            && !previous.assessment.egfr_category.is_severely_reduced();

        let albuminuria_worsened = previous
            .assessment
            .albuminuria_category
            .severity_rank()
            .zip(current.assessment.albuminuria_category.severity_rank())
            .is_some_and(|(before, after)| after > before);

        let rapid_decline = egfr_relative_change <= -self.rapid_decline_fraction;

        entered_severe || albuminuria_worsened || rapid_decline
    }
}
