//! Recommendation derivation
//!
//! Maps the current health state and latest transition onto an ordered set
//! of candidate clinical actions. Ids are deterministic per (patient,
//! recommendation type, cycle), so regeneration cannot duplicate pending
//! entries.

use smallvec::SmallVec;

use crate::algorithm::kdigo::{CkdStage, RiskLevel};
use crate::models::health_state::HealthStateRecord;
use crate::models::recommendation::{ActionRecommendation, RecommendationType, Urgency};
use crate::models::transition::{ChangeType, StateTransition};

/// Rule engine mapping state + transition to candidate actions
#[derive(Debug, Clone, Default)]
pub struct RecommendationEngine;

impl RecommendationEngine {
    /// Evaluate a transition against the recommendation rules
    ///
    /// Only worsened transitions generate candidates. The returned set is
    /// ordered by ascending priority number (most urgent first).
    #[must_use]
    pub fn evaluate(
        &self,
        current: &HealthStateRecord,
        transition: &StateTransition,
    ) -> SmallVec<[ActionRecommendation; 4]> {
        let mut recommendations = SmallVec::new();
        if transition.change_type != ChangeType::Worsened {
            return recommendations;
        }

        let risk = current.assessment.risk_level;
        let stage = current.assessment.stage;
        let cycle = current.cycle;
        let at = current.measured_at;
        let patient = current.patient_id.as_str();

        if stage >= CkdStage::Stage4 || risk == RiskLevel::VeryHigh {
            recommendations.push(ActionRecommendation::new(
                patient,
                RecommendationType::NephrologyReferral,
                Urgency::Urgent,
                1,
                cycle,
                at,
            ));
        }

        let labs_urgency = if transition.crossed_critical_threshold {
            Urgency::Urgent
        } else {
            Urgency::Routine
        };
        recommendations.push(ActionRecommendation::new(
            patient,
            RecommendationType::ConfirmatoryLabs,
            labs_urgency,
            2,
            cycle,
            at,
        ));

        if risk >= RiskLevel::High {
            recommendations.push(ActionRecommendation::new(
                patient,
                RecommendationType::MedicationReview,
                Urgency::Routine,
                3,
                cycle,
                at,
            ));
            recommendations.push(ActionRecommendation::new(
                patient,
                RecommendationType::BloodPressureControl,
                Urgency::Routine,
                4,
                cycle,
                at,
            ));
        }
        if risk == RiskLevel::VeryHigh {
            recommendations.push(ActionRecommendation::new(
                patient,
                RecommendationType::DietaryCounseling,
                Urgency::Routine,
                5,
                cycle,
                at,
            ));
        }

        recommendations
    }
}
