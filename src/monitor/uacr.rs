//! Albuminuria trend monitoring
//!
//! Independent, lighter-weight scan comparing each patient's most recent
//! uACR reading to a trailing baseline. Runs beside the progression scan
//! and writes its own alerts; finding nothing is the common outcome.

use chrono::NaiveDateTime;
use log::{info, warn};
use std::fmt;
use std::sync::Arc;

use crate::config::UacrConfig;
use crate::error::Result;
use crate::models::alert::{AlertSeverity, AlertType, MonitoringAlert};
use crate::models::lab::LabPanel;
use crate::store::HealthStore;

/// Severity of a detected albuminuria trend
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum UacrSeverity {
    /// ≥ moderate percent increase from baseline
    Moderate,
    /// ≥ high percent increase while already above the A2 threshold
    High,
    /// ≥ critical percent increase, or severely elevated absolute value
    Critical,
}

impl UacrSeverity {
    /// Get a descriptive name for this severity
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Moderate => "MODERATE",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        }
    }

    /// Map onto the alert severity scale
    #[must_use]
    pub const fn alert_severity(self) -> AlertSeverity {
        match self {
            Self::Moderate => AlertSeverity::Info,
            Self::High => AlertSeverity::Warning,
            Self::Critical => AlertSeverity::Critical,
        }
    }
}

impl fmt::Display for UacrSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// A detected worsening of one patient's albuminuria trend
#[derive(Debug, Clone)]
pub struct UacrFinding {
    /// Patient the finding concerns
    pub patient_id: String,
    /// Trailing baseline value (mg/g)
    pub baseline: f64,
    /// Most recent value (mg/g)
    pub latest: f64,
    /// Percent change from baseline
    pub percent_change: f64,
    /// Tiered severity
    pub severity: UacrSeverity,
    /// Measurement time of the latest reading
    pub measured_at: NaiveDateTime,
}

/// Counts from one uACR scan
#[derive(Debug, Clone, Copy, Default)]
pub struct UacrScanSummary {
    /// Patients whose series was evaluated
    pub patients_evaluated: usize,
    /// New alerts written
    pub alerts_raised: usize,
    /// Patients skipped on error
    pub patients_skipped: usize,
}

/// The albuminuria-trend scan
pub struct UacrMonitor {
    store: Arc<dyn HealthStore>,
    config: UacrConfig,
}

impl UacrMonitor {
    /// Create a monitor over a store
    #[must_use]
    pub fn new(store: Arc<dyn HealthStore>, config: UacrConfig) -> Self {
        Self { store, config }
    }

    /// Evaluate one patient's lab series
    ///
    /// The baseline is the earliest reading inside the lookback window
    /// before the latest reading, falling back to the last reading before
    /// the window. `None` - no worsening - is the normal outcome, not a
    /// failure.
    #[must_use]
    pub fn evaluate_series(&self, patient_id: &str, labs: &[LabPanel]) -> Option<UacrFinding> {
        let readings: Vec<(NaiveDateTime, f64)> = labs
            .iter()
            .filter_map(|lab| lab.uacr.map(|value| (lab.measured_at, value)))
            .collect();
        let (&(latest_at, latest), history) = readings.split_last()?;

        let window_start = latest_at - chrono::Duration::days(self.config.lookback_days);
        let baseline = history
            .iter()
            .find(|(at, _)| *at >= window_start)
            .or_else(|| history.last())
            .map(|&(_, value)| value)?;

        let percent_change = if baseline > 0.0 {
            (latest - baseline) / baseline * 100.0
        } else if latest > 0.0 {
            f64::INFINITY
        } else {
            0.0
        };

        let severity = self.tier(baseline, latest, percent_change)?;
        Some(UacrFinding {
            patient_id: patient_id.to_string(),
            baseline,
            latest,
            percent_change,
            severity,
            measured_at: latest_at,
        })
    }

    /// Scan the whole population and persist alerts for new findings
    pub fn run_scan(&self) -> Result<UacrScanSummary> {
        let mut summary = UacrScanSummary::default();
        for patient_id in self.store.patient_ids()? {
            let labs = match self.store.lab_history(&patient_id) {
                Ok(labs) => labs,
                Err(err) => {
                    warn!("uACR scan: skipping patient {patient_id}: {err}");
                    summary.patients_skipped += 1;
                    continue;
                }
            };
            summary.patients_evaluated += 1;

            let Some(finding) = self.evaluate_series(&patient_id, &labs) else {
                continue;
            };
            let alert = Self::to_alert(&finding);
            if self.store.insert_alert(alert)? {
                summary.alerts_raised += 1;
            }
        }
        info!(
            "uACR scan: {} patients evaluated, {} alerts raised, {} skipped",
            summary.patients_evaluated, summary.alerts_raised, summary.patients_skipped
        );
        Ok(summary)
    }

    fn tier(&self, baseline: f64, latest: f64, percent_change: f64) -> Option<UacrSeverity> {
        if percent_change >= self.config.critical_increase_pct
            || (latest > self.config.critical_absolute && percent_change > 0.0)
        {
            Some(UacrSeverity::Critical)
        } else if percent_change >= self.config.high_increase_pct
            && baseline > self.config.a2_threshold
        {
            Some(UacrSeverity::High)
        } else if percent_change >= self.config.moderate_increase_pct {
            Some(UacrSeverity::Moderate)
        } else {
            None
        }
    }

    /// Alerts are keyed by the latest reading's timestamp, so re-running
    /// over an unchanged series maps onto the same row
    fn to_alert(finding: &UacrFinding) -> MonitoringAlert {
        MonitoringAlert::new(
            &finding.patient_id,
            finding.severity.alert_severity(),
            AlertType::AlbuminuriaTrend,
            format!(
                "{} albuminuria trend: uACR {:.0} mg/g, {:+.0}% from baseline {:.0} mg/g",
                finding.severity, finding.latest, finding.percent_change, finding.baseline
            ),
            format!("uacr{}", finding.measured_at.format("%Y%m%d%H%M%S")),
            finding.measured_at,
        )
    }
}
