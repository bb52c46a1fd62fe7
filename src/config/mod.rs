//! Configuration for the monitoring core.
//!
//! All clinical constants live here so they are overridable by the caller
//! without touching the algorithms.

use std::fmt;

/// Configuration for the CKD diagnosis confirmation protocol
#[derive(Debug, Clone)]
pub struct ConfirmationConfig {
    /// Day of the pending period on which the confirmatory test becomes due
    pub due_day: i64,
    /// Acceptable deviation around the due day, in days
    pub window_days: i64,
    /// eGFR below this value counts as an abnormal result (mL/min/1.73m²)
    pub abnormal_egfr_below: f64,
    /// uACR above this value counts as an abnormal result (mg/g)
    pub abnormal_uacr_above: f64,
}

impl Default for ConfirmationConfig {
    fn default() -> Self {
        Self {
            due_day: 90,
            window_days: 14,
            abnormal_egfr_below: 60.0,
            abnormal_uacr_above: 30.0,
        }
    }
}

impl ConfirmationConfig {
    /// Earliest day (inclusive) on which a confirmatory result qualifies
    #[must_use]
    pub const fn window_open(&self) -> i64 {
        self.due_day - self.window_days
    }

    /// Latest day (inclusive) on which a confirmatory result qualifies
    #[must_use]
    pub const fn window_close(&self) -> i64 {
        self.due_day + self.window_days
    }
}

/// Configuration for uACR trend monitoring
#[derive(Debug, Clone)]
pub struct UacrConfig {
    /// Lookback window for selecting the trailing baseline, in days
    pub lookback_days: i64,
    /// Percent increase from baseline that is critical on its own
    pub critical_increase_pct: f64,
    /// Absolute uACR value that is critical regardless of trend (mg/g)
    pub critical_absolute: f64,
    /// Percent increase that is high when already above the A2 threshold
    pub high_increase_pct: f64,
    /// Percent increase that is moderate
    pub moderate_increase_pct: f64,
    /// A2 albuminuria threshold (mg/g)
    pub a2_threshold: f64,
}

impl Default for UacrConfig {
    fn default() -> Self {
        Self {
            lookback_days: 365,
            critical_increase_pct: 100.0,
            critical_absolute: 300.0,
            high_increase_pct: 50.0,
            moderate_increase_pct: 20.0,
            a2_threshold: 30.0,
        }
    }
}

/// Configuration for population scans
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Number of worker threads for the scan pool
    pub worker_threads: usize,
    /// Retry attempts for a patient unit that fails with a transient error
    pub transient_retries: u32,
    /// Relative eGFR decline flagging a rapid progressor (fraction, 0..1)
    pub rapid_decline_fraction: f64,
    /// Whether to display progress bars during scans
    pub show_progress: bool,
    /// Confirmation protocol settings
    pub confirmation: ConfirmationConfig,
    /// uACR trend settings
    pub uacr: UacrConfig,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            worker_threads: num_cpus::get(),
            transient_retries: 2,
            rapid_decline_fraction: 0.25,
            show_progress: false,
            confirmation: ConfirmationConfig::default(),
            uacr: UacrConfig::default(),
        }
    }
}

impl fmt::Display for ScanConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Scan Configuration:")?;
        writeln!(f, "  Worker Threads: {}", self.worker_threads)?;
        writeln!(f, "  Transient Retries: {}", self.transient_retries)?;
        writeln!(
            f,
            "  Rapid Decline Threshold: {:.0}%",
            self.rapid_decline_fraction * 100.0
        )?;
        writeln!(
            f,
            "  Confirmation Window: day {} ± {}",
            self.confirmation.due_day, self.confirmation.window_days
        )?;
        writeln!(f, "  uACR Lookback: {} days", self.uacr.lookback_days)?;
        Ok(())
    }
}
