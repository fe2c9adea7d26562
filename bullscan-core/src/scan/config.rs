//! Scanner parameters.

use serde::{Deserialize, Serialize};

use crate::indicators::AlignmentConfig;
use crate::pattern::TrendGate;

/// Everything the scanner needs besides the data and the offset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScanConfig {
    pub alignment: AlignmentConfig,
    pub trend_gate: TrendGate,
    /// Extra most-recent days withheld from the signal (0 or 1). Day 0 of the
    /// pattern window becomes an out-of-sample outcome day.
    pub holdout_days: usize,
    /// Records taken newest-first from the offset when building the pattern window.
    pub window_len: usize,
    /// Closes in the short change-rate window.
    pub change_window: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            alignment: AlignmentConfig::default(),
            trend_gate: TrendGate::default(),
            holdout_days: 0,
            window_len: 30,
            change_window: 5,
        }
    }
}

impl ScanConfig {
    pub fn with_holdout(mut self, holdout_days: usize) -> Self {
        self.holdout_days = holdout_days;
        self
    }
}
