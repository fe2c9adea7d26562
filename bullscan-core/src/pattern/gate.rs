//! Trend gate: the rolling-MA slope must be clearly positive.

use serde::{Deserialize, Serialize};

use crate::domain::OldestFirst;
use crate::indicators::trend_slope;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendGate {
    pub period: usize,
    /// Exclusive lower bound on the slope.
    pub threshold: f64,
}

impl Default for TrendGate {
    fn default() -> Self {
        Self {
            period: 10,
            threshold: 0.03,
        }
    }
}

impl TrendGate {
    pub fn slope(&self, closes: &OldestFirst<f64>) -> Option<f64> {
        trend_slope(closes, self.period)
    }

    /// An absent slope never passes.
    pub fn passes(&self, slope: Option<f64>) -> bool {
        slope.is_some_and(|s| s > self.threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rising_closes_pass() {
        let gate = TrendGate::default();
        let closes = OldestFirst::new((0..20).map(|i| 10.0 + 0.1 * i as f64).collect());
        assert!(gate.passes(gate.slope(&closes)));
    }

    #[test]
    fn threshold_is_exclusive() {
        let gate = TrendGate::default();
        assert!(!gate.passes(Some(0.03)));
        assert!(gate.passes(Some(0.0301)));
        assert!(!gate.passes(None));
    }

    #[test]
    fn too_short_for_slope() {
        let gate = TrendGate::default();
        let closes = OldestFirst::new(vec![1.0; 10]);
        assert_eq!(gate.slope(&closes), None);
    }
}
