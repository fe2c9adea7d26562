//! Bullish alignment: short MA above mid MA above long MA.
//!
//! All three averages are taken over the most recent closes of a newest-first
//! sequence. The test is a filter: a series that is not strictly stacked
//! produces no result at all.

use serde::{Deserialize, Serialize};

use super::sma::Sma;
use crate::domain::NewestFirst;

/// Periods of the three moving averages.
///
/// Expected to satisfy `short < mid < long`; other orderings make the test
/// degenerate but are not rejected here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlignmentConfig {
    pub short: usize,
    pub mid: usize,
    pub long: usize,
}

impl Default for AlignmentConfig {
    fn default() -> Self {
        Self {
            short: 10,
            mid: 30,
            long: 60,
        }
    }
}

impl AlignmentConfig {
    pub fn new(short: usize, mid: usize, long: usize) -> Self {
        Self { short, mid, long }
    }

    /// True when `short < mid < long`.
    pub fn is_ordered(&self) -> bool {
        self.short < self.mid && self.mid < self.long
    }

    /// Fewest closes needed for all three averages.
    pub fn required_len(&self) -> usize {
        self.short.max(self.mid).max(self.long)
    }
}

/// Averages of a series that passed the alignment test.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignmentResult {
    pub short_ma: f64,
    pub mid_ma: f64,
    pub long_ma: f64,
    /// The closes the averages were computed from, newest-first.
    pub closes: NewestFirst<f64>,
}

/// Test a newest-first close sequence for a strict bullish stack.
///
/// Returns `None` when the sequence is shorter than the longest period, when a
/// period is zero, or when `short_ma > mid_ma > long_ma` does not hold.
pub fn compute_alignment(closes: &NewestFirst<f64>, config: &AlignmentConfig) -> Option<AlignmentResult> {
    if config.short == 0 || config.mid == 0 || config.long == 0 {
        return None;
    }
    if closes.len() < config.required_len() {
        return None;
    }

    let short_ma = Sma::new(config.short).mean_recent(closes)?;
    let mid_ma = Sma::new(config.mid).mean_recent(closes)?;
    let long_ma = Sma::new(config.long).mean_recent(closes)?;

    if short_ma > mid_ma && mid_ma > long_ma {
        Some(AlignmentResult {
            short_ma,
            mid_ma,
            long_ma,
            closes: closes.clone(),
        })
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::OldestFirst;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    fn rising_closes(n: usize) -> NewestFirst<f64> {
        OldestFirst::new((1..=n).map(|i| i as f64).collect()).reversed()
    }

    #[test]
    fn rising_series_is_aligned() {
        let closes = rising_closes(60);
        let result = compute_alignment(&closes, &AlignmentConfig::default()).unwrap();
        // newest-first 60, 59, ..., 1
        assert_approx(result.short_ma, 55.5, DEFAULT_EPSILON);
        assert_approx(result.mid_ma, 45.5, DEFAULT_EPSILON);
        assert_approx(result.long_ma, 30.5, DEFAULT_EPSILON);
        assert_eq!(result.closes.len(), 60);
        assert_eq!(result.closes[0], 60.0);
    }

    #[test]
    fn falling_series_is_not_aligned() {
        // most recent close is the lowest
        let falling: NewestFirst<f64> = (1..=80).map(|i| i as f64).collect();
        assert!(compute_alignment(&falling, &AlignmentConfig::default()).is_none());
    }

    #[test]
    fn flat_series_is_not_aligned() {
        let closes = NewestFirst::new(vec![10.0; 60]);
        assert!(compute_alignment(&closes, &AlignmentConfig::default()).is_none());
    }

    #[test]
    fn short_series_is_absent() {
        let closes = rising_closes(59);
        assert!(compute_alignment(&closes, &AlignmentConfig::default()).is_none());
    }

    #[test]
    fn zero_period_is_absent() {
        let closes = rising_closes(60);
        assert!(compute_alignment(&closes, &AlignmentConfig::new(0, 30, 60)).is_none());
    }

    #[test]
    fn misordered_config_never_aligns_on_rising_data() {
        let closes = rising_closes(60);
        assert!(!AlignmentConfig::new(30, 10, 60).is_ordered());
        assert!(compute_alignment(&closes, &AlignmentConfig::new(30, 10, 60)).is_none());
    }

    #[test]
    fn config_defaults() {
        let c = AlignmentConfig::default();
        assert_eq!((c.short, c.mid, c.long), (10, 30, 60));
        assert!(c.is_ordered());
        assert_eq!(c.required_len(), 60);
    }
}
