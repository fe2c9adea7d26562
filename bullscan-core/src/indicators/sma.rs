//! Simple Moving Average (SMA).
//!
//! Two readings of the same average:
//! - `mean_recent`: one value over the `period` most recent closes
//! - `rolling`: one value per complete window, earliest window first

use crate::domain::{NewestFirst, OldestFirst};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sma {
    period: usize,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "SMA period must be >= 1");
        Self { period }
    }

    pub fn period(&self) -> usize {
        self.period
    }

    /// Mean of the first `period` closes of a newest-first sequence.
    ///
    /// `None` if fewer than `period` closes are available.
    pub fn mean_recent(&self, closes: &NewestFirst<f64>) -> Option<f64> {
        if closes.len() < self.period {
            return None;
        }
        let sum: f64 = closes[..self.period].iter().sum();
        Some(sum / self.period as f64)
    }

    /// Rolling mean over an oldest-first sequence.
    ///
    /// Output has `len - period + 1` values (empty if `len < period`); value
    /// `i` averages `closes[i..i + period]`.
    pub fn rolling(&self, closes: &OldestFirst<f64>) -> Vec<f64> {
        let n = closes.len();
        if n < self.period {
            return Vec::new();
        }

        let mut result = Vec::with_capacity(n - self.period + 1);
        let mut sum: f64 = closes[..self.period].iter().sum();
        result.push(sum / self.period as f64);

        // Roll the window forward
        for i in self.period..n {
            sum = sum - closes[i - self.period] + closes[i];
            result.push(sum / self.period as f64);
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    #[test]
    fn rolling_5_basic() {
        let closes = OldestFirst::new(vec![10.0, 11.0, 12.0, 13.0, 14.0, 15.0, 16.0]);
        let result = Sma::new(5).rolling(&closes);

        assert_eq!(result.len(), 3);
        // mean(10,11,12,13,14) = 12.0
        assert_approx(result[0], 12.0, DEFAULT_EPSILON);
        assert_approx(result[1], 13.0, DEFAULT_EPSILON);
        assert_approx(result[2], 14.0, DEFAULT_EPSILON);
    }

    #[test]
    fn rolling_1_is_close() {
        let closes = OldestFirst::new(vec![100.0, 200.0, 300.0]);
        assert_eq!(Sma::new(1).rolling(&closes), vec![100.0, 200.0, 300.0]);
    }

    #[test]
    fn rolling_too_few_closes() {
        let closes = OldestFirst::new(vec![10.0, 11.0]);
        assert!(Sma::new(5).rolling(&closes).is_empty());
    }

    #[test]
    fn mean_recent_uses_head_of_newest_first() {
        let closes = NewestFirst::new(vec![20.0, 10.0, 0.0, 1000.0]);
        assert_approx(Sma::new(3).mean_recent(&closes).unwrap(), 10.0, DEFAULT_EPSILON);
        assert_eq!(Sma::new(5).mean_recent(&closes), None);
    }

    #[test]
    #[should_panic(expected = "SMA period must be >= 1")]
    fn zero_period_panics() {
        Sma::new(0);
    }
}
