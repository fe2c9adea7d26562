//! Moving-average indicators.
//!
//! - `sma`: simple moving averages, both the single mean over the most recent
//!   closes and the rolling series
//! - `alignment`: the short > mid > long bullish-stack test
//! - `slope`: two-point MA slope and the short-window change rate
//!
//! Every function is pure and returns `None` instead of a NaN when the input
//! is too short or the arithmetic is undefined.

pub mod alignment;
pub mod slope;
pub mod sma;

pub use alignment::{compute_alignment, AlignmentConfig, AlignmentResult};
pub use slope::{change_rate, trend_slope};
pub use sma::Sma;

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
