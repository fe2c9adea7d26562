//! Slope estimation over oldest-first closes.

use super::sma::Sma;
use crate::domain::OldestFirst;

/// Single-step slope of the rolling SMA: last value minus the one before it.
///
/// Needs at least `period + 1` closes (two complete windows). `None` for a
/// zero period, too little data or a non-finite result.
pub fn trend_slope(prices: &OldestFirst<f64>, period: usize) -> Option<f64> {
    if period == 0 || prices.len() < period {
        return None;
    }
    let ma = Sma::new(period).rolling(prices);
    if ma.len() < 2 {
        return None;
    }
    let slope = ma[ma.len() - 1] - ma[ma.len() - 2];
    slope.is_finite().then_some(slope)
}

/// Percent change from `prices[len - days]` to the last price, rounded to
/// two decimals.
///
/// `None` when fewer than `days` prices exist, when `days` is zero, or when
/// the base price is not positive.
pub fn change_rate(prices: &OldestFirst<f64>, days: usize) -> Option<f64> {
    if days == 0 || prices.len() < days {
        return None;
    }
    let last = prices[prices.len() - 1];
    let base = prices[prices.len() - days];
    if !base.is_finite() || base <= 0.0 || !last.is_finite() {
        return None;
    }
    let rate = (last - base) / base * 100.0;
    rate.is_finite().then(|| round_to_cents(rate))
}

fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
