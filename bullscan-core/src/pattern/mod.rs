//! Setback pattern filter.
//!
//! A candidate is a five-day newest-first window `[day0, day1, .., day4]`.
//! Day 0 is the outcome day; days 1–4 describe the setback that precedes it.
//! Two variants with different thresholds are supported, each followed by a
//! moving-average trend gate.

pub mod filter;
pub mod gate;
pub mod window;

pub use filter::{PatternVariant, PatternVerdict, Rejection};
pub use gate::TrendGate;
pub use window::DayWindow;
