//! QualifyingEvent: one (symbol, offset) pair that passed the setback filter.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sign of a moving-average slope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrendDirection {
    Rising,
    Falling,
}

/// Qualitative label for a moving-average slope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrendStrength {
    /// Slope could not be computed.
    Unavailable,
    /// |slope| < 0.001
    Flat,
    /// |slope| < 0.01
    Weak(TrendDirection),
    /// |slope| < 0.03
    Moderate(TrendDirection),
    Strong(TrendDirection),
}

impl TrendStrength {
    pub fn classify(slope: Option<f64>) -> Self {
        let Some(slope) = slope.filter(|s| s.is_finite()) else {
            return TrendStrength::Unavailable;
        };
        let magnitude = slope.abs();
        if magnitude < 0.001 {
            return TrendStrength::Flat;
        }
        let direction = if slope > 0.0 {
            TrendDirection::Rising
        } else {
            TrendDirection::Falling
        };
        if magnitude < 0.01 {
            TrendStrength::Weak(direction)
        } else if magnitude < 0.03 {
            TrendStrength::Moderate(direction)
        } else {
            TrendStrength::Strong(direction)
        }
    }
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrendDirection::Rising => write!(f, "rising"),
            TrendDirection::Falling => write!(f, "falling"),
        }
    }
}

impl fmt::Display for TrendStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrendStrength::Unavailable => write!(f, "unavailable"),
            TrendStrength::Flat => write!(f, "flat"),
            TrendStrength::Weak(d) => write!(f, "{d} (weak)"),
            TrendStrength::Moderate(d) => write!(f, "{d} (moderate)"),
            TrendStrength::Strong(d) => write!(f, "{d} (strong)"),
        }
    }
}

/// A signal produced by the scanner for one symbol at one offset.
///
/// `pct_change` is the change on day 0, the day the outcome is measured on.
/// `prior_pct_change` and `prior_shrink` describe day 1, the last day of the
/// setback. `change_rate` is `None` when the short window had a non-positive
/// base price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualifyingEvent {
    pub symbol: String,
    pub name: String,
    pub date: NaiveDate,
    pub offset: usize,
    pub change_rate: Option<f64>,
    pub pct_change: f64,
    pub prior_pct_change: f64,
    pub prior_shrink: f64,
    pub slope: f64,
    pub strength: TrendStrength,
}

impl QualifyingEvent {
    /// Human-readable one-line description.
    pub fn descriptor(&self) -> String {
        format!(
            "{} - {} prior day: {}, shrink {:.2}, day change: {}%",
            self.date, self.name, self.prior_pct_change, self.prior_shrink, self.pct_change
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_thresholds() {
        assert_eq!(TrendStrength::classify(None), TrendStrength::Unavailable);
        assert_eq!(TrendStrength::classify(Some(f64::NAN)), TrendStrength::Unavailable);
        assert_eq!(TrendStrength::classify(Some(0.0005)), TrendStrength::Flat);
        assert_eq!(
            TrendStrength::classify(Some(0.005)),
            TrendStrength::Weak(TrendDirection::Rising)
        );
        assert_eq!(
            TrendStrength::classify(Some(-0.02)),
            TrendStrength::Moderate(TrendDirection::Falling)
        );
        assert_eq!(
            TrendStrength::classify(Some(0.03)),
            TrendStrength::Strong(TrendDirection::Rising)
        );
    }

    #[test]
    fn descriptor_format() {
        let event = QualifyingEvent {
            symbol: "000001".into(),
            name: "平安银行".into(),
            date: NaiveDate::from_ymd_opt(2024, 5, 6).unwrap(),
            offset: 0,
            change_rate: Some(1.5),
            pct_change: 2.1,
            prior_pct_change: -0.8,
            prior_shrink: 0.456,
            slope: 0.05,
            strength: TrendStrength::Strong(TrendDirection::Rising),
        };
        assert_eq!(
            event.descriptor(),
            "2024-05-06 - 平安银行 prior day: -0.8, shrink 0.46, day change: 2.1%"
        );
        assert_eq!(event.strength.to_string(), "rising (strong)");
    }
}
