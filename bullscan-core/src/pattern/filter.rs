//! Setback variants and their verdicts.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::window::DayWindow;

/// The two setback shapes scanned in independent passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternVariant {
    /// Three down days after an up day; shallow intraday drop on day 1.
    ThreeDaySetback,
    /// Two down days after a strong (> 2%) up day.
    TwoDaySetback,
}

/// First condition a window failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rejection {
    Day1Change,
    Day1Shrink,
    Day2Change,
    Day2Shrink,
    Day3Change,
    Day4Change,
    TrendGate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternVerdict {
    Qualified,
    Rejected(Rejection),
}

impl PatternVerdict {
    pub fn is_qualified(&self) -> bool {
        matches!(self, PatternVerdict::Qualified)
    }
}

impl PatternVariant {
    pub const ALL: [PatternVariant; 2] = [PatternVariant::ThreeDaySetback, PatternVariant::TwoDaySetback];

    pub fn name(&self) -> &'static str {
        match self {
            PatternVariant::ThreeDaySetback => "three_day_setback",
            PatternVariant::TwoDaySetback => "two_day_setback",
        }
    }

    /// Short label used in report lines.
    pub fn label(&self) -> &'static str {
        match self {
            PatternVariant::ThreeDaySetback => "3-day",
            PatternVariant::TwoDaySetback => "2-day",
        }
    }

    /// Newest-first index of the first close in the short change-rate window.
    ///
    /// The three-day variant moves its window back with the holdout; the
    /// two-day variant keeps it anchored, so under a holdout it reaches one
    /// day closer to the outcome.
    pub fn change_window_start(&self, holdout_days: usize) -> usize {
        match self {
            PatternVariant::ThreeDaySetback => 2 + holdout_days,
            PatternVariant::TwoDaySetback => 2,
        }
    }

    /// Check the day-over-day and intraday conditions of this variant.
    ///
    /// A day whose shrink ratio is undefined (non-positive open) fails the
    /// shrink condition.
    pub fn evaluate(&self, w: &DayWindow<'_>) -> PatternVerdict {
        use PatternVerdict::Rejected;

        let day1_shrink = w.day1.shrink_ratio();
        match self {
            PatternVariant::ThreeDaySetback => {
                if !(w.day1.pct_change < 0.0) {
                    return Rejected(Rejection::Day1Change);
                }
                if !day1_shrink.is_some_and(|s| s < 3.0) {
                    return Rejected(Rejection::Day1Shrink);
                }
                if !(w.day2.pct_change < 0.0) {
                    return Rejected(Rejection::Day2Change);
                }
                if !(w.day3.pct_change < 0.0) {
                    return Rejected(Rejection::Day3Change);
                }
                if !(w.day4.pct_change > 0.0) {
                    return Rejected(Rejection::Day4Change);
                }
            }
            PatternVariant::TwoDaySetback => {
                if !(w.day1.pct_change > -10.0 && w.day1.pct_change < 0.0) {
                    return Rejected(Rejection::Day1Change);
                }
                if !day1_shrink.is_some_and(|s| s < 2.0) {
                    return Rejected(Rejection::Day1Shrink);
                }
                if !(w.day2.pct_change < 0.0) {
                    return Rejected(Rejection::Day2Change);
                }
                if !(w.day3.pct_change > 2.0) {
                    return Rejected(Rejection::Day3Change);
                }
                if !w.day2.shrink_ratio().is_some_and(|s| s < 10.0) {
                    return Rejected(Rejection::Day2Shrink);
                }
            }
        }
        PatternVerdict::Qualified
    }
}

impl fmt::Display for PatternVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for PatternVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "three_day_setback" | "three-day" | "3" | "a" | "A" => Ok(PatternVariant::ThreeDaySetback),
            "two_day_setback" | "two-day" | "2" | "b" | "B" => Ok(PatternVariant::TwoDaySetback),
            _ => Err(format!(
                "unknown variant '{s}'. Valid: three_day_setback, two_day_setback"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PriceRecord;
    use chrono::NaiveDate;

    /// Day with a given change and shrink ratio (open fixed at 100).
    fn day(pct_change: f64, shrink: f64) -> PriceRecord {
        PriceRecord {
            symbol: "T".into(),
            name: "T".into(),
            date: NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
            open: 100.0,
            close: 100.0 - shrink,
            pct_change,
        }
    }

    fn window<'a>(days: &'a [PriceRecord; 5]) -> DayWindow<'a> {
        DayWindow {
            day0: &days[0],
            day1: &days[1],
            day2: &days[2],
            day3: &days[3],
            day4: &days[4],
        }
    }

    #[test]
    fn three_day_qualifies() {
        let days = [day(0.5, 0.0), day(-1.0, 1.0), day(-2.0, 0.0), day(-1.0, 0.0), day(1.0, 0.0)];
        assert!(PatternVariant::ThreeDaySetback.evaluate(&window(&days)).is_qualified());
    }

    #[test]
    fn three_day_fails_when_day4_falls() {
        let days = [day(0.5, 0.0), day(-1.0, 1.0), day(-2.0, 0.0), day(-1.0, 0.0), day(-1.0, 0.0)];
        assert_eq!(
            PatternVariant::ThreeDaySetback.evaluate(&window(&days)),
            PatternVerdict::Rejected(Rejection::Day4Change)
        );
    }

    #[test]
    fn three_day_fails_on_deep_intraday_drop() {
        let days = [day(0.5, 0.0), day(-1.0, 3.0), day(-2.0, 0.0), day(-1.0, 0.0), day(1.0, 0.0)];
        assert_eq!(
            PatternVariant::ThreeDaySetback.evaluate(&window(&days)),
            PatternVerdict::Rejected(Rejection::Day1Shrink)
        );
    }

    #[test]
    fn three_day_rejects_zero_open() {
        let mut days = [day(0.5, 0.0), day(-1.0, 1.0), day(-2.0, 0.0), day(-1.0, 0.0), day(1.0, 0.0)];
        days[1].open = 0.0;
        assert_eq!(
            PatternVariant::ThreeDaySetback.evaluate(&window(&days)),
            PatternVerdict::Rejected(Rejection::Day1Shrink)
        );
    }

    #[test]
    fn two_day_qualifies() {
        let days = [day(0.0, 0.0), day(-1.5, 1.0), day(-3.0, 5.0), day(2.5, 0.0), day(-7.0, 0.0)];
        assert!(PatternVariant::TwoDaySetback.evaluate(&window(&days)).is_qualified());
    }

    #[test]
    fn two_day_boundaries() {
        // day1 at the limit-down boundary
        let days = [day(0.0, 0.0), day(-10.0, 1.0), day(-3.0, 5.0), day(2.5, 0.0), day(0.0, 0.0)];
        assert_eq!(
            PatternVariant::TwoDaySetback.evaluate(&window(&days)),
            PatternVerdict::Rejected(Rejection::Day1Change)
        );
        // day3 must be strictly above 2%
        let days = [day(0.0, 0.0), day(-1.0, 1.0), day(-3.0, 5.0), day(2.0, 0.0), day(0.0, 0.0)];
        assert_eq!(
            PatternVariant::TwoDaySetback.evaluate(&window(&days)),
            PatternVerdict::Rejected(Rejection::Day3Change)
        );
        // day2 intraday drop of 10% is too deep
        let days = [day(0.0, 0.0), day(-1.0, 1.0), day(-3.0, 10.0), day(2.5, 0.0), day(0.0, 0.0)];
        assert_eq!(
            PatternVariant::TwoDaySetback.evaluate(&window(&days)),
            PatternVerdict::Rejected(Rejection::Day2Shrink)
        );
    }

    #[test]
    fn two_day_day1_shrink_limit_is_tighter() {
        let days = [day(0.0, 0.0), day(-1.0, 2.5), day(-3.0, 5.0), day(2.5, 0.0), day(0.0, 0.0)];
        assert!(!PatternVariant::TwoDaySetback.evaluate(&window(&days)).is_qualified());
        let days = [day(0.0, 0.0), day(-1.0, 2.5), day(-3.0, 0.0), day(-1.0, 0.0), day(1.0, 0.0)];
        assert!(PatternVariant::ThreeDaySetback.evaluate(&window(&days)).is_qualified());
    }

    #[test]
    fn change_window_start_by_variant() {
        assert_eq!(PatternVariant::ThreeDaySetback.change_window_start(0), 2);
        assert_eq!(PatternVariant::ThreeDaySetback.change_window_start(1), 3);
        assert_eq!(PatternVariant::TwoDaySetback.change_window_start(1), 2);
    }

    #[test]
    fn variant_parsing() {
        assert_eq!("three_day_setback".parse::<PatternVariant>(), Ok(PatternVariant::ThreeDaySetback));
        assert_eq!("B".parse::<PatternVariant>(), Ok(PatternVariant::TwoDaySetback));
        assert!("five".parse::<PatternVariant>().is_err());
    }
}
