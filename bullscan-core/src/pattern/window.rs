//! Five-day window extraction with holdout shift.

use crate::domain::{NewestFirst, PriceRecord};

/// Days of one candidate window, newest-first.
///
/// With `holdout_days = 0`, day 1 is the same record as day 0: the setback
/// is read on the outcome day itself. With `holdout_days = 1`, day 0 is held
/// out and days 1–4 are the four days before it.
#[derive(Debug, Clone, Copy)]
pub struct DayWindow<'a> {
    pub day0: &'a PriceRecord,
    pub day1: &'a PriceRecord,
    pub day2: &'a PriceRecord,
    pub day3: &'a PriceRecord,
    pub day4: &'a PriceRecord,
}

impl<'a> DayWindow<'a> {
    /// Records needed in the scan window for a given holdout.
    pub fn required_len(holdout_days: usize) -> usize {
        4 + holdout_days
    }

    /// Pick `day0 = window[0]` and `day_k = window[k - 1 + holdout_days]`.
    ///
    /// `None` if the window is too short.
    pub fn extract(window: &NewestFirst<&'a PriceRecord>, holdout_days: usize) -> Option<Self> {
        if window.len() < Self::required_len(holdout_days) {
            return None;
        }
        let day = |k: usize| window[k - 1 + holdout_days];
        Some(Self {
            day0: window[0],
            day1: day(1),
            day2: day(2),
            day3: day(3),
            day4: day(4),
        })
    }
}
