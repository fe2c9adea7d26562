//! Per-offset and cross-offset aggregation of qualifying events.
//!
//! All functions are pure: they take the events of one offset (or the stats
//! of many offsets) and return descriptive numbers. Nothing here reads the
//! store or the config file.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use bullscan_core::domain::QualifyingEvent;
use bullscan_core::pattern::PatternVariant;

use crate::config::DenominatorPolicy;

/// Simple mean; `None` for an empty slice.
pub fn average(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Day-0 changes split by sign. Zero counts as falling.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReturnSplit {
    pub rising_count: usize,
    pub rising_avg: Option<f64>,
    pub falling_count: usize,
    pub falling_avg: Option<f64>,
    pub overall_avg: Option<f64>,
}

impl ReturnSplit {
    pub fn from_changes(changes: &[f64]) -> Self {
        let (rising, falling): (Vec<f64>, Vec<f64>) = changes.iter().partition(|&&c| c > 0.0);
        Self {
            rising_count: rising.len(),
            rising_avg: average(&rising),
            falling_count: falling.len(),
            falling_avg: average(&falling),
            overall_avg: average(changes),
        }
    }
}

/// Aggregates for one (variant, offset).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OffsetRunStats {
    pub variant: PatternVariant,
    pub offset: usize,
    /// As-of date of the lowest-ranked event, if any.
    pub date: Option<NaiveDate>,
    pub event_count: usize,
    /// Events with a change rate, i.e. those eligible for the slices.
    pub ranked_count: usize,
    pub setback_sum: f64,
    pub attack_sum: f64,
    pub split: ReturnSplit,
}

/// One offset's events in report order, plus their stats.
#[derive(Debug, Clone, PartialEq)]
pub struct OffsetOutcome {
    pub stats: OffsetRunStats,
    /// Ascending by change rate; ties keep scan order.
    pub ranked: Vec<QualifyingEvent>,
    /// Events whose change rate could not be computed.
    pub unranked: Vec<QualifyingEvent>,
}

/// Split events into those with a change rate, sorted ascending, and the rest.
///
/// The sort is stable, so equal rates keep universe order.
pub fn rank_events(events: Vec<QualifyingEvent>) -> (Vec<QualifyingEvent>, Vec<QualifyingEvent>) {
    let (mut ranked, unranked): (Vec<_>, Vec<_>) = events.into_iter().partition(|e| e.change_rate.is_some());
    ranked.sort_by(|a, b| {
        let a = a.change_rate.unwrap_or_default();
        let b = b.change_rate.unwrap_or_default();
        a.total_cmp(&b)
    });
    (ranked, unranked)
}

/// Sum of day-0 changes over the first and last `slice_size` ranked events.
///
/// The two slices overlap when fewer than `2 * slice_size` events exist.
pub fn slice_sums(ranked: &[QualifyingEvent], slice_size: usize) -> (f64, f64) {
    let n = ranked.len();
    let low = &ranked[..slice_size.min(n)];
    let high = &ranked[n.saturating_sub(slice_size)..];
    (
        low.iter().map(|e| e.pct_change).sum(),
        high.iter().map(|e| e.pct_change).sum(),
    )
}

/// Rank one offset's events and compute its stats.
pub fn summarize_offset(
    variant: PatternVariant,
    offset: usize,
    events: Vec<QualifyingEvent>,
    slice_size: usize,
) -> OffsetOutcome {
    let changes: Vec<f64> = events.iter().map(|e| e.pct_change).collect();
    let split = ReturnSplit::from_changes(&changes);
    let event_count = events.len();

    let (ranked, unranked) = rank_events(events);
    let (setback_sum, attack_sum) = slice_sums(&ranked, slice_size);
    let date = ranked.first().or(unranked.first()).map(|e| e.date);

    OffsetOutcome {
        stats: OffsetRunStats {
            variant,
            offset,
            date,
            event_count,
            ranked_count: ranked.len(),
            setback_sum,
            attack_sum,
            split,
        },
        ranked,
        unranked,
    }
}

/// Running totals across the offsets of one pass.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PassTotals {
    pub setback_total: f64,
    pub attack_total: f64,
    pub offsets_scanned: usize,
    pub offsets_with_events: usize,
}

impl PassTotals {
    /// Fold one offset into the totals.
    pub fn add(self, stats: &OffsetRunStats) -> Self {
        Self {
            setback_total: self.setback_total + stats.setback_sum,
            attack_total: self.attack_total + stats.attack_sum,
            offsets_scanned: self.offsets_scanned + 1,
            offsets_with_events: self.offsets_with_events + usize::from(stats.event_count > 0),
        }
    }

    pub fn denominator(&self, policy: DenominatorPolicy) -> usize {
        match policy {
            DenominatorPolicy::OffsetsWithEvents => self.offsets_with_events,
            DenominatorPolicy::AllOffsets => self.offsets_scanned,
        }
    }

    /// Mean setback sum per offset; `None` when the denominator is zero.
    pub fn setback_mean(&self, policy: DenominatorPolicy) -> Option<f64> {
        mean_over(self.setback_total, self.denominator(policy))
    }

    pub fn attack_mean(&self, policy: DenominatorPolicy) -> Option<f64> {
        mean_over(self.attack_total, self.denominator(policy))
    }
}

fn mean_over(total: f64, count: usize) -> Option<f64> {
    (count > 0).then(|| total / count as f64)
}
