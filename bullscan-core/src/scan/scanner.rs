//! Per-offset backtest scan.
//!
//! For one offset, each symbol's history is cut back by `offset +
//! holdout_days` days and re-analysed as if that day were today:
//! 1. alignment test on the truncated closes
//! 2. five-day pattern window starting `offset` days back
//! 3. variant conditions, then the trend gate on the truncated closes
//! 4. short-window change rate for ranking
//!
//! The scan is a pure function of the store, the offset and the config.

use tracing::{debug, trace};

use super::config::ScanConfig;
use crate::data::{SeriesStore, Universe};
use crate::domain::{newest_first_closes, oldest_first_closes, QualifyingEvent, SymbolSeries, TrendStrength};
use crate::indicators::{change_rate, compute_alignment};
use crate::pattern::{DayWindow, PatternVariant, PatternVerdict, Rejection};

/// Scan every universe symbol at one offset, in universe order.
///
/// Symbols without a loaded history are skipped.
pub fn scan_offset(
    universe: &Universe,
    store: &SeriesStore,
    variant: PatternVariant,
    offset: usize,
    config: &ScanConfig,
) -> Vec<QualifyingEvent> {
    let mut events = Vec::new();
    for entry in universe.entries() {
        let Some(series) = store.get(&entry.symbol) else {
            debug!(symbol = %entry.symbol, offset, "no history loaded, skipping");
            continue;
        };
        if let Some(event) = scan_symbol(series, variant, offset, config) {
            events.push(event);
        }
    }
    debug!(%variant, offset, events = events.len(), "offset scanned");
    events
}

/// Evaluate one symbol at one offset.
pub fn scan_symbol(
    series: &SymbolSeries,
    variant: PatternVariant,
    offset: usize,
    config: &ScanConfig,
) -> Option<QualifyingEvent> {
    let truncated = series.truncated(offset + config.holdout_days);
    let alignment = compute_alignment(&newest_first_closes(truncated), &config.alignment)?;

    let window = series.newest_first().window(offset, config.window_len);
    let days = DayWindow::extract(&window, config.holdout_days)?;

    if let PatternVerdict::Rejected(reason) = variant.evaluate(&days) {
        trace!(symbol = series.symbol(), offset, ?reason, "pattern rejected");
        return None;
    }

    let slope = config.trend_gate.slope(&oldest_first_closes(truncated));
    let slope = match slope {
        Some(s) if config.trend_gate.passes(Some(s)) => s,
        _ => {
            trace!(symbol = series.symbol(), offset, reason = ?Rejection::TrendGate, ?slope, "pattern rejected");
            return None;
        }
    };

    let start = variant.change_window_start(config.holdout_days);
    let short_window = alignment.closes.window(start, config.change_window).reversed();
    let rate = change_rate(&short_window, config.change_window);

    Some(QualifyingEvent {
        symbol: series.symbol().to_string(),
        name: days.day0.name.clone(),
        date: days.day0.date,
        offset,
        change_rate: rate,
        pct_change: days.day0.pct_change,
        prior_pct_change: days.day1.pct_change,
        // a qualified window always has a defined day-1 shrink
        prior_shrink: days.day1.shrink_ratio().unwrap_or_default(),
        slope,
        strength: TrendStrength::classify(Some(slope)),
    })
}
