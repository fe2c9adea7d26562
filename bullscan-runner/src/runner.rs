//! Scan orchestration: one pass per pattern variant, one scan per offset.
//!
//! Offsets are scanned from `max_offset` down to `min_offset`; each offset's
//! events are ranked and summarized, reported through an optional progress
//! callback, then folded into the pass totals.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use bullscan_core::data::{SeriesStore, Universe};
use bullscan_core::pattern::PatternVariant;
use bullscan_core::scan::scan_offset;

use crate::aggregate::{summarize_offset, OffsetOutcome, OffsetRunStats, PassTotals};
use crate::config::{ConfigError, DenominatorPolicy, RunConfig};

#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("empty universe: no symbol has a loaded history")]
    EmptyUniverse,
}

/// Callbacks fired while a run progresses.
pub trait ScanProgress {
    /// Called after each offset is scanned and summarized.
    fn on_offset(&self, outcome: &OffsetOutcome);

    /// Called once a variant's pass over all offsets completes.
    fn on_pass_complete(&self, pass: &PassSummary);
}

/// Results of scanning every offset for one variant.
#[derive(Debug, Clone, PartialEq)]
pub struct PassSummary {
    pub variant: PatternVariant,
    /// In scan order (oldest offset first).
    pub offsets: Vec<OffsetOutcome>,
    pub totals: PassTotals,
    pub denominator: DenominatorPolicy,
    pub setback_mean: Option<f64>,
    pub attack_mean: Option<f64>,
}

impl PassSummary {
    pub fn stats(&self) -> impl Iterator<Item = &OffsetRunStats> {
        self.offsets.iter().map(|o| &o.stats)
    }

    pub fn event_count(&self) -> usize {
        self.stats().map(|s| s.event_count).sum()
    }
}

/// Compact, serializable form of a pass for logs and exports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassRecord {
    pub variant: PatternVariant,
    pub holdout_days: usize,
    pub offsets_scanned: usize,
    pub offsets_with_events: usize,
    pub events: usize,
    pub setback_mean: Option<f64>,
    pub attack_mean: Option<f64>,
}

/// Results of a full run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub dataset_hash: String,
    pub holdout_days: usize,
    pub symbols: usize,
    pub passes: Vec<PassSummary>,
}

impl RunSummary {
    pub fn records(&self) -> Vec<PassRecord> {
        self.passes
            .iter()
            .map(|p| PassRecord {
                variant: p.variant,
                holdout_days: self.holdout_days,
                offsets_scanned: p.totals.offsets_scanned,
                offsets_with_events: p.totals.offsets_with_events,
                events: p.event_count(),
                setback_mean: p.setback_mean,
                attack_mean: p.attack_mean,
            })
            .collect()
    }
}

/// Scan all offsets for one variant.
pub fn run_pass(
    universe: &Universe,
    store: &SeriesStore,
    variant: PatternVariant,
    config: &RunConfig,
    progress: Option<&dyn ScanProgress>,
) -> PassSummary {
    let scan_config = config.scan_config();
    let slice_size = config.aggregate.slice_size;

    let (totals, offsets) = config.offsets().fold(
        (PassTotals::default(), Vec::new()),
        |(totals, mut offsets), offset| {
            let events = scan_offset(universe, store, variant, offset, &scan_config);
            let outcome = summarize_offset(variant, offset, events, slice_size);
            if let Some(p) = progress {
                p.on_offset(&outcome);
            }
            let totals = totals.add(&outcome.stats);
            offsets.push(outcome);
            (totals, offsets)
        },
    );

    let denominator = config.aggregate.denominator;
    let pass = PassSummary {
        variant,
        offsets,
        totals,
        denominator,
        setback_mean: totals.setback_mean(denominator),
        attack_mean: totals.attack_mean(denominator),
    };
    info!(
        %variant,
        offsets = pass.totals.offsets_scanned,
        with_events = pass.totals.offsets_with_events,
        events = pass.event_count(),
        "pass complete"
    );
    if let Some(p) = progress {
        p.on_pass_complete(&pass);
    }
    pass
}

/// Run every configured variant over the loaded universe.
pub fn run_scan(
    universe: &Universe,
    store: &SeriesStore,
    dataset_hash: &str,
    config: &RunConfig,
    progress: Option<&dyn ScanProgress>,
) -> Result<RunSummary, RunError> {
    config.validate()?;
    if universe.is_empty() {
        return Err(RunError::EmptyUniverse);
    }

    info!(
        symbols = universe.len(),
        max_offset = config.scan.max_offset,
        min_offset = config.scan.min_offset,
        holdout_days = config.scan.holdout_days,
        "starting scan"
    );
    let passes = config
        .scan
        .variants
        .iter()
        .map(|&variant| run_pass(universe, store, variant, config, progress))
        .collect();

    Ok(RunSummary {
        dataset_hash: dataset_hash.to_string(),
        holdout_days: config.scan.holdout_days,
        symbols: universe.len(),
        passes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bullscan_core::data::UniverseEntry;
    use bullscan_core::domain::{PriceRecord, SymbolSeries};
    use chrono::NaiveDate;
    use std::cell::RefCell;

    fn series_from_closes(symbol: &str, closes: &[f64]) -> SymbolSeries {
        let base = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let records = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| {
                let prev = if i == 0 { close } else { closes[i - 1] };
                PriceRecord {
                    symbol: symbol.to_string(),
                    name: symbol.to_string(),
                    date: base + chrono::Duration::days(i as i64),
                    open: prev,
                    close,
                    pct_change: (close - prev) / prev * 100.0,
                }
            })
            .collect();
        SymbolSeries::new(symbol, symbol, records)
    }

    fn sawtooth(len: usize, cycle: usize) -> Vec<f64> {
        let mut price = 50.0;
        (0..len)
            .map(|i| {
                price += if i % cycle >= cycle - 3 { -0.3 } else { 1.2 };
                price
            })
            .collect()
    }

    fn fixture() -> (Universe, SeriesStore) {
        let store: SeriesStore = vec![
            series_from_closes("AAA", &sawtooth(150, 7)),
            series_from_closes("BBB", &sawtooth(150, 8)),
        ]
        .into_iter()
        .collect();
        let universe = Universe::new(vec![UniverseEntry::new("AAA", "AAA"), UniverseEntry::new("BBB", "BBB")]);
        (universe, store)
    }

    #[derive(Default)]
    struct Recorder {
        offsets: RefCell<Vec<(PatternVariant, usize)>>,
        passes: RefCell<Vec<PatternVariant>>,
    }

    impl ScanProgress for Recorder {
        fn on_offset(&self, outcome: &OffsetOutcome) {
            self.offsets.borrow_mut().push((outcome.stats.variant, outcome.stats.offset));
        }

        fn on_pass_complete(&self, pass: &PassSummary) {
            self.passes.borrow_mut().push(pass.variant);
        }
    }

    #[test]
    fn offsets_scanned_oldest_first_per_variant() {
        let (universe, store) = fixture();
        let mut config = RunConfig::default();
        config.scan.max_offset = 2;
        let recorder = Recorder::default();

        let summary = run_scan(&universe, &store, "hash", &config, Some(&recorder)).unwrap();
        assert_eq!(summary.passes.len(), 2);
        assert_eq!(
            *recorder.offsets.borrow(),
            vec![
                (PatternVariant::ThreeDaySetback, 2),
                (PatternVariant::ThreeDaySetback, 1),
                (PatternVariant::ThreeDaySetback, 0),
                (PatternVariant::TwoDaySetback, 2),
                (PatternVariant::TwoDaySetback, 1),
                (PatternVariant::TwoDaySetback, 0),
            ]
        );
        assert_eq!(
            *recorder.passes.borrow(),
            vec![PatternVariant::ThreeDaySetback, PatternVariant::TwoDaySetback]
        );
    }

    #[test]
    fn pass_totals_match_offset_stats() {
        let (universe, store) = fixture();
        let config = RunConfig::default();
        let summary = run_scan(&universe, &store, "hash", &config, None).unwrap();

        for pass in &summary.passes {
            let setback: f64 = pass.stats().map(|s| s.setback_sum).sum();
            assert!((pass.totals.setback_total - setback).abs() < 1e-9);
            assert_eq!(pass.totals.offsets_scanned, 41);
            let with_events = pass.stats().filter(|s| s.event_count > 0).count();
            assert_eq!(pass.totals.offsets_with_events, with_events);
        }
        assert!(summary.passes[0].event_count() > 0);
    }

    #[test]
    fn run_is_deterministic() {
        let (universe, store) = fixture();
        let config = RunConfig::default();
        let a = run_scan(&universe, &store, "h", &config, None).unwrap();
        let b = run_scan(&universe, &store, "h", &config, None).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let (universe, store) = fixture();
        let mut config = RunConfig::default();
        config.scan.holdout_days = 3;
        assert!(matches!(
            run_scan(&universe, &store, "h", &config, None),
            Err(RunError::Config(_))
        ));
    }

    #[test]
    fn empty_universe_is_rejected() {
        let store = SeriesStore::new();
        let result = run_scan(&Universe::default(), &store, "h", &RunConfig::default(), None);
        assert!(matches!(result, Err(RunError::EmptyUniverse)));
    }

    #[test]
    fn records_carry_pass_means() {
        let (universe, store) = fixture();
        let summary = run_scan(&universe, &store, "h", &RunConfig::default(), None).unwrap();
        let records = summary.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].variant, PatternVariant::ThreeDaySetback);
        assert_eq!(records[0].setback_mean, summary.passes[0].setback_mean);
        assert_eq!(records[0].holdout_days, 1);
    }
}
