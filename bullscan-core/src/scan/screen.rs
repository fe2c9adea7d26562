//! Bullish-alignment screen over the latest data.

use serde::{Deserialize, Serialize};

use crate::data::{SeriesStore, Universe};
use crate::domain::newest_first_closes;
use crate::indicators::{compute_alignment, AlignmentConfig};

/// A symbol currently in bullish alignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignedSymbol {
    pub symbol: String,
    pub name: String,
    pub short_ma: f64,
    pub mid_ma: f64,
    pub long_ma: f64,
    pub last_close: f64,
}

/// List universe symbols whose full history is bullishly aligned, in universe order.
pub fn screen_universe(universe: &Universe, store: &SeriesStore, config: &AlignmentConfig) -> Vec<AlignedSymbol> {
    universe
        .entries()
        .iter()
        .filter_map(|entry| {
            let series = store.get(&entry.symbol)?;
            let closes = newest_first_closes(series.records());
            let aligned = compute_alignment(&closes, config)?;
            Some(AlignedSymbol {
                symbol: entry.symbol.clone(),
                name: entry.name.clone(),
                short_ma: aligned.short_ma,
                mid_ma: aligned.mid_ma,
                long_ma: aligned.long_ma,
                last_close: aligned.closes[0],
            })
        })
        .collect()
}
