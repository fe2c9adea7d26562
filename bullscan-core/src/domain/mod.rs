//! Domain types for Bullscan

pub mod event;
pub mod record;
pub mod series;

pub use event::{QualifyingEvent, TrendDirection, TrendStrength};
pub use record::{PriceRecord, RawRecord, RecordError};
pub use series::{newest_first_closes, oldest_first_closes, NewestFirst, OldestFirst, SymbolSeries};
