//! Offset scanner and bullish-alignment screener.

pub mod config;
pub mod scanner;
pub mod screen;

pub use config::ScanConfig;
pub use scanner::{scan_offset, scan_symbol};
pub use screen::{screen_universe, AlignedSymbol};
