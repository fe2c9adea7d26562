//! Bullscan Core: price records, indicators, setback pattern filter, offset scanner.
//!
//! This crate contains the scan engine:
//! - Domain types (price records, direction-tagged sequences, qualifying events)
//! - Moving-average alignment test and slope estimation
//! - Two-variant setback pattern filter with a trend gate
//! - Per-offset backtest scanner and the bullish-alignment screener
//! - JSON loading of universe and per-symbol history files

pub mod data;
pub mod domain;
pub mod indicators;
pub mod pattern;
pub mod scan;
