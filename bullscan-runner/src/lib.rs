//! Bullscan Runner: run orchestration on top of `bullscan-core`.
//!
//! This crate provides:
//! - TOML run configuration with validation
//! - Universe and history loading with a dataset fingerprint
//! - The offset fold: one pass per variant, one scan per offset
//! - Per-offset and cross-offset aggregation
//! - Console lines, result logs and CSV exports

pub mod aggregate;
pub mod config;
pub mod data_loader;
pub mod reporting;
pub mod runner;

pub use aggregate::{average, summarize_offset, OffsetOutcome, OffsetRunStats, PassTotals, ReturnSplit};
pub use config::{ConfigError, DenominatorPolicy, RunConfig};
pub use data_loader::{load_data, load_for_universe, LoadError, LoadReport, LoadedData};
pub use reporting::{ConsoleProgress, ReportError};
pub use runner::{run_pass, run_scan, PassRecord, PassSummary, RunError, RunSummary, ScanProgress};
