//! Data layer: universe files, per-symbol history files, in-memory store.
//!
//! Files are JSON exports with localized column names. Each symbol file is
//! parsed once into a `SymbolSeries`; the scanner slices those series per
//! offset and never touches the file system.

pub mod store;
pub mod universe;

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::RecordError;

pub use store::{list_symbol_files, load_series_file, parse_series_json, SeriesStore};
pub use universe::{Universe, UniverseEntry};

/// Structured error types for data operations.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("record {index} of {symbol}: {source}")]
    Record {
        symbol: String,
        index: usize,
        #[source]
        source: RecordError,
    },

    #[error("no history file for symbol '{symbol}'")]
    MissingSymbol { symbol: String },
}
