//! Universe and history loading for the runner.
//!
//! The universe snapshot lists every symbol that traded on the snapshot day.
//! It is restricted to the symbols that have a history file under the data
//! directory. A history file that cannot be parsed drops its symbol from the
//! run with a warning; it never aborts the whole load.

use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info, warn};

use bullscan_core::data::{list_symbol_files, load_series_file, DataError, SeriesStore, Universe};

/// Errors from the data loading layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("load universe: {0}")]
    Universe(#[source] DataError),

    #[error("scan data directory: {0}")]
    DataDir(#[source] DataError),
}

/// What happened to each universe symbol during loading.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    /// Symbols in the snapshot before restriction.
    pub listed: usize,
    /// Symbols with a parsed history.
    pub loaded: usize,
    /// Snapshot symbols with no history file.
    pub missing: Vec<String>,
    /// Symbols whose history file failed to parse, with the reason.
    pub malformed: Vec<(String, String)>,
}

/// Result of loading, ready to scan.
#[derive(Debug)]
pub struct LoadedData {
    /// Snapshot entries that have a loaded history, in snapshot order.
    pub universe: Universe,
    pub store: SeriesStore,
    pub report: LoadReport,
    /// BLAKE3 fingerprint over all loaded records.
    pub dataset_hash: String,
}

/// Load the universe snapshot at `universe_path` and every matching history
/// file under `data_dir`.
pub fn load_data(universe_path: &Path, data_dir: &Path) -> Result<LoadedData, LoadError> {
    let universe = Universe::from_file(universe_path).map_err(LoadError::Universe)?;
    load_for_universe(universe, data_dir)
}

/// Load histories for an already parsed universe.
pub fn load_for_universe(universe: Universe, data_dir: &Path) -> Result<LoadedData, LoadError> {
    let files = list_symbol_files(data_dir).map_err(LoadError::DataDir)?;
    let available: HashSet<String> = files.keys().cloned().collect();
    let (listed_with_files, missing) = universe.restrict_to(&available);

    let mut report = LoadReport {
        listed: universe.len(),
        missing,
        ..LoadReport::default()
    };
    for symbol in &report.missing {
        debug!(%symbol, "no history file");
    }

    let mut store = SeriesStore::new();
    for entry in listed_with_files.entries() {
        let Some(path) = files.get(&entry.symbol) else {
            continue;
        };
        match load_series_file(path, &entry.symbol, &entry.name) {
            Ok(series) => store.insert(series),
            Err(e) => {
                warn!(symbol = %entry.symbol, path = %path.display(), error = %e, "skipping malformed history");
                report.malformed.push((entry.symbol.clone(), e.to_string()));
            }
        }
    }

    let loaded: HashSet<String> = store.symbols().into_iter().map(str::to_string).collect();
    let (universe, _) = listed_with_files.restrict_to(&loaded);
    report.loaded = store.len();

    let dataset_hash = compute_dataset_hash(&store);
    info!(
        listed = report.listed,
        loaded = report.loaded,
        missing = report.missing.len(),
        malformed = report.malformed.len(),
        "data loaded"
    );

    Ok(LoadedData {
        universe,
        store,
        report,
        dataset_hash,
    })
}

/// Deterministic BLAKE3 hash over every record, in sorted symbol order.
fn compute_dataset_hash(store: &SeriesStore) -> String {
    let mut hasher = blake3::Hasher::new();
    for symbol in store.symbols() {
        hasher.update(symbol.as_bytes());
        if let Some(series) = store.get(symbol) {
            for r in series.records() {
                hasher.update(r.date.to_string().as_bytes());
                hasher.update(&r.open.to_le_bytes());
                hasher.update(&r.close.to_le_bytes());
                hasher.update(&r.pct_change.to_le_bytes());
            }
        }
    }
    hasher.finalize().to_hex().to_string()
}
