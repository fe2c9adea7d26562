//! Per-symbol history files and the in-memory series store.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use tracing::debug;

use super::DataError;
use crate::domain::{RawRecord, RecordError, SymbolSeries};

/// Loaded histories keyed by symbol code.
#[derive(Debug, Clone, Default)]
pub struct SeriesStore {
    series: HashMap<String, SymbolSeries>,
}

impl SeriesStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, series: SymbolSeries) {
        self.series.insert(series.symbol().to_string(), series);
    }

    pub fn get(&self, symbol: &str) -> Option<&SymbolSeries> {
        self.series.get(symbol)
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.series.contains_key(symbol)
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Symbol codes in sorted order.
    pub fn symbols(&self) -> Vec<&str> {
        let mut symbols: Vec<&str> = self.series.keys().map(|s| s.as_str()).collect();
        symbols.sort_unstable();
        symbols
    }
}

impl FromIterator<SymbolSeries> for SeriesStore {
    fn from_iter<I: IntoIterator<Item = SymbolSeries>>(iter: I) -> Self {
        let mut store = SeriesStore::new();
        for series in iter {
            store.insert(series);
        }
        store
    }
}

/// Parse a history file's JSON array into a series.
///
/// A record missing a required field (a suspended day has no `涨跌幅`) is
/// skipped; an unparseable date fails the whole file.
pub fn parse_series_json(content: &str, symbol: &str, name: &str) -> Result<SymbolSeries, DataError> {
    let raw: Vec<RawRecord> = serde_json::from_str(content).map_err(|source| DataError::Json {
        path: PathBuf::from(format!("{symbol}.json")),
        source,
    })?;
    let mut records = Vec::with_capacity(raw.len());
    for (index, r) in raw.into_iter().enumerate() {
        match r.into_record(symbol, name) {
            Ok(record) => records.push(record),
            Err(RecordError::MissingField(field)) => {
                debug!(symbol, index, field, "record missing a field, skipping");
            }
            Err(source) => {
                return Err(DataError::Record {
                    symbol: symbol.to_string(),
                    index,
                    source,
                })
            }
        }
    }
    Ok(SymbolSeries::new(symbol, name, records))
}

/// Read and parse one history file.
pub fn load_series_file(path: &Path, symbol: &str, name: &str) -> Result<SymbolSeries, DataError> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(DataError::MissingSymbol {
                symbol: symbol.to_string(),
            })
        }
        Err(source) => {
            return Err(DataError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    parse_series_json(&content, symbol, name).map_err(|e| match e {
        DataError::Json { source, .. } => DataError::Json {
            path: path.to_path_buf(),
            source,
        },
        other => other,
    })
}

/// Find all `*.json` files under `dir`, recursively, keyed by file stem.
///
/// Directories are walked in sorted order; when two files share a stem the
/// first one found wins.
pub fn list_symbol_files(dir: &Path) -> Result<BTreeMap<String, PathBuf>, DataError> {
    let mut found = BTreeMap::new();
    walk(dir, &mut found)?;
    Ok(found)
}

fn walk(dir: &Path, found: &mut BTreeMap<String, PathBuf>) -> Result<(), DataError> {
    let io_err = |source| DataError::Io {
        path: dir.to_path_buf(),
        source,
    };
    let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)
        .map_err(io_err)?
        .map(|e| e.map(|e| e.path()))
        .collect::<Result<_, _>>()
        .map_err(io_err)?;
    entries.sort();

    for path in entries {
        if path.is_dir() {
            walk(&path, found)?;
        } else if path.extension().is_some_and(|ext| ext == "json") {
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                found.entry(stem.to_string()).or_insert(path);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const HISTORY: &str = r#"[
        {"日期":"2024-01-03","开盘":10.1,"收盘":10.3,"涨跌幅":1.98},
        {"日期":"2024-01-02","开盘":10.0,"收盘":10.1,"涨跌幅":1.0}
    ]"#;

    #[test]
    fn parse_sorts_records() {
        let series = parse_series_json(HISTORY, "000001", "平安银行").unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.records()[0].close, 10.1);
        assert_eq!(series.records()[1].close, 10.3);
        assert_eq!(series.name(), "平安银行");
    }

    #[test]
    fn record_without_change_is_skipped() {
        let json = r#"[
            {"日期":"2024-01-02","开盘":10.0,"收盘":10.1,"涨跌幅":1.0},
            {"日期":"2024-01-03","开盘":10.1,"收盘":10.1,"涨跌幅":null},
            {"日期":"2024-01-04","开盘":10.1,"收盘":10.2,"涨跌幅":0.99}
        ]"#;
        let series = parse_series_json(json, "X", "X").unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.records()[1].close, 10.2);
    }

    #[test]
    fn bad_date_reports_index() {
        let json = r#"[{"日期":"2024-01-02","开盘":10.0,"收盘":10.1,"涨跌幅":1.0},{"日期":"03/01/2024","开盘":10.1,"收盘":10.1,"涨跌幅":0.0}]"#;
        let err = parse_series_json(json, "X", "X").unwrap_err();
        assert!(matches!(err, DataError::Record { index: 1, .. }));
    }

    #[test]
    fn store_lookup() {
        let series = parse_series_json(HISTORY, "000001", "平安银行").unwrap();
        let store: SeriesStore = vec![series].into_iter().collect();
        assert!(store.contains("000001"));
        assert!(store.get("600519").is_none());
        assert_eq!(store.symbols(), vec!["000001"]);
    }

    #[test]
    fn listing_and_loading_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("sz");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join("600519.json"), HISTORY).unwrap();
        std::fs::write(nested.join("000001.json"), HISTORY).unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let files = list_symbol_files(dir.path()).unwrap();
        assert_eq!(files.keys().cloned().collect::<Vec<_>>(), vec!["000001", "600519"]);

        let series = load_series_file(&files["000001"], "000001", "平安银行").unwrap();
        assert_eq!(series.len(), 2);

        let missing = load_series_file(&dir.path().join("300750.json"), "300750", "");
        assert!(matches!(missing, Err(DataError::MissingSymbol { .. })));
    }

    #[test]
    fn malformed_file_names_its_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("000001.json");
        std::fs::write(&path, "{ not json").unwrap();
        match load_series_file(&path, "000001", "") {
            Err(DataError::Json { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected Json error, got {other:?}"),
        }
    }
}
