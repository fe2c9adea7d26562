//! Scan universe: the symbols listed in a daily snapshot file.
//!
//! The snapshot is a JSON array of today's quotes; only the code and name
//! columns are read. Order is preserved: it decides the order events are
//! collected in, which breaks ties when events are ranked.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use super::DataError;

/// One symbol of the universe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniverseEntry {
    #[serde(rename = "股票代码", alias = "symbol")]
    pub symbol: String,
    #[serde(rename = "股票名称", alias = "name", default)]
    pub name: String,
}

impl UniverseEntry {
    pub fn new(symbol: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Universe {
    entries: Vec<UniverseEntry>,
}

impl Universe {
    pub fn new(entries: Vec<UniverseEntry>) -> Self {
        Self { entries }
    }

    /// Load a universe from a daily snapshot file.
    pub fn from_file(path: &Path) -> Result<Self, DataError> {
        let content = std::fs::read_to_string(path).map_err(|source| DataError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content).map_err(|source| DataError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse a universe from a JSON array. Unknown columns are ignored.
    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        let entries: Vec<UniverseEntry> = serde_json::from_str(content)?;
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[UniverseEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keep only the entries whose code is in `available`, preserving order.
    ///
    /// Returns the retained universe and the codes that were dropped.
    pub fn restrict_to(&self, available: &HashSet<String>) -> (Universe, Vec<String>) {
        let mut kept = Vec::new();
        let mut missing = Vec::new();
        for entry in &self.entries {
            if available.contains(&entry.symbol) {
                kept.push(entry.clone());
            } else {
                missing.push(entry.symbol.clone());
            }
        }
        (Universe::new(kept), missing)
    }
}
