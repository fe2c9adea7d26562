//! Symbol history and direction-tagged sequences.
//!
//! History is stored oldest-first. The alignment engine and the pattern
//! filter read it newest-first (index 0 = most recent day), while the slope
//! estimator reads it oldest-first. The two wrappers below make the direction
//! part of the type so a sequence cannot be handed to the wrong consumer
//! without an explicit `reversed()`.

use std::ops::Deref;

use super::record::PriceRecord;

/// Sequence ordered oldest-first (index 0 = earliest day).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OldestFirst<T>(Vec<T>);

/// Sequence ordered newest-first (index 0 = most recent day).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NewestFirst<T>(Vec<T>);

impl<T> OldestFirst<T> {
    pub fn new(values: Vec<T>) -> Self {
        Self(values)
    }

    /// Flip to newest-first.
    pub fn reversed(mut self) -> NewestFirst<T> {
        self.0.reverse();
        NewestFirst(self.0)
    }
}

impl<T> NewestFirst<T> {
    pub fn new(values: Vec<T>) -> Self {
        Self(values)
    }

    /// Flip to oldest-first.
    pub fn reversed(mut self) -> OldestFirst<T> {
        self.0.reverse();
        OldestFirst(self.0)
    }
}

impl<T: Clone> NewestFirst<T> {
    /// Up to `len` elements starting `skip` days back from the most recent.
    pub fn window(&self, skip: usize, len: usize) -> NewestFirst<T> {
        self.0.iter().skip(skip).take(len).cloned().collect()
    }
}

impl<T> Deref for OldestFirst<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.0
    }
}

impl<T> Deref for NewestFirst<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.0
    }
}

impl<T> From<Vec<T>> for OldestFirst<T> {
    fn from(values: Vec<T>) -> Self {
        Self(values)
    }
}

impl<T> From<Vec<T>> for NewestFirst<T> {
    fn from(values: Vec<T>) -> Self {
        Self(values)
    }
}

impl<T> FromIterator<T> for OldestFirst<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<T> FromIterator<T> for NewestFirst<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Closing prices of an oldest-first record slice, oldest-first.
pub fn oldest_first_closes(records: &[PriceRecord]) -> OldestFirst<f64> {
    records.iter().map(|r| r.close).collect()
}

/// Closing prices of an oldest-first record slice, newest-first.
pub fn newest_first_closes(records: &[PriceRecord]) -> NewestFirst<f64> {
    records.iter().rev().map(|r| r.close).collect()
}

/// Full daily history for one symbol, sorted oldest-first by date.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolSeries {
    symbol: String,
    name: String,
    records: Vec<PriceRecord>,
}

impl SymbolSeries {
    /// Build a series; records are stably sorted by date.
    pub fn new(symbol: impl Into<String>, name: impl Into<String>, mut records: Vec<PriceRecord>) -> Self {
        records.sort_by_key(|r| r.date);
        Self {
            symbol: symbol.into(),
            name: name.into(),
            records,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records, oldest-first.
    pub fn records(&self) -> &[PriceRecord] {
        &self.records
    }

    /// History with the `drop_recent` most recent records removed, oldest-first.
    ///
    /// Dropping more records than exist yields an empty slice.
    pub fn truncated(&self, drop_recent: usize) -> &[PriceRecord] {
        let keep = self.records.len().saturating_sub(drop_recent);
        &self.records[..keep]
    }

    /// Borrowed newest-first view of the full history.
    pub fn newest_first(&self) -> NewestFirst<&PriceRecord> {
        self.records.iter().rev().collect()
    }
}
