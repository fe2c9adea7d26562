//! Serializable run configuration.
//!
//! Loaded from TOML; every section and field has a default, so an empty file
//! is a valid config. CLI flags override individual fields after loading.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use bullscan_core::indicators::AlignmentConfig;
use bullscan_core::pattern::{DayWindow, PatternVariant, TrendGate};
use bullscan_core::scan::ScanConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// How the cross-offset means pick their denominator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenominatorPolicy {
    /// Only offsets that produced at least one event count.
    #[default]
    OffsetsWithEvents,
    /// Every scanned offset counts, including empty ones.
    AllOffsets,
}

/// Complete configuration for a scan run.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub alignment: AlignmentConfig,
    pub scan: ScanSection,
    pub trend_gate: TrendGate,
    pub aggregate: AggregateSection,
    pub output: OutputSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanSection {
    /// Oldest offset scanned (days back from the latest record).
    pub max_offset: usize,
    /// Newest offset scanned.
    pub min_offset: usize,
    pub holdout_days: usize,
    pub window_len: usize,
    pub change_window: usize,
    pub variants: Vec<PatternVariant>,
}

impl Default for ScanSection {
    fn default() -> Self {
        Self {
            max_offset: 40,
            min_offset: 0,
            holdout_days: 1,
            window_len: 30,
            change_window: 5,
            variants: PatternVariant::ALL.to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregateSection {
    /// Events in each of the setback and attack slices.
    pub slice_size: usize,
    pub denominator: DenominatorPolicy,
}

impl Default for AggregateSection {
    fn default() -> Self {
        Self {
            slice_size: 4,
            denominator: DenominatorPolicy::default(),
        }
    }
}

/// Optional result logs. Relative paths resolve against the working directory.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSection {
    pub verbose_log: Option<PathBuf>,
    pub summary_log: Option<PathBuf>,
}

impl RunConfig {
    /// Load a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Serialize the config to TOML.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Reject configurations the scanner cannot run meaningfully.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let a = &self.alignment;
        if a.short == 0 || a.mid == 0 || a.long == 0 {
            return Err(ConfigError::Invalid("alignment periods must be >= 1".into()));
        }
        if !a.is_ordered() {
            return Err(ConfigError::Invalid(format!(
                "alignment periods must increase (short < mid < long), got {}/{}/{}",
                a.short, a.mid, a.long
            )));
        }
        if self.trend_gate.period == 0 {
            return Err(ConfigError::Invalid("trend_gate.period must be >= 1".into()));
        }

        let s = &self.scan;
        if s.holdout_days > 1 {
            return Err(ConfigError::Invalid(format!(
                "scan.holdout_days must be 0 or 1, got {}",
                s.holdout_days
            )));
        }
        if s.min_offset > s.max_offset {
            return Err(ConfigError::Invalid(format!(
                "scan.min_offset ({}) is greater than scan.max_offset ({})",
                s.min_offset, s.max_offset
            )));
        }
        if s.window_len < DayWindow::required_len(s.holdout_days) {
            return Err(ConfigError::Invalid(format!(
                "scan.window_len must be at least {}",
                DayWindow::required_len(s.holdout_days)
            )));
        }
        if s.change_window == 0 {
            return Err(ConfigError::Invalid("scan.change_window must be >= 1".into()));
        }
        if s.variants.is_empty() {
            return Err(ConfigError::Invalid("scan.variants must name at least one variant".into()));
        }
        if self.aggregate.slice_size == 0 {
            return Err(ConfigError::Invalid("aggregate.slice_size must be >= 1".into()));
        }
        Ok(())
    }

    /// Offsets in scan order: oldest first, ending at `min_offset`.
    pub fn offsets(&self) -> impl Iterator<Item = usize> {
        (self.scan.min_offset..=self.scan.max_offset).rev()
    }

    pub fn scan_config(&self) -> ScanConfig {
        ScanConfig {
            alignment: self.alignment,
            trend_gate: self.trend_gate,
            holdout_days: self.scan.holdout_days,
            window_len: self.scan.window_len,
            change_window: self.scan.change_window,
        }
    }
}
