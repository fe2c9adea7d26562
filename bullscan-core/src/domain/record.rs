//! PriceRecord: one trading day for one symbol.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Daily record for a single symbol.
///
/// `pct_change` is the exchange-reported day-over-day change in percent
/// (e.g. -1.25 means the close was 1.25% below the previous close).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    pub symbol: String,
    pub name: String,
    pub date: NaiveDate,
    pub open: f64,
    pub close: f64,
    pub pct_change: f64,
}

impl PriceRecord {
    /// Intraday shrink ratio in percent: `(open - close) / open * 100`.
    ///
    /// Positive when the day closed below its open. `None` when the open is
    /// zero, negative or non-finite.
    pub fn shrink_ratio(&self) -> Option<f64> {
        if !self.open.is_finite() || self.open <= 0.0 || !self.close.is_finite() {
            return None;
        }
        Some((self.open - self.close) / self.open * 100.0)
    }
}

/// Errors converting an on-disk record into a `PriceRecord`.
#[derive(Debug, Error, PartialEq)]
pub enum RecordError {
    #[error("missing field '{0}'")]
    MissingField(&'static str),

    #[error("invalid date '{0}' (expected YYYY-MM-DD)")]
    InvalidDate(String),
}

/// Daily record as stored in the per-symbol JSON files.
///
/// Keys are the localized column names of the upstream export. History
/// exports use `日期`/`开盘`/`收盘`; intraday snapshots use
/// `最新交易日`/`今开`/`最新价`. Either spelling is accepted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRecord {
    #[serde(rename = "日期", default)]
    pub date: Option<String>,
    #[serde(rename = "最新交易日", default)]
    pub trade_date: Option<String>,
    #[serde(rename = "开盘", default)]
    pub open: Option<f64>,
    #[serde(rename = "今开", default)]
    pub open_today: Option<f64>,
    #[serde(rename = "收盘", default)]
    pub close: Option<f64>,
    #[serde(rename = "最新价", default)]
    pub last_price: Option<f64>,
    #[serde(rename = "涨跌幅", default)]
    pub pct_change: Option<f64>,
    #[serde(rename = "股票代码", default)]
    pub symbol: Option<String>,
    #[serde(rename = "股票名称", default)]
    pub name: Option<String>,
}

impl RawRecord {
    /// Convert into a `PriceRecord`, filling identifiers the file omits.
    ///
    /// The snapshot's `最新交易日` wins over `日期` when both are present. A
    /// zero in the primary price column counts as absent, so the snapshot
    /// column is used instead.
    pub fn into_record(self, symbol: &str, name: &str) -> Result<PriceRecord, RecordError> {
        let date_str = self
            .trade_date
            .or(self.date)
            .ok_or(RecordError::MissingField("日期"))?;
        let date = parse_date(&date_str)?;

        let open = non_zero(self.open)
            .or(self.open_today)
            .ok_or(RecordError::MissingField("开盘"))?;
        let close = non_zero(self.close)
            .or(self.last_price)
            .ok_or(RecordError::MissingField("收盘"))?;
        let pct_change = self
            .pct_change
            .ok_or(RecordError::MissingField("涨跌幅"))?;

        Ok(PriceRecord {
            symbol: self.symbol.unwrap_or_else(|| symbol.to_string()),
            name: self.name.unwrap_or_else(|| name.to_string()),
            date,
            open,
            close,
            pct_change,
        })
    }
}

fn non_zero(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v != 0.0)
}

/// Parse `YYYY-MM-DD`, ignoring any trailing time component.
fn parse_date(s: &str) -> Result<NaiveDate, RecordError> {
    let day = s.get(..10).unwrap_or(s);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").map_err(|_| RecordError::InvalidDate(s.to_string()))
}
