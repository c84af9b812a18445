//! Data provider trait and structured error types.
//!
//! The DataProvider trait abstracts over data sources (Yahoo Finance, CSV import,
//! synthetic bars) so the session can swap implementations and tests can mock them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Raw daily bar from a data provider (before `prev_close` is derived).
///
/// Missing prices are NaN; cleaning happens in `BarSeries::from_raw`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawBar {
    pub date: NaiveDate,
    pub open: f64,
    pub close: f64,
}

/// Structured error types for data operations.
///
/// Messages name the symbol and range so they can be shown to the user as-is.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("no data found for ticker '{symbol}' between {start} and {end}")]
    NoData {
        symbol: String,
        start: NaiveDate,
        end: NaiveDate,
    },

    #[error("expected field '{field}' not found in data for ticker '{symbol}' between {start} and {end}")]
    MissingField {
        field: String,
        symbol: String,
        start: NaiveDate,
        end: NaiveDate,
    },

    #[error("invalid date range: start {start} is not before end {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("rate limited by provider (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("csv error: {0}")]
    Csv(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("data error: {0}")]
    Other(String),
}

impl DataError {
    pub fn no_data(symbol: &str, start: NaiveDate, end: NaiveDate) -> Self {
        Self::NoData {
            symbol: symbol.to_string(),
            start,
            end,
        }
    }

    pub fn missing_field(field: &str, symbol: &str, start: NaiveDate, end: NaiveDate) -> Self {
        Self::MissingField {
            field: field.to_string(),
            symbol: symbol.to_string(),
            start,
            end,
        }
    }
}

/// Result of a successful data fetch for a single symbol.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub symbol: String,
    pub bars: Vec<RawBar>,
    pub source: DataSource,
}

/// Where the data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    YahooFinance,
    CsvImport,
    Synthetic,
}

impl std::fmt::Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::YahooFinance => "yahoo",
            Self::CsvImport => "csv",
            Self::Synthetic => "synthetic",
        };
        f.write_str(name)
    }
}

/// Trait for data providers (Yahoo Finance, CSV import, synthetic).
///
/// Implementations return rows in ascending date order covering
/// `start` (inclusive) to `end` (exclusive).
pub trait DataProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch daily bars for a symbol over a date range.
    fn fetch(&self, symbol: &str, start: NaiveDate, end: NaiveDate)
        -> Result<FetchResult, DataError>;

    /// Check if the provider is currently available.
    fn is_available(&self) -> bool {
        true
    }
}

/// Reject ranges that cannot contain a trading day.
pub fn check_range(start: NaiveDate, end: NaiveDate) -> Result<(), DataError> {
    if start >= end {
        return Err(DataError::InvalidRange { start, end });
    }
    Ok(())
}
