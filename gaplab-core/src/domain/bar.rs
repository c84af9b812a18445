//! Bar: one trading day's open/close with the prior day's close.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::data::RawBar;

/// One trading day for a single symbol.
///
/// `prev_close` is always the close of the previous trading day in the same
/// series, so the first day of a series never becomes a `Bar`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: f64,
    pub close: f64,
    pub prev_close: f64,
}

impl Bar {
    /// True when all three prices are finite and strictly positive.
    pub fn is_sane(&self) -> bool {
        [self.open, self.close, self.prev_close]
            .iter()
            .all(|p| p.is_finite() && *p > 0.0)
    }
}

/// Errors building a `BarSeries` from provider rows.
#[derive(Debug, Error, PartialEq)]
pub enum SeriesError {
    #[error("no usable bars for '{symbol}' after cleaning")]
    Empty { symbol: String },

    #[error("bars for '{symbol}' are not in ascending date order at {date}")]
    OutOfOrder { symbol: String, date: NaiveDate },
}

/// Date-ordered, duplicate-free list of bars for one symbol.
///
/// Built once from the provider response and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarSeries {
    symbol: String,
    bars: Vec<Bar>,
}

impl BarSeries {
    /// Build a series from raw provider rows.
    ///
    /// Derives `prev_close` from the preceding row, then drops the first row
    /// and any row with a missing or non-positive price.
    pub fn from_raw(symbol: &str, raw: &[RawBar]) -> Result<Self, SeriesError> {
        if raw.is_empty() {
            return Err(SeriesError::Empty {
                symbol: symbol.to_string(),
            });
        }

        if let Some(pair) = raw.windows(2).find(|w| w[1].date <= w[0].date) {
            return Err(SeriesError::OutOfOrder {
                symbol: symbol.to_string(),
                date: pair[1].date,
            });
        }

        let bars: Vec<Bar> = raw
            .windows(2)
            .map(|w| Bar {
                date: w[1].date,
                open: w[1].open,
                close: w[1].close,
                prev_close: w[0].close,
            })
            .filter(Bar::is_sane)
            .collect();

        let dropped = raw.len() - bars.len();
        if dropped > 1 {
            warn!(symbol, dropped = dropped - 1, "dropped incomplete bars");
        }
        debug!(symbol, raw = raw.len(), kept = bars.len(), "built bar series");

        if bars.is_empty() {
            return Err(SeriesError::Empty {
                symbol: symbol.to_string(),
            });
        }

        Ok(Self {
            symbol: symbol.to_string(),
            bars,
        })
    }

    /// Build a series from already-cleaned bars (tests, benchmarks).
    ///
    /// Bars are sorted by date; later duplicates of a date are discarded.
    pub fn from_bars(symbol: &str, mut bars: Vec<Bar>) -> Self {
        bars.sort_by_key(|b| b.date);
        bars.dedup_by_key(|b| b.date);
        Self {
            symbol: symbol.to_string(),
            bars,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// First and last dates covered.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((self.bars.first()?.date, self.bars.last()?.date))
    }
}
