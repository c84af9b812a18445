//! Synthetic bars for offline runs and tests.
//!
//! A random walk from 100.0 seeded by the BLAKE3 hash of the symbol, so the
//! same symbol always produces the same bars. Opens drift randomly away from
//! the prior close, which gives the gap rule something to find. These are
//! clearly fake and tagged `DataSource::Synthetic`.

use chrono::{Datelike, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::provider::{check_range, DataError, DataProvider, DataSource, FetchResult, RawBar};

#[derive(Debug, Default, Clone, Copy)]
pub struct SyntheticProvider;

impl SyntheticProvider {
    pub fn new() -> Self {
        Self
    }
}

/// Generate weekday bars in `[start, end)`.
pub fn generate_synthetic_bars(symbol: &str, start: NaiveDate, end: NaiveDate) -> Vec<RawBar> {
    let seed: [u8; 32] = *blake3::hash(symbol.as_bytes()).as_bytes();
    let mut rng = StdRng::from_seed(seed);

    let mut bars = Vec::new();
    let mut prev_close = 100.0_f64;
    let mut current = start;

    while current < end {
        if matches!(current.weekday(), Weekday::Sat | Weekday::Sun) {
            current += chrono::Duration::days(1);
            continue;
        }

        let overnight: f64 = rng.gen_range(-0.01..0.01);
        let intraday: f64 = rng.gen_range(-0.02..0.02);
        let open = prev_close * (1.0 + overnight);
        let close = open * (1.0 + intraday);

        bars.push(RawBar {
            date: current,
            open,
            close,
        });

        prev_close = close;
        current += chrono::Duration::days(1);
    }

    bars
}

impl DataProvider for SyntheticProvider {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<FetchResult, DataError> {
        check_range(start, end)?;
        let bars = generate_synthetic_bars(symbol, start, end);
        if bars.is_empty() {
            return Err(DataError::no_data(symbol, start, end));
        }
        Ok(FetchResult {
            symbol: symbol.to_string(),
            bars,
            source: DataSource::Synthetic,
        })
    }
}
