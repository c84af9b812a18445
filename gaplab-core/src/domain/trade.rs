//! Sampled days and the synthetic intraday trades taken on gap-up days.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::bar::Bar;

/// Fraction of the open→close move captured by the exit.
pub const EXIT_FRACTION: f64 = 0.5;

/// A bar drawn by the sampler, tagged with whether it gapped up.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SampledDay {
    pub bar: Bar,
    pub gap_up: bool,
}

impl SampledDay {
    /// Gap-up when the open exceeds the prior close by more than `threshold`.
    pub fn classify(bar: Bar, threshold: f64) -> Self {
        Self {
            bar,
            gap_up: bar.open > bar.prev_close + threshold,
        }
    }
}

/// A one-day position: entered at the open, exited halfway to the close.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub date: NaiveDate,
    pub open: f64,
    pub close: f64,
    pub exit_price: f64,
    /// Fractional return, `exit_price / open - 1`.
    pub ret: f64,
    /// `ret` in percent.
    pub profit_pct: f64,
}

impl Trade {
    pub fn from_bar(bar: &Bar) -> Self {
        let exit_price = bar.open + EXIT_FRACTION * (bar.close - bar.open);
        let ret = exit_price / bar.open - 1.0;
        Self {
            date: bar.date,
            open: bar.open,
            close: bar.close,
            exit_price,
            ret,
            profit_pct: ret * 100.0,
        }
    }
}
