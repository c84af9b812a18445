//! Gap-up trade simulation.
//!
//! `simulate` draws a fixed-size sample of days without replacement, marks
//! the days whose open cleared the prior close by more than the threshold,
//! turns those into trades and summarizes their returns. It performs no I/O
//! and is fully determined by its inputs and the generator state.

use rand::seq::index;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::domain::{BarSeries, SampledDay, Summary, Trade};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SimError {
    #[error(
        "insufficient data for '{symbol}': requested a sample of {requested} days but only {available} are available"
    )]
    InsufficientData {
        symbol: String,
        requested: usize,
        available: usize,
    },

    #[error("sample size must be at least 1")]
    ZeroSampleSize,
}

/// Everything one simulation produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationOutcome {
    /// Days in the order they were drawn. Length equals the sample size.
    pub sampled: Vec<SampledDay>,
    /// Trades for gap-up days, in sampled order.
    pub trades: Vec<Trade>,
    /// `None` when no day signaled.
    pub summary: Option<Summary>,
}

impl SimulationOutcome {
    pub fn sample_size(&self) -> usize {
        self.sampled.len()
    }

    pub fn has_trades(&self) -> bool {
        !self.trades.is_empty()
    }
}

/// Run the gap-up strategy over a seeded sample of `series`.
///
/// Fails with `InsufficientData` rather than shrinking the sample when
/// `sample_size` exceeds the series length.
pub fn simulate<R: Rng + ?Sized>(
    series: &BarSeries,
    sample_size: usize,
    threshold: f64,
    rng: &mut R,
) -> Result<SimulationOutcome, SimError> {
    if sample_size == 0 {
        return Err(SimError::ZeroSampleSize);
    }
    if sample_size > series.len() {
        return Err(SimError::InsufficientData {
            symbol: series.symbol().to_string(),
            requested: sample_size,
            available: series.len(),
        });
    }

    let bars = series.bars();
    let sampled: Vec<SampledDay> = index::sample(rng, bars.len(), sample_size)
        .into_iter()
        .map(|i| SampledDay::classify(bars[i], threshold))
        .collect();

    let trades: Vec<Trade> = sampled
        .iter()
        .filter(|day| day.gap_up)
        .map(|day| Trade::from_bar(&day.bar))
        .collect();

    let summary = Summary::from_trades(&trades);

    debug!(
        symbol = series.symbol(),
        sample_size,
        threshold,
        signals = trades.len(),
        "simulation complete"
    );

    Ok(SimulationOutcome {
        sampled,
        trades,
        summary,
    })
}
