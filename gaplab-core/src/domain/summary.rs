//! Descriptive statistics over a run's trades.

use serde::{Deserialize, Serialize};

use super::trade::Trade;

/// Aggregate return statistics for one simulation run. All `_pct` fields are
/// percentages (`return * 100`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub total_trades: usize,
    /// Sum of per-trade `profit_pct`.
    pub total_profit_pct: f64,
    pub mean_return_pct: f64,
    /// Sample standard deviation (n - 1). `None` with a single trade.
    pub std_return_pct: Option<f64>,
    pub min_return_pct: f64,
    pub max_return_pct: f64,
}

impl Summary {
    /// Summarize a trade list. Returns `None` for an empty list.
    pub fn from_trades(trades: &[Trade]) -> Option<Self> {
        if trades.is_empty() {
            return None;
        }

        let n = trades.len();
        let returns: Vec<f64> = trades.iter().map(|t| t.ret).collect();
        let mean = returns.iter().sum::<f64>() / n as f64;

        let std = if n > 1 {
            let var = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
            Some(var.sqrt() * 100.0)
        } else {
            None
        };

        let min = returns.iter().copied().fold(f64::INFINITY, f64::min);
        let max = returns.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Some(Self {
            total_trades: n,
            total_profit_pct: trades.iter().map(|t| t.profit_pct).sum(),
            mean_return_pct: mean * 100.0,
            std_return_pct: std,
            min_return_pct: min * 100.0,
            max_return_pct: max * 100.0,
        })
    }
}
