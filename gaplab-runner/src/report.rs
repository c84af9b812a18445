//! Plain-text results block printed after each symbol's simulation.

use std::io::{self, Write};

use gaplab_core::data::DataSource;
use gaplab_core::Summary;

use crate::session::SymbolRun;

/// Line printed when a run produced no trades.
pub const NO_TRADES_LINE: &str = "No trades were executed based on the strategy criteria.";

/// Two decimals, or `n/a` for an undefined statistic.
pub fn fmt_stat(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{v:.2}"),
        _ => "n/a".to_string(),
    }
}

/// Write the results block for one symbol.
pub fn write_results(out: &mut dyn Write, run: &SymbolRun) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "--- Simulation Results for {} ---", run.symbol)?;
    if run.source == DataSource::Synthetic {
        writeln!(out, "Data source: synthetic (not real market data)")?;
    }
    writeln!(
        out,
        "Total number of sampled days: {}",
        run.outcome.sample_size()
    )?;

    match &run.outcome.summary {
        Some(summary) => write_summary(out, summary),
        None => writeln!(out, "{NO_TRADES_LINE}"),
    }
}

fn write_summary(out: &mut dyn Write, s: &Summary) -> io::Result<()> {
    writeln!(out, "Number of trades signaled: {}", s.total_trades)?;
    writeln!(out, "Total net profit: {:.2}%", s.total_profit_pct)?;
    writeln!(out, "Return statistics (in %):")?;
    writeln!(out, "  Mean Return (%): {}", fmt_stat(Some(s.mean_return_pct)))?;
    writeln!(out, "  Std Return (%): {}", fmt_stat(s.std_return_pct))?;
    writeln!(out, "  Min Return (%): {}", fmt_stat(Some(s.min_return_pct)))?;
    writeln!(out, "  Max Return (%): {}", fmt_stat(Some(s.max_return_pct)))?;
    Ok(())
}
