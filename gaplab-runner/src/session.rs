//! Session runner: fetch, clean, simulate, report and chart each symbol.
//!
//! A session covers one primary symbol and an optional comparison symbol.
//! Each symbol runs through its own pipeline; a failure is reported and, unless
//! `halt_on_failure` is set, does not stop the other symbol. Both pipelines
//! draw from generators seeded identically, so the k-th sampled day is the
//! same relative draw for both tickers.

use std::io::{self, Write};

use chrono::NaiveDate;
use gaplab_core::data::{DataError, DataProvider, DataSource};
use gaplab_core::{simulate, BarSeries, SeedSource, SeriesError, SimError, SimulationOutcome, Summary};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::render::ChartRenderer;
use crate::report::write_results;

/// Errors from a single symbol's pipeline.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Data(#[from] DataError),
    #[error(transparent)]
    Series(#[from] SeriesError),
    #[error(transparent)]
    Simulation(#[from] SimError),
}

/// Everything a session needs, already resolved from prompts, flags and config.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionRequest {
    pub primary: String,
    pub comparison: Option<String>,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub sample_size: usize,
    pub threshold: f64,
    pub seed: SeedSource,
    pub halt_on_failure: bool,
}

impl SessionRequest {
    /// Symbols in processing order.
    pub fn symbols(&self) -> Vec<&str> {
        std::iter::once(self.primary.as_str())
            .chain(self.comparison.as_deref())
            .collect()
    }
}

/// A completed pipeline for one symbol.
#[derive(Debug, Clone)]
pub struct SymbolRun {
    pub symbol: String,
    pub source: DataSource,
    /// Bars available to the sampler after cleaning.
    pub bar_count: usize,
    pub outcome: SimulationOutcome,
}

/// Outcome of every symbol attempted in a session.
#[derive(Debug, Default)]
pub struct SessionReport {
    pub results: Vec<(String, Result<SymbolRun, RunError>)>,
}

impl SessionReport {
    pub fn any_failed(&self) -> bool {
        self.results.iter().any(|(_, r)| r.is_err())
    }

    pub fn run(&self, symbol: &str) -> Option<&SymbolRun> {
        self.results
            .iter()
            .find(|(s, _)| s == symbol)
            .and_then(|(_, r)| r.as_ref().ok())
    }

    /// Summaries of the successful runs that produced trades, in order.
    pub fn summaries(&self) -> Vec<(&str, &Summary)> {
        self.results
            .iter()
            .filter_map(|(s, r)| {
                let summary = r.as_ref().ok()?.outcome.summary.as_ref()?;
                Some((s.as_str(), summary))
            })
            .collect()
    }
}

/// One-line report for a failed pipeline, naming the symbol and the requested window.
pub fn failure_line(symbol: &str, request: &SessionRequest, err: &RunError) -> String {
    format!(
        "Error for {symbol} ({} to {}): {err}",
        request.start, request.end
    )
}

/// Fetch → clean → simulate for one symbol.
pub fn run_symbol(
    provider: &dyn DataProvider,
    request: &SessionRequest,
    symbol: &str,
) -> Result<SymbolRun, RunError> {
    let fetched = provider.fetch(symbol, request.start, request.end)?;
    info!(
        symbol,
        provider = provider.name(),
        rows = fetched.bars.len(),
        "fetched bars"
    );

    let series = BarSeries::from_raw(&fetched.symbol, &fetched.bars)?;
    if let Some((first, last)) = series.date_range() {
        debug!(symbol, %first, %last, bars = series.len(), "cleaned series");
    }
    let mut rng = request.seed.rng();
    let outcome = simulate(&series, request.sample_size, request.threshold, &mut rng)?;

    info!(
        symbol,
        sampled = outcome.sample_size(),
        trades = outcome.trades.len(),
        "simulated"
    );

    Ok(SymbolRun {
        symbol: symbol.to_string(),
        source: fetched.source,
        bar_count: series.len(),
        outcome,
    })
}

/// Run every symbol of the request, writing results to `out` and charts to `renderer`.
///
/// Only write errors on `out` abort the session; pipeline and chart failures
/// are reported inline.
pub fn run_session(
    request: &SessionRequest,
    provider: &dyn DataProvider,
    renderer: &mut dyn ChartRenderer,
    out: &mut dyn Write,
) -> io::Result<SessionReport> {
    let mut report = SessionReport::default();

    for symbol in request.symbols() {
        match run_symbol(provider, request, symbol) {
            Ok(run) => {
                write_results(out, &run)?;
                if run.outcome.has_trades() {
                    if let Err(e) = renderer.render_histogram(&run.outcome.trades, &run.symbol) {
                        warn!(symbol, error = %e, "histogram failed");
                        writeln!(out, "Could not render chart for {symbol}: {e:#}")?;
                    }
                }
                report.results.push((symbol.to_string(), Ok(run)));
            }
            Err(e) => {
                warn!(symbol, error = %e, "symbol pipeline failed");
                writeln!(out)?;
                writeln!(out, "{}", failure_line(symbol, request, &e))?;
                report.results.push((symbol.to_string(), Err(e)));
                if request.halt_on_failure {
                    break;
                }
            }
        }
    }

    if request.comparison.is_some() {
        if let [(label_a, a), (label_b, b)] = report.summaries().as_slice() {
            if let Err(e) = renderer.render_comparison(a, label_a, b, label_b) {
                warn!(error = %e, "comparison chart failed");
                writeln!(out, "Could not render comparison chart: {e:#}")?;
            }
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(comparison: Option<&str>) -> SessionRequest {
        SessionRequest {
            primary: "AAA".into(),
            comparison: comparison.map(String::from),
            start: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            sample_size: 10,
            threshold: 0.0,
            seed: SeedSource::default(),
            halt_on_failure: false,
        }
    }

    #[test]
    fn symbols_in_order() {
        assert_eq!(request(None).symbols(), vec!["AAA"]);
        assert_eq!(request(Some("BBB")).symbols(), vec!["AAA", "BBB"]);
    }

    #[test]
    fn failure_line_names_symbol_and_window() {
        let err: RunError = DataError::RateLimited {
            retry_after_secs: 60,
        }
        .into();
        let line = failure_line("AAA", &request(None), &err);
        assert!(line.starts_with("Error for AAA (2024-01-01 to 2024-06-01): "));
        assert!(line.ends_with(&err.to_string()));
    }

    #[test]
    fn run_error_shows_inner_message() {
        let err: RunError = SimError::ZeroSampleSize.into();
        assert_eq!(err.to_string(), "sample size must be at least 1");
    }
}
