//! Integration tests for the session runner.
//!
//! A scripted provider and a recording renderer stand in for the network and
//! the terminal so the orchestration rules can be checked end to end:
//! results blocks, chart guards, failure isolation and seed sharing.

use std::collections::HashMap;

use chrono::NaiveDate;
use gaplab_core::data::{DataError, DataProvider, DataSource, FetchResult, RawBar};
use gaplab_core::{SeedSource, Summary, Trade};
use gaplab_runner::{run_session, ChartRenderer, RunError, SessionRequest};
use proptest::prelude::*;

// ── Test doubles ─────────────────────────────────────────────────────

struct ScriptedProvider {
    bars: HashMap<String, Vec<RawBar>>,
}

impl ScriptedProvider {
    fn new() -> Self {
        Self {
            bars: HashMap::new(),
        }
    }

    fn with(mut self, symbol: &str, bars: Vec<RawBar>) -> Self {
        self.bars.insert(symbol.to_string(), bars);
        self
    }
}

impl DataProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<FetchResult, DataError> {
        let bars = self
            .bars
            .get(symbol)
            .cloned()
            .ok_or_else(|| DataError::no_data(symbol, start, end))?;
        Ok(FetchResult {
            symbol: symbol.to_string(),
            bars,
            source: DataSource::CsvImport,
        })
    }
}

#[derive(Debug, PartialEq)]
enum Drawn {
    Histogram { label: String, trades: usize },
    Comparison { a: String, b: String },
}

#[derive(Default)]
struct RecordingRenderer {
    drawn: Vec<Drawn>,
    fail: bool,
}

impl ChartRenderer for RecordingRenderer {
    fn render_histogram(&mut self, trades: &[Trade], label: &str) -> anyhow::Result<()> {
        if self.fail {
            anyhow::bail!("no terminal");
        }
        self.drawn.push(Drawn::Histogram {
            label: label.to_string(),
            trades: trades.len(),
        });
        Ok(())
    }

    fn render_comparison(
        &mut self,
        _a: &Summary,
        label_a: &str,
        _b: &Summary,
        label_b: &str,
    ) -> anyhow::Result<()> {
        self.drawn.push(Drawn::Comparison {
            a: label_a.to_string(),
            b: label_b.to_string(),
        });
        Ok(())
    }
}

// ── Fixtures ─────────────────────────────────────────────────────────

/// `n` daily bars; every other day opens above the prior close by `gap`.
fn bars(n: usize, gap: f64) -> Vec<RawBar> {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let mut close = 100.0;
    (0..n)
        .map(|i| {
            let open = if i % 2 == 0 { close + gap } else { close - 0.5 };
            close = open + 0.25;
            RawBar {
                date: start + chrono::Duration::days(i as i64),
                open,
                close,
            }
        })
        .collect()
}

fn request(comparison: Option<&str>, sample_size: usize) -> SessionRequest {
    SessionRequest {
        primary: "AAA".into(),
        comparison: comparison.map(String::from),
        start: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        end: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
        sample_size,
        threshold: 0.0,
        seed: SeedSource::default(),
        halt_on_failure: false,
    }
}

fn run(
    req: &SessionRequest,
    provider: &ScriptedProvider,
    renderer: &mut RecordingRenderer,
) -> (gaplab_runner::SessionReport, String) {
    let mut out = Vec::new();
    let report = run_session(req, provider, renderer, &mut out).unwrap();
    (report, String::from_utf8(out).unwrap())
}

// ── Tests ────────────────────────────────────────────────────────────

#[test]
fn single_symbol_prints_results_and_draws_histogram() {
    let provider = ScriptedProvider::new().with("AAA", bars(41, 1.0));
    let mut renderer = RecordingRenderer::default();

    let (report, text) = run(&request(None, 40), &provider, &mut renderer);

    assert!(!report.any_failed());
    let aaa = report.run("AAA").unwrap();
    assert_eq!(aaa.bar_count, 40);
    assert_eq!(aaa.outcome.sample_size(), 40);
    assert_eq!(aaa.outcome.trades.len(), 20);

    assert!(text.contains("--- Simulation Results for AAA ---"));
    assert!(text.contains("Total number of sampled days: 40"));
    assert!(text.contains("Number of trades signaled: 20"));
    assert_eq!(
        renderer.drawn,
        vec![Drawn::Histogram {
            label: "AAA".into(),
            trades: 20
        }]
    );
}

#[test]
fn no_signals_skips_histogram() {
    let provider = ScriptedProvider::new().with("AAA", bars(41, 1.0));
    let mut renderer = RecordingRenderer::default();
    let mut req = request(None, 40);
    req.threshold = 5.0;

    let (report, text) = run(&req, &provider, &mut renderer);

    assert!(!report.any_failed());
    assert!(report.run("AAA").unwrap().outcome.summary.is_none());
    assert!(text.contains("No trades were executed based on the strategy criteria."));
    assert!(renderer.drawn.is_empty());
}

#[test]
fn comparison_draws_both_histograms_then_bars() {
    let provider = ScriptedProvider::new()
        .with("AAA", bars(41, 1.0))
        .with("BBB", bars(41, 2.0));
    let mut renderer = RecordingRenderer::default();

    let (report, text) = run(&request(Some("BBB"), 30), &provider, &mut renderer);

    assert!(!report.any_failed());
    assert!(text.contains("--- Simulation Results for AAA ---"));
    assert!(text.contains("--- Simulation Results for BBB ---"));
    assert_eq!(renderer.drawn.len(), 3);
    assert_eq!(
        renderer.drawn[2],
        Drawn::Comparison {
            a: "AAA".into(),
            b: "BBB".into()
        }
    );

    // Same seed, same series length: both symbols sampled the same day indices.
    let dates = |s: &str| -> Vec<NaiveDate> {
        report
            .run(s)
            .unwrap()
            .outcome
            .sampled
            .iter()
            .map(|d| d.bar.date)
            .collect()
    };
    assert_eq!(dates("AAA"), dates("BBB"));
}

#[test]
fn primary_failure_does_not_stop_comparison_symbol() {
    let provider = ScriptedProvider::new().with("BBB", bars(41, 1.0));
    let mut renderer = RecordingRenderer::default();

    let (report, text) = run(&request(Some("BBB"), 40), &provider, &mut renderer);

    assert!(report.any_failed());
    assert!(text.contains("Error for AAA (2024-01-01 to 2024-12-31): "));
    assert!(text.contains("no data found for ticker 'AAA' between 2024-01-01 and 2024-12-31"));
    assert!(text.contains("--- Simulation Results for BBB ---"));
    // Histogram for BBB only; no comparison without both summaries.
    assert_eq!(
        renderer.drawn,
        vec![Drawn::Histogram {
            label: "BBB".into(),
            trades: 20
        }]
    );
}

#[test]
fn halt_on_failure_stops_after_first_error() {
    let provider = ScriptedProvider::new().with("BBB", bars(41, 1.0));
    let mut renderer = RecordingRenderer::default();
    let mut req = request(Some("BBB"), 30);
    req.halt_on_failure = true;

    let (report, text) = run(&req, &provider, &mut renderer);

    assert_eq!(report.results.len(), 1);
    assert!(report.any_failed());
    assert!(!text.contains("BBB"));
    assert!(renderer.drawn.is_empty());
}

#[test]
fn oversized_sample_is_reported_not_truncated() {
    let provider = ScriptedProvider::new().with("AAA", bars(11, 1.0));
    let mut renderer = RecordingRenderer::default();

    let (report, text) = run(&request(None, 1000), &provider, &mut renderer);

    assert!(matches!(
        report.results[0].1,
        Err(RunError::Simulation(_))
    ));
    assert!(text.contains("requested a sample of 1000 days but only 10 are available"));
    assert!(renderer.drawn.is_empty());
}

#[test]
fn chart_failure_is_reported_and_session_continues() {
    let provider = ScriptedProvider::new()
        .with("AAA", bars(41, 1.0))
        .with("BBB", bars(41, 1.0));
    let mut renderer = RecordingRenderer {
        fail: true,
        ..Default::default()
    };

    let (report, text) = run(&request(Some("BBB"), 20), &provider, &mut renderer);

    assert!(!report.any_failed());
    assert!(text.contains("Could not render chart for AAA: no terminal"));
    assert!(text.contains("--- Simulation Results for BBB ---"));
    // The comparison renderer still runs.
    assert_eq!(renderer.drawn.len(), 1);
}

#[test]
fn missing_field_from_provider_is_reported_verbatim() {
    struct Broken;
    impl DataProvider for Broken {
        fn name(&self) -> &str {
            "broken"
        }
        fn fetch(&self, symbol: &str, start: NaiveDate, end: NaiveDate)
            -> Result<FetchResult, DataError> {
            Err(DataError::missing_field("close", symbol, start, end))
        }
    }

    let mut renderer = RecordingRenderer::default();
    let mut out = Vec::new();
    let report = run_session(&request(None, 5), &Broken, &mut renderer, &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();

    assert!(report.any_failed());
    assert!(text.contains("expected field 'close' not found in data for ticker 'AAA'"));
}

#[test]
fn single_row_series_failure_names_symbol_and_window() {
    let provider = ScriptedProvider::new().with("AAA", bars(1, 1.0));
    let mut renderer = RecordingRenderer::default();

    let (report, text) = run(&request(None, 5), &provider, &mut renderer);

    assert!(matches!(report.results[0].1, Err(RunError::Series(_))));
    assert!(text.contains(
        "Error for AAA (2024-01-01 to 2024-12-31): no usable bars for 'AAA' after cleaning"
    ));
    assert!(renderer.drawn.is_empty());
}

#[test]
fn rate_limited_failure_names_symbol_and_window() {
    struct Throttled;
    impl DataProvider for Throttled {
        fn name(&self) -> &str {
            "throttled"
        }
        fn fetch(&self, _symbol: &str, _start: NaiveDate, _end: NaiveDate)
            -> Result<FetchResult, DataError> {
            Err(DataError::RateLimited {
                retry_after_secs: 60,
            })
        }
    }

    let mut renderer = RecordingRenderer::default();
    let mut out = Vec::new();
    let report = run_session(&request(Some("BBB"), 5), &Throttled, &mut renderer, &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();

    assert!(report.any_failed());
    assert!(text.contains("Error for AAA (2024-01-01 to 2024-12-31): "));
    assert!(text.contains("Error for BBB (2024-01-01 to 2024-12-31): "));
}

#[test]
fn comparison_skipped_when_one_symbol_has_no_trades() {
    // A negative gap never opens above the prior close.
    let provider = ScriptedProvider::new()
        .with("AAA", bars(41, 1.0))
        .with("BBB", bars(41, -1.0));
    let mut renderer = RecordingRenderer::default();

    let (report, text) = run(&request(Some("BBB"), 40), &provider, &mut renderer);

    assert!(!report.any_failed());
    assert!(report.run("BBB").unwrap().outcome.summary.is_none());
    assert!(text.contains("No trades were executed based on the strategy criteria."));
    assert_eq!(
        renderer.drawn,
        vec![Drawn::Histogram {
            label: "AAA".into(),
            trades: 20
        }]
    );
}

proptest! {
    #[test]
    fn comparison_drawn_iff_both_symbols_summarized(
        gap_a in -2.0f64..2.0,
        gap_b in -2.0f64..2.0,
        sample in 1usize..=40,
    ) {
        let provider = ScriptedProvider::new()
            .with("AAA", bars(41, gap_a))
            .with("BBB", bars(41, gap_b));
        let mut renderer = RecordingRenderer::default();

        let (report, _) = run(&request(Some("BBB"), sample), &provider, &mut renderer);

        let summarized = |s: &str| report.run(s).unwrap().outcome.summary.is_some();
        let both = summarized("AAA") && summarized("BBB");
        let compared = renderer
            .drawn
            .iter()
            .any(|d| matches!(d, Drawn::Comparison { .. }));
        prop_assert_eq!(compared, both);
    }
}
