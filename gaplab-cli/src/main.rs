//! GapLab CLI: gap-up strategy simulation from the terminal.
//!
//! Without `--symbol` every missing value is asked for interactively. With
//! `--symbol` the session is scripted: only a missing start or end date is
//! prompted, the comparison is skipped unless `--compare` is given, and the
//! sample size and threshold come from the config file.

mod input;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use gaplab_core::SeedSource;
use gaplab_runner::{
    build_provider, run_session, ChartRenderer, GapLabConfig, NoopRenderer, SessionRequest,
    SourceKind,
};
use gaplab_tui::{install_panic_hook, TerminalRenderer};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::input::{normalize_ticker, parse_date, Prompter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SourceArg {
    Yahoo,
    Csv,
    Synthetic,
}

impl From<SourceArg> for SourceKind {
    fn from(arg: SourceArg) -> Self {
        match arg {
            SourceArg::Yahoo => SourceKind::Yahoo,
            SourceArg::Csv => SourceKind::Csv,
            SourceArg::Synthetic => SourceKind::Synthetic,
        }
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "gaplab",
    version,
    about = "GapLab: simulate a buy-the-gap-up intraday strategy on sampled days"
)]
struct Cli {
    /// Primary ticker symbol (e.g., AAPL). Omit to be prompted.
    #[arg(long)]
    symbol: Option<String>,

    /// Second ticker to compare against the primary.
    #[arg(long)]
    compare: Option<String>,

    /// First date of the window (YYYY-MM-DD), inclusive.
    #[arg(long, value_parser = parse_date)]
    start: Option<NaiveDate>,

    /// Last date of the window (YYYY-MM-DD), exclusive.
    #[arg(long, value_parser = parse_date)]
    end: Option<NaiveDate>,

    /// Number of trading days to sample without replacement.
    #[arg(long, value_parser = input::parse_sample_size)]
    sample_size: Option<usize>,

    /// Minimum gap over the prior close, in price units.
    #[arg(long, allow_hyphen_values = true, value_parser = input::parse_threshold)]
    threshold: Option<f64>,

    /// Seed for the day sampler.
    #[arg(long)]
    seed: Option<u64>,

    /// Market data source.
    #[arg(long, value_enum)]
    source: Option<SourceArg>,

    /// Directory of <SYMBOL>.csv files for `--source csv`.
    #[arg(long)]
    csv_dir: Option<PathBuf>,

    /// Path to a TOML config file. Defaults to <config dir>/gaplab/config.toml.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print results only; do not open chart screens.
    #[arg(long, default_value_t = false)]
    no_charts: bool,

    /// Stop after the first symbol that fails.
    #[arg(long, default_value_t = false)]
    halt_on_failure: bool,
}

impl Cli {
    /// Fold flag values into the loaded configuration.
    fn apply_to(&self, config: &mut GapLabConfig) {
        if let Some(seed) = self.seed {
            config.simulation.seed = seed;
        }
        if let Some(source) = self.source {
            config.data.source = source.into();
        }
        if let Some(dir) = &self.csv_dir {
            config.data.csv_dir = dir.clone();
        }
        if self.no_charts {
            config.charts.enabled = false;
        }
        if self.halt_on_failure {
            config.session.halt_on_failure = true;
        }
    }

    fn is_scripted(&self) -> bool {
        self.symbol.is_some()
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("GAPLAB_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Combine flags, config defaults and prompted answers into a request.
fn resolve_request<R: BufRead, W: Write>(
    cli: &Cli,
    config: &GapLabConfig,
    prompter: &mut Prompter<R, W>,
) -> Result<SessionRequest> {
    let scripted = cli.is_scripted();
    if !scripted {
        prompter.say("Welcome to GapLab, the gap-up strategy simulator!")?;
    }

    let primary = match &cli.symbol {
        Some(s) => normalize_ticker(s),
        None => prompter.primary_ticker()?,
    };
    let comparison = match &cli.compare {
        Some(s) => Some(normalize_ticker(s)).filter(|t| !t.is_empty()),
        None if scripted => None,
        None => prompter.comparison_ticker()?,
    };
    let start = match cli.start {
        Some(d) => d,
        None => prompter.date("start")?,
    };
    let end = match cli.end {
        Some(d) => d,
        None => prompter.date("end")?,
    };
    let sample_size = match cli.sample_size {
        Some(n) => n,
        None if scripted => config.simulation.default_sample_size,
        None => prompter.sample_size(config.simulation.default_sample_size)?,
    };
    let threshold = match cli.threshold {
        Some(t) => t,
        None if scripted => config.simulation.default_threshold,
        None => prompter.threshold(config.simulation.default_threshold)?,
    };

    Ok(SessionRequest {
        primary,
        comparison,
        start,
        end,
        sample_size,
        threshold,
        seed: SeedSource::new(config.simulation.seed),
        halt_on_failure: config.session.halt_on_failure,
    })
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging();

    let mut config = GapLabConfig::load(cli.config.as_deref()).context("loading configuration")?;
    cli.apply_to(&mut config);
    config.validate()?;

    let request = {
        let stdin = io::stdin();
        let mut prompter = Prompter::new(stdin.lock(), io::stdout());
        resolve_request(&cli, &config, &mut prompter)?
    };
    info!(
        primary = %request.primary,
        comparison = ?request.comparison,
        sample_size = request.sample_size,
        threshold = request.threshold,
        "session resolved"
    );

    let provider = build_provider(&config.data).context("building data provider")?;
    let mut renderer: Box<dyn ChartRenderer> = if config.charts.enabled {
        install_panic_hook();
        Box::new(TerminalRenderer::new(config.charts.histogram_bins))
    } else {
        Box::new(NoopRenderer)
    };

    let mut out = io::stdout();
    let report = run_session(&request, provider.as_ref(), renderer.as_mut(), &mut out)?;
    out.flush()?;

    if report.any_failed() {
        std::process::exit(1);
    }
    Ok(())
}
