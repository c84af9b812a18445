//! GapLab Runner: session orchestration on top of `gaplab-core`.
//!
//! This crate provides:
//! - TOML configuration with defaults for every field
//! - Provider selection (Yahoo Finance, CSV import, synthetic)
//! - The per-symbol pipeline and the one- or two-symbol session
//! - The plain-text results block
//! - The `ChartRenderer` seam used by the terminal charts

pub mod config;
pub mod providers;
pub mod render;
pub mod report;
pub mod session;

pub use config::{
    ConfigError, GapLabConfig, SourceKind, DEFAULT_HISTOGRAM_BINS, DEFAULT_SAMPLE_SIZE,
    MAX_HISTOGRAM_BINS,
};
pub use providers::build_provider;
pub use render::{ChartRenderer, NoopRenderer};
pub use report::write_results;
pub use session::{
    failure_line, run_session, run_symbol, RunError, SessionReport, SessionRequest, SymbolRun,
};
