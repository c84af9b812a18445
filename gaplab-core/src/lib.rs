//! GapLab Core: domain types, gap-up trade simulation, data providers.
//!
//! This crate contains the reproducible part of the simulator:
//! - Domain types (bars, bar series, sampled days, trades, summaries)
//! - The `simulate` operation: seeded sampling, gap-up signal, per-trade returns
//! - Descriptive summary statistics over trade returns
//! - Seed source for the injected pseudo-random generator
//! - Data provider trait and adapters (Yahoo Finance, CSV import, synthetic)

pub mod data;
pub mod domain;
pub mod rng;
pub mod simulator;

pub use domain::{Bar, BarSeries, SampledDay, SeriesError, Summary, Trade};
pub use rng::SeedSource;
pub use simulator::{simulate, SimError, SimulationOutcome};
