//! GapLab TUI: terminal charts for simulation results.
//!
//! - `histogram`: trade-return binning and the `HistogramChart` widget
//! - `comparison`: signed side-by-side bars for two symbols
//! - `viewer`: `TerminalRenderer`, the full-screen `ChartRenderer`
//! - `theme`: Parrot/neon color tokens

pub mod comparison;
pub mod histogram;
pub mod theme;
pub mod viewer;

pub use comparison::ComparisonChart;
pub use histogram::{histogram_bins, HistogramBin, HistogramChart};
pub use theme::Theme;
pub use viewer::{install_panic_hook, TerminalRenderer};
