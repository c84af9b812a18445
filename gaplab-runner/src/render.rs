//! Chart renderer seam.
//!
//! The session decides *when* to draw (histogram only for a non-empty trade
//! list, comparison only when both symbols produced a summary); renderers
//! only decide *how*.

use gaplab_core::{Summary, Trade};

pub trait ChartRenderer {
    /// Frequency histogram of `profit_pct` across `trades`.
    fn render_histogram(&mut self, trades: &[Trade], label: &str) -> anyhow::Result<()>;

    /// Side-by-side total profit and mean return for two symbols.
    fn render_comparison(
        &mut self,
        a: &Summary,
        label_a: &str,
        b: &Summary,
        label_b: &str,
    ) -> anyhow::Result<()>;
}

/// Renderer for `--no-charts` runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopRenderer;

impl ChartRenderer for NoopRenderer {
    fn render_histogram(&mut self, _trades: &[Trade], _label: &str) -> anyhow::Result<()> {
        Ok(())
    }

    fn render_comparison(
        &mut self,
        _a: &Summary,
        _label_a: &str,
        _b: &Summary,
        _label_b: &str,
    ) -> anyhow::Result<()> {
        Ok(())
    }
}
