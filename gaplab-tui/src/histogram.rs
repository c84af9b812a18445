//! Return histogram: binning plus the ratatui widget that draws it.

use gaplab_core::Trade;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph, Widget},
};

use crate::theme::Theme;

/// One equal-width bin over `[lower, upper)`; the last bin also holds `upper`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: u64,
}

/// Split `[min, max]` of `values` into `bins` equal-width bins and count.
///
/// Non-finite values are skipped. When every value is equal the range is
/// widened to `value ± 0.5` so the single spike lands in the middle bin.
pub fn histogram_bins(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if bins == 0 || finite.is_empty() {
        return Vec::new();
    }

    let (mut lo, mut hi) = finite
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }
    let width = (hi - lo) / bins as f64;

    let mut out: Vec<HistogramBin> = (0..bins)
        .map(|i| HistogramBin {
            lower: lo + width * i as f64,
            upper: if i + 1 == bins {
                hi
            } else {
                lo + width * (i + 1) as f64
            },
            count: 0,
        })
        .collect();

    for v in finite {
        let idx = (((v - lo) / width).floor() as usize).min(bins - 1);
        out[idx].count += 1;
    }
    out
}

/// Gap and bar width that fit `bins` bars into `width` cells. Bars keep a
/// width of one and are clipped by `BarChart` when they cannot all fit.
fn bar_layout(width: u16, bins: usize) -> (u16, u16) {
    let n = u16::try_from(bins).unwrap_or(u16::MAX).max(1);
    let gap = if u32::from(width) >= 2 * u32::from(n) { 1 } else { 0 };
    let bar_width = (width.saturating_sub(gap * (n - 1)) / n).max(1);
    (gap, bar_width)
}

/// Bar chart of trade returns (percent) for one symbol.
pub struct HistogramChart<'a> {
    trades: &'a [Trade],
    label: &'a str,
    bins: usize,
    theme: &'a Theme,
}

impl<'a> HistogramChart<'a> {
    pub fn new(trades: &'a [Trade], label: &'a str, bins: usize, theme: &'a Theme) -> Self {
        Self {
            trades,
            label,
            bins,
            theme,
        }
    }

    pub fn title(&self) -> String {
        format!(" Distribution of Trade Returns for {} ", self.label)
    }

    fn returns_pct(&self) -> Vec<f64> {
        self.trades.iter().map(|t| t.profit_pct).collect()
    }
}

impl Widget for HistogramChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(self.title())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.neutral))
            .style(Style::default().bg(self.theme.background));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height < 4 || inner.width < 8 {
            return;
        }

        let [y_label, plot, edges, x_label] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(inner);

        let axis_style = Style::default().fg(self.theme.muted);
        Paragraph::new(Line::from(Span::styled("Frequency", axis_style))).render(y_label, buf);
        Paragraph::new(Line::from(Span::styled("Return (%)", axis_style)))
            .alignment(Alignment::Center)
            .render(x_label, buf);

        let bins = histogram_bins(&self.returns_pct(), self.bins);
        let (Some(first), Some(last)) = (bins.first(), bins.last()) else {
            return;
        };

        let (gap, bar_width) = bar_layout(plot.width, bins.len());

        let bars: Vec<Bar> = bins
            .iter()
            .map(|b| {
                Bar::default()
                    .value(b.count)
                    .text_value(b.count.to_string())
                    .style(Style::default().fg(self.theme.pnl_color((b.lower + b.upper) / 2.0)))
            })
            .collect();

        BarChart::default()
            .data(BarGroup::default().bars(&bars))
            .bar_width(bar_width)
            .bar_gap(gap)
            .value_style(
                Style::default()
                    .fg(self.theme.text_primary)
                    .add_modifier(Modifier::BOLD),
            )
            .render(plot, buf);

        let text_style = Style::default().fg(self.theme.text_secondary);
        Paragraph::new(Line::from(Span::styled(format!("{:.2}", first.lower), text_style)))
            .render(edges, buf);
        Paragraph::new(Line::from(Span::styled(format!("{:.2}", last.upper), text_style)))
            .alignment(Alignment::Right)
            .render(edges, buf);
    }
}
