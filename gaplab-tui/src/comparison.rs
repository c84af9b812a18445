//! Side-by-side comparison of two symbols' summaries.
//!
//! Values are signed percentages, so the bars are drawn horizontally around a
//! zero axis instead of through ratatui's `BarChart` (which only takes `u64`).

use gaplab_core::Summary;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Widget},
};

use crate::theme::Theme;

pub const COMPARISON_TITLE: &str = "Comparison of Strategy Performance";
pub const METRICS: [&str; 2] = ["Total Profit (%)", "Mean Return (%)"];

const VALUE_COLUMN: u16 = 10;

fn metric_values(summary: &Summary) -> [f64; 2] {
    [summary.total_profit_pct, summary.mean_return_pct]
}

/// Column of the zero axis within a bar area of `width` cells.
fn axis_column(width: u16, has_negative: bool) -> u16 {
    if has_negative {
        width / 2
    } else {
        0
    }
}

/// Cells a bar of `value` occupies when `max_abs` fills `room` cells.
fn bar_extent(value: f64, max_abs: f64, room: u16) -> u16 {
    if !value.is_finite() || max_abs <= 0.0 {
        return 0;
    }
    ((value.abs() / max_abs) * room as f64).round().min(room as f64) as u16
}

pub struct ComparisonChart<'a> {
    series: [(&'a str, &'a Summary); 2],
    theme: &'a Theme,
}

impl<'a> ComparisonChart<'a> {
    pub fn new(
        a: &'a Summary,
        label_a: &'a str,
        b: &'a Summary,
        label_b: &'a str,
        theme: &'a Theme,
    ) -> Self {
        Self {
            series: [(label_a, a), (label_b, b)],
            theme,
        }
    }

    fn max_abs(&self) -> f64 {
        self.series
            .iter()
            .flat_map(|(_, s)| metric_values(s))
            .filter(|v| v.is_finite())
            .fold(0.0_f64, |m, v| m.max(v.abs()))
    }

    fn has_negative(&self) -> bool {
        self.series
            .iter()
            .flat_map(|(_, s)| metric_values(s))
            .any(|v| v < 0.0)
    }

    fn render_legend(&self, x: u16, y: u16, width: u16, buf: &mut Buffer) {
        let mut spans = Vec::new();
        for (i, (label, _)) in self.series.iter().enumerate() {
            spans.push(Span::styled("■ ", Style::default().fg(self.theme.series_color(i))));
            spans.push(Span::styled(
                format!("{label}   "),
                Style::default().fg(self.theme.text_primary),
            ));
        }
        buf.set_line(x, y, &Line::from(spans), width);
    }

    #[allow(clippy::too_many_arguments)]
    fn render_bar_row(
        &self,
        index: usize,
        value: f64,
        row: Rect,
        name_width: u16,
        max_abs: f64,
        has_negative: bool,
        buf: &mut Buffer,
    ) {
        let (label, _) = self.series[index];
        let color = self.theme.series_color(index);
        buf.set_stringn(
            row.x,
            row.y,
            label,
            name_width as usize,
            Style::default().fg(self.theme.text_secondary),
        );

        let bar_x = row.x + name_width;
        let bar_width = row.width.saturating_sub(name_width + VALUE_COLUMN);
        if bar_width < 3 {
            return;
        }

        let zero = axis_column(bar_width, has_negative);
        buf.set_string(bar_x + zero, row.y, "│", Style::default().fg(self.theme.neutral));

        let (start, len) = if value >= 0.0 {
            let len = bar_extent(value, max_abs, bar_width - zero - 1);
            (zero + 1, len)
        } else {
            let len = bar_extent(value, max_abs, zero);
            (zero - len, len)
        };
        if len > 0 {
            buf.set_string(
                bar_x + start,
                row.y,
                "█".repeat(len as usize),
                Style::default().fg(color),
            );
        }

        buf.set_string(
            bar_x + bar_width + 1,
            row.y,
            format!("{value:.2}"),
            Style::default().fg(self.theme.pnl_color(value)),
        );
    }
}

impl Widget for ComparisonChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(format!(" {COMPARISON_TITLE} "))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.neutral))
            .style(Style::default().bg(self.theme.background));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height < 3 || inner.width < 10 {
            return;
        }

        let bottom = inner.y + inner.height;
        let mut y = inner.y;
        self.render_legend(inner.x, y, inner.width, buf);
        y += 1;
        buf.set_stringn(
            inner.x,
            y,
            "Percentage (%)",
            inner.width as usize,
            Style::default().fg(self.theme.muted),
        );
        y += 2;

        let name_width = self
            .series
            .iter()
            .map(|(label, _)| label.chars().count() as u16 + 1)
            .max()
            .unwrap_or(1);
        let max_abs = self.max_abs();
        let has_negative = self.has_negative();

        for (m, metric) in METRICS.iter().enumerate() {
            if y >= bottom {
                return;
            }
            buf.set_stringn(
                inner.x,
                y,
                metric,
                inner.width as usize,
                Style::default()
                    .fg(self.theme.text_primary)
                    .add_modifier(Modifier::BOLD),
            );
            y += 1;

            for (i, (_, summary)) in self.series.iter().enumerate() {
                if y >= bottom {
                    return;
                }
                let row = Rect::new(inner.x, y, inner.width, 1);
                self.render_bar_row(
                    i,
                    metric_values(summary)[m],
                    row,
                    name_width,
                    max_abs,
                    has_negative,
                    buf,
                );
                y += 1;
            }
            y += 1;
        }
    }
}
