//! Full-screen chart viewer: one chart per screen, dismissed with a key.

use std::io::{self, stdout, IsTerminal, Stdout};

use anyhow::{bail, Result};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use gaplab_core::{Summary, Trade};
use gaplab_runner::ChartRenderer;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::widgets::Paragraph;
use ratatui::{Frame, Terminal};
use tracing::debug;

use crate::comparison::ComparisonChart;
use crate::histogram::HistogramChart;
use crate::theme::Theme;

const DISMISS_HINT: &str = "q / Esc / Enter: continue";

/// Restore the terminal if a chart screen panics.
pub fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stderr(), LeaveAlternateScreen);
        default_hook(info);
    }));
}

fn is_dismiss(code: KeyCode) -> bool {
    matches!(
        code,
        KeyCode::Char('q') | KeyCode::Esc | KeyCode::Enter | KeyCode::Char(' ')
    )
}

/// Leaves raw mode and the alternate screen on drop.
struct ScreenGuard {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl ScreenGuard {
    fn enter() -> Result<Self> {
        enable_raw_mode()?;
        let mut out = stdout();
        if let Err(e) = execute!(out, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(e.into());
        }
        let mut terminal = Terminal::new(CrosstermBackend::new(out))?;
        terminal.clear()?;
        Ok(Self { terminal })
    }
}

impl Drop for ScreenGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// `ChartRenderer` that draws each chart full-screen and blocks until dismissed.
pub struct TerminalRenderer {
    theme: Theme,
    bins: usize,
}

impl TerminalRenderer {
    pub fn new(bins: usize) -> Self {
        Self {
            theme: Theme::default(),
            bins,
        }
    }

    fn show(&self, draw: impl Fn(&mut Frame, Rect, &Theme)) -> Result<()> {
        if !stdout().is_terminal() {
            bail!("stdout is not a terminal");
        }

        let mut screen = ScreenGuard::enter()?;
        loop {
            screen.terminal.draw(|f| {
                let (chart, hint) = split_screen(f.area());
                draw(f, chart, &self.theme);
                f.render_widget(
                    Paragraph::new(Line::from(DISMISS_HINT))
                        .style(Style::default().fg(self.theme.muted))
                        .alignment(Alignment::Center),
                    hint,
                );
            })?;

            // Any other event (resize included) just redraws.
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && is_dismiss(key.code) {
                    debug!("chart dismissed");
                    return Ok(());
                }
            }
        }
    }
}

impl ChartRenderer for TerminalRenderer {
    fn render_histogram(&mut self, trades: &[Trade], label: &str) -> anyhow::Result<()> {
        let bins = self.bins;
        self.show(|f, area, theme| {
            f.render_widget(HistogramChart::new(trades, label, bins, theme), area);
        })
    }

    fn render_comparison(
        &mut self,
        a: &Summary,
        label_a: &str,
        b: &Summary,
        label_b: &str,
    ) -> anyhow::Result<()> {
        self.show(|f, area, theme| {
            f.render_widget(ComparisonChart::new(a, label_a, b, label_b, theme), area);
        })
    }
}

/// Chart area above a one-line key hint.
fn split_screen(area: Rect) -> (Rect, Rect) {
    let [chart, hint] = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(area);
    (chart, hint)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;

    #[test]
    fn dismiss_keys() {
        assert!(is_dismiss(KeyCode::Char('q')));
        assert!(is_dismiss(KeyCode::Esc));
        assert!(is_dismiss(KeyCode::Enter));
        assert!(!is_dismiss(KeyCode::Char('x')));
    }

    #[test]
    fn chart_leaves_room_for_hint() {
        let (chart, hint) = split_screen(Rect::new(0, 0, 40, 10));
        assert_eq!(chart, Rect::new(0, 0, 40, 9));
        assert_eq!(hint, Rect::new(0, 9, 40, 1));
    }

    #[test]
    fn histogram_draws_on_test_backend() {
        let theme = Theme::default();
        let mut terminal = Terminal::new(TestBackend::new(60, 16)).unwrap();
        terminal
            .draw(|f| {
                let (chart, _) = split_screen(f.area());
                f.render_widget(HistogramChart::new(&[], "AAPL", 20, &theme), chart);
            })
            .unwrap();
        let buf = terminal.backend().buffer();
        let top: String = (0..60).map(|x| buf.cell((x, 0)).unwrap().symbol()).collect();
        assert!(top.contains("AAPL"));
    }
}
