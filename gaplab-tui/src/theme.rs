//! Parrot/neon theme tokens for GapLab charts
//!
//! # Color Palette
//! - **Background**: Near-black / deep charcoal (base layer)
//! - **Accent**: Electric cyan (first comparison symbol)
//! - **Positive**: Neon green (gains, histogram bins above zero)
//! - **Negative**: Hot pink (losses, histogram bins below zero)
//! - **Warning**: Neon orange (second symbol)
//! - **Neutral**: Cool purple (borders, axes)
//! - **Muted**: Steel blue (secondary text, hints)

use ratatui::style::Color;

#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub background: Color,
    pub accent: Color,
    pub positive: Color,
    pub negative: Color,
    pub warning: Color,
    pub neutral: Color,
    pub muted: Color,
    pub text_primary: Color,
    pub text_secondary: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::parrot_neon()
    }
}

impl Theme {
    pub fn parrot_neon() -> Self {
        Self {
            background: Color::Rgb(18, 18, 20),
            accent: Color::Rgb(0, 255, 255),
            positive: Color::Rgb(0, 255, 128),
            negative: Color::Rgb(255, 20, 147),
            warning: Color::Rgb(255, 140, 0),
            neutral: Color::Rgb(147, 112, 219),
            muted: Color::Rgb(100, 149, 237),
            text_primary: Color::White,
            text_secondary: Color::Rgb(170, 170, 170),
        }
    }

    /// Green for gains (zero included), pink for losses.
    pub fn pnl_color(&self, value: f64) -> Color {
        if value >= 0.0 {
            self.positive
        } else {
            self.negative
        }
    }

    /// Series color for the n-th symbol of a comparison.
    pub fn series_color(&self, index: usize) -> Color {
        match index {
            0 => self.accent,
            1 => self.warning,
            _ => self.neutral,
        }
    }
}
