//! Interactive prompts and the parsers behind them.
//!
//! Sample size and threshold fall back to their defaults on bad input (with a
//! printed warning); dates are asked again until they parse. Running out of
//! input while a question is pending is an error.

use std::io::{BufRead, Write};

use anyhow::{bail, Result};
use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum InputParseError {
    #[error("invalid date '{0}': expected YYYY-MM-DD")]
    Date(String),
    #[error("invalid sample size '{0}': expected a positive whole number")]
    SampleSize(String),
    #[error("invalid threshold '{0}': expected a number")]
    Threshold(String),
}

/// Trim and upper-case a ticker symbol.
pub fn normalize_ticker(raw: &str) -> String {
    raw.trim().to_uppercase()
}

pub fn parse_date(raw: &str) -> Result<NaiveDate, InputParseError> {
    let s = raw.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| InputParseError::Date(s.to_string()))
}

/// Sample sizes are counts of days, so zero is rejected along with non-integers.
pub fn parse_sample_size(raw: &str) -> Result<usize, InputParseError> {
    let s = raw.trim();
    match s.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(InputParseError::SampleSize(s.to_string())),
    }
}

pub fn parse_threshold(raw: &str) -> Result<f64, InputParseError> {
    let s = raw.trim();
    match s.parse::<f64>() {
        Ok(t) if t.is_finite() => Ok(t),
        _ => Err(InputParseError::Threshold(s.to_string())),
    }
}

/// Line-oriented question/answer over any reader and writer.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn say(&mut self, line: &str) -> Result<()> {
        writeln!(self.output, "{line}")?;
        Ok(())
    }

    fn ask(&mut self, question: &str) -> Result<String> {
        write!(self.output, "{question}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            bail!("input ended while waiting for an answer to: {}", question.trim());
        }
        Ok(line.trim().to_string())
    }

    /// Asked until a non-empty symbol is given.
    pub fn primary_ticker(&mut self) -> Result<String> {
        loop {
            let ticker = normalize_ticker(&self.ask("Enter the primary ticker symbol (e.g., AAPL): ")?);
            if !ticker.is_empty() {
                return Ok(ticker);
            }
            self.say("A ticker symbol is required.")?;
        }
    }

    /// Empty answer skips the comparison.
    pub fn comparison_ticker(&mut self) -> Result<Option<String>> {
        let ticker = normalize_ticker(
            &self.ask("Enter a second ticker symbol to compare (or press Enter to skip): ")?,
        );
        Ok((!ticker.is_empty()).then_some(ticker))
    }

    pub fn date(&mut self, which: &str) -> Result<NaiveDate> {
        loop {
            let answer = self.ask(&format!("Enter the {which} date (YYYY-MM-DD): "))?;
            match parse_date(&answer) {
                Ok(date) => return Ok(date),
                Err(e) => self.say(&format!("{e}. Please try again."))?,
            }
        }
    }

    pub fn sample_size(&mut self, default: usize) -> Result<usize> {
        let answer = self.ask("Enter the number of trading days to simulate (e.g., 1000): ")?;
        Ok(match parse_sample_size(&answer) {
            Ok(n) => n,
            Err(e) => {
                tracing::debug!(error = %e, "sample size fallback");
                self.say(&format!(
                    "Invalid input for sample size. Using default of {default} days."
                ))?;
                default
            }
        })
    }

    pub fn threshold(&mut self, default: f64) -> Result<f64> {
        let answer = self.ask(
            "Enter the pre-market threshold (e.g., 0 for no extra threshold, or 0.5 for a $0.5 gap): ",
        )?;
        Ok(match parse_threshold(&answer) {
            Ok(t) => t,
            Err(e) => {
                tracing::debug!(error = %e, "threshold fallback");
                self.say(&format!("Invalid input for threshold. Using default of {default}."))?;
                default
            }
        })
    }
}
