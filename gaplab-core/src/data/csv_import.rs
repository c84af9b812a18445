//! CSV import provider.
//!
//! Reads `<dir>/<SYMBOL>.csv` files exported from a charting tool or a
//! previous download. Column matching is case-insensitive and ignores
//! surrounding whitespace, so `Date,Open,High,Low,Close,Adj Close,Volume`
//! and `date,open,close` both work. Only date, open and close are read.

use std::fs::File;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::debug;

use super::provider::{check_range, DataError, DataProvider, DataSource, FetchResult, RawBar};

pub struct CsvProvider {
    dir: PathBuf,
}

impl CsvProvider {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn path_for(&self, symbol: &str) -> PathBuf {
        self.dir.join(format!("{symbol}.csv"))
    }
}

fn column(headers: &csv::StringRecord, name: &str) -> Option<usize> {
    headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(name))
}

fn parse_price(field: Option<&str>) -> f64 {
    field
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse::<f64>().ok())
        .unwrap_or(f64::NAN)
}

/// Parse CSV rows with date in `[start, end)` from any reader.
pub(crate) fn read_bars<R: std::io::Read>(
    reader: R,
    symbol: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<RawBar>, DataError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr
        .headers()
        .map_err(|e| DataError::Csv(format!("{symbol}: {e}")))?
        .clone();
    debug!(symbol, columns = ?headers.iter().collect::<Vec<_>>(), "csv columns");

    let date_idx =
        column(&headers, "date").ok_or_else(|| DataError::missing_field("date", symbol, start, end))?;
    let open_idx =
        column(&headers, "open").ok_or_else(|| DataError::missing_field("open", symbol, start, end))?;
    let close_idx = column(&headers, "close")
        .ok_or_else(|| DataError::missing_field("close", symbol, start, end))?;

    let mut bars = Vec::new();
    for (line, record) in rdr.records().enumerate() {
        let record = record.map_err(|e| DataError::Csv(format!("{symbol}: {e}")))?;
        let raw_date = record.get(date_idx).unwrap_or_default();
        // Accept both `2024-01-02` and `2024-01-02 00:00:00`.
        let date = raw_date
            .get(..10)
            .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
            .ok_or_else(|| {
                DataError::Csv(format!(
                    "{symbol}: invalid date '{raw_date}' on row {}",
                    line + 2
                ))
            })?;

        if date < start || date >= end {
            continue;
        }

        bars.push(RawBar {
            date,
            open: parse_price(record.get(open_idx)),
            close: parse_price(record.get(close_idx)),
        });
    }

    bars.sort_by_key(|b| b.date);

    if bars.is_empty() {
        return Err(DataError::no_data(symbol, start, end));
    }
    Ok(bars)
}

impl DataProvider for CsvProvider {
    fn name(&self) -> &str {
        "csv_import"
    }

    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<FetchResult, DataError> {
        check_range(start, end)?;
        let path = self.path_for(symbol);
        let file = match File::open(&path) {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(symbol, path = %path.display(), "no csv file");
                return Err(DataError::no_data(symbol, start, end));
            }
            Err(e) => return Err(DataError::Io(e)),
        };

        let bars = read_bars(file, symbol, start, end)?;
        Ok(FetchResult {
            symbol: symbol.to_string(),
            bars,
            source: DataSource::CsvImport,
        })
    }

    fn is_available(&self) -> bool {
        self.dir.is_dir()
    }
}
