//! Data providers: Yahoo Finance, CSV import, synthetic.

pub mod csv_import;
pub mod provider;
pub mod synthetic;
pub mod yahoo;

pub use csv_import::CsvProvider;
pub use provider::{check_range, DataError, DataProvider, DataSource, FetchResult, RawBar};
pub use synthetic::{generate_synthetic_bars, SyntheticProvider};
pub use yahoo::{YahooProvider, YahooSettings};
