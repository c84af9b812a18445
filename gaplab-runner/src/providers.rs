//! Provider selection from configuration.

use gaplab_core::data::{CsvProvider, DataError, DataProvider, SyntheticProvider, YahooProvider};
use tracing::{debug, warn};

use crate::config::{DataConfig, SourceKind};

/// Build the provider named by `config.source`.
pub fn build_provider(config: &DataConfig) -> Result<Box<dyn DataProvider>, DataError> {
    let provider: Box<dyn DataProvider> = match config.source {
        SourceKind::Yahoo => Box::new(YahooProvider::new(config.yahoo_settings())?),
        SourceKind::Csv => {
            let csv = CsvProvider::new(&config.csv_dir);
            if !csv.is_available() {
                warn!(dir = %config.csv_dir.display(), "csv directory does not exist");
            }
            Box::new(csv)
        }
        SourceKind::Synthetic => {
            warn!("using synthetic data: results are not real market data");
            Box::new(SyntheticProvider::new())
        }
    };
    debug!(provider = provider.name(), "selected data provider");
    Ok(provider)
}
