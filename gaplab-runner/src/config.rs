//! Serializable session configuration.
//!
//! Loaded from TOML. Every field has a default, so an empty file (or no file)
//! is a valid configuration. Command-line flags are applied on top by the CLI.

use std::path::{Path, PathBuf};

use gaplab_core::data::YahooSettings;
use gaplab_core::rng::DEFAULT_SEED;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Sample size used when none is given or the input does not parse.
pub const DEFAULT_SAMPLE_SIZE: usize = 1000;

/// Bin count for the return histogram.
pub const DEFAULT_HISTOGRAM_BINS: usize = 20;

/// Upper bound on the histogram bin count; wider than any terminal needs.
pub const MAX_HISTOGRAM_BINS: usize = 200;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Top-level configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GapLabConfig {
    pub simulation: SimulationConfig,
    pub data: DataConfig,
    pub charts: ChartsConfig,
    pub session: SessionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    /// Seed for the day sampler. Shared by both symbols of a comparison.
    pub seed: u64,
    pub default_sample_size: usize,
    /// Minimum gap over the prior close, in price units.
    pub default_threshold: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            default_sample_size: DEFAULT_SAMPLE_SIZE,
            default_threshold: 0.0,
        }
    }
}

/// Which provider feeds the session.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    #[default]
    Yahoo,
    Csv,
    Synthetic,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DataConfig {
    pub source: SourceKind,
    /// Directory holding `<SYMBOL>.csv` files for the csv source.
    pub csv_dir: PathBuf,
    pub max_retries: u32,
    pub timeout_secs: u64,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            source: SourceKind::Yahoo,
            csv_dir: PathBuf::from("data"),
            max_retries: 3,
            timeout_secs: 30,
        }
    }
}

impl DataConfig {
    pub fn yahoo_settings(&self) -> YahooSettings {
        YahooSettings {
            timeout: std::time::Duration::from_secs(self.timeout_secs),
            max_retries: self.max_retries,
            ..YahooSettings::default()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ChartsConfig {
    pub enabled: bool,
    pub histogram_bins: usize,
}

impl Default for ChartsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            histogram_bins: DEFAULT_HISTOGRAM_BINS,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SessionConfig {
    /// Stop after the first symbol whose pipeline fails.
    pub halt_on_failure: bool,
}

impl GapLabConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// `<config_dir>/gaplab/config.toml`, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("gaplab").join("config.toml"))
    }

    /// Load an explicit file (must exist), else the default path if present,
    /// else built-in defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        match Self::default_path() {
            Some(path) if path.is_file() => Self::from_file(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.simulation.default_sample_size == 0 {
            return Err(ConfigError::Invalid(
                "simulation.default_sample_size must be at least 1".into(),
            ));
        }
        if !self.simulation.default_threshold.is_finite() {
            return Err(ConfigError::Invalid(
                "simulation.default_threshold must be a finite number".into(),
            ));
        }
        if self.charts.histogram_bins == 0 {
            return Err(ConfigError::Invalid(
                "charts.histogram_bins must be at least 1".into(),
            ));
        }
        if self.charts.histogram_bins > MAX_HISTOGRAM_BINS {
            return Err(ConfigError::Invalid(format!(
                "charts.histogram_bins must be at most {MAX_HISTOGRAM_BINS}"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_all_defaults() {
        let config = GapLabConfig::from_toml_str("").unwrap();
        assert_eq!(config, GapLabConfig::default());
        assert_eq!(config.simulation.seed, 42);
        assert_eq!(config.simulation.default_sample_size, 1000);
        assert_eq!(config.simulation.default_threshold, 0.0);
        assert_eq!(config.charts.histogram_bins, 20);
        assert!(config.charts.enabled);
        assert!(!config.session.halt_on_failure);
        assert_eq!(config.data.source, SourceKind::Yahoo);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = GapLabConfig::from_toml_str(
            r#"
            [simulation]
            seed = 7

            [data]
            source = "csv"
            csv_dir = "/tmp/bars"
            "#,
        )
        .unwrap();
        assert_eq!(config.simulation.seed, 7);
        assert_eq!(config.simulation.default_sample_size, 1000);
        assert_eq!(config.data.source, SourceKind::Csv);
        assert_eq!(config.data.csv_dir, PathBuf::from("/tmp/bars"));
        assert_eq!(config.data.max_retries, 3);
    }

    #[test]
    fn zero_bins_is_invalid() {
        let err = GapLabConfig::from_toml_str("[charts]\nhistogram_bins = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn bin_count_is_capped() {
        let ok = format!("[charts]\nhistogram_bins = {MAX_HISTOGRAM_BINS}\n");
        assert!(GapLabConfig::from_toml_str(&ok).is_ok());

        let err = GapLabConfig::from_toml_str("[charts]\nhistogram_bins = 65536\n").unwrap_err();
        assert!(err.to_string().contains("at most 200"));
    }

    #[test]
    fn zero_sample_size_is_invalid() {
        let err =
            GapLabConfig::from_toml_str("[simulation]\ndefault_sample_size = 0\n").unwrap_err();
        assert!(err.to_string().contains("default_sample_size"));
    }

    #[test]
    fn unknown_source_is_parse_error() {
        let err = GapLabConfig::from_toml_str("[data]\nsource = \"bloomberg\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn explicit_missing_file_is_error() {
        let err = GapLabConfig::load(Some(Path::new("/no/such/gaplab.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn explicit_file_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gaplab.toml");
        std::fs::write(&path, "[session]\nhalt_on_failure = true\n").unwrap();
        let config = GapLabConfig::load(Some(&path)).unwrap();
        assert!(config.session.halt_on_failure);
    }

    #[test]
    fn yahoo_settings_follow_config() {
        let mut data = DataConfig::default();
        data.timeout_secs = 5;
        data.max_retries = 1;
        let settings = data.yahoo_settings();
        assert_eq!(settings.timeout, std::time::Duration::from_secs(5));
        assert_eq!(settings.max_retries, 1);
    }

    #[test]
    fn config_serialization_roundtrip() {
        let config = GapLabConfig::default();
        let text = toml::to_string(&config).unwrap();
        assert_eq!(GapLabConfig::from_toml_str(&text).unwrap(), config);
    }
}
