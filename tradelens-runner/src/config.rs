//! Serializable analysis configuration.
//!
//! Every section is optional in TOML; missing sections and fields take the
//! same defaults as the core components.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use tradelens_core::analytics::AggregatorConfig;
use tradelens_core::indicators::DEFAULT_RSI_PERIOD;
use tradelens_core::patterns::PatternThresholds;
use tradelens_core::position::TrackerConfig;

/// Largest accepted UTC offset, in minutes.
pub const MAX_UTC_OFFSET_MINUTES: i32 = 24 * 60;

/// Errors from loading or validating an [`AnalysisConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),

    #[error("failed to fingerprint config: {0}")]
    Fingerprint(#[from] serde_json::Error),
}

/// MACD periods.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MacdOptions {
    pub fast: usize,
    pub slow: usize,
    pub signal: usize,
}

impl Default for MacdOptions {
    fn default() -> Self {
        Self {
            fast: 12,
            slow: 26,
            signal: 9,
        }
    }
}

/// Which indicators an indicator request computes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorOptions {
    /// One SMA series per period.
    pub sma: Vec<usize>,
    pub rsi: usize,
    pub macd: MacdOptions,
    /// Run the chart pattern detectors.
    pub patterns: bool,
}

impl Default for IndicatorOptions {
    fn default() -> Self {
        Self {
            sma: vec![20, 50],
            rsi: DEFAULT_RSI_PERIOD,
            macd: MacdOptions::default(),
            patterns: true,
        }
    }
}

/// Top-level configuration for an analysis run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub indicators: IndicatorOptions,
    pub patterns: PatternThresholds,
    pub analytics: AggregatorConfig,
    pub positions: TrackerConfig,
}

impl AnalysisConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: AnalysisConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text)
    }

    /// Reject settings the components would silently turn into empty output.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ind = &self.indicators;
        if let Some(&zero) = ind.sma.iter().find(|&&p| p == 0) {
            return Err(ConfigError::Invalid(format!(
                "indicators.sma periods must be positive (got {zero})"
            )));
        }
        if ind.rsi == 0 {
            return Err(ConfigError::Invalid(
                "indicators.rsi period must be positive".into(),
            ));
        }
        let macd = &ind.macd;
        if macd.fast == 0 || macd.slow == 0 || macd.signal == 0 {
            return Err(ConfigError::Invalid(
                "indicators.macd periods must be positive".into(),
            ));
        }
        if macd.fast >= macd.slow {
            return Err(ConfigError::Invalid(format!(
                "indicators.macd.fast ({}) must be less than slow ({})",
                macd.fast, macd.slow
            )));
        }

        let offset = self.analytics.utc_offset_minutes;
        if offset.abs() >= MAX_UTC_OFFSET_MINUTES {
            return Err(ConfigError::Invalid(format!(
                "analytics.utc_offset_minutes must be within ±{MAX_UTC_OFFSET_MINUTES} (got {offset})"
            )));
        }
        if self.analytics.position_bucket_width == 0 {
            return Err(ConfigError::Invalid(
                "analytics.position_bucket_width must be positive".into(),
            ));
        }
        Ok(())
    }

    /// BLAKE3 hex digest of the canonical JSON form. Equal configs share a hash.
    pub fn fingerprint(&self) -> Result<String, ConfigError> {
        let json = serde_json::to_vec(self)?;
        Ok(blake3::hash(&json).to_hex().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tradelens_core::pnl::PnlModel;

    #[test]
    fn empty_document_uses_defaults() {
        let config = AnalysisConfig::from_toml("").unwrap();
        assert_eq!(config, AnalysisConfig::default());
        assert_eq!(config.analytics.pnl_model, PnlModel::Derived);
        assert_eq!(config.positions.pnl_model, PnlModel::BrokerSupplied);
        assert_eq!(config.indicators.macd.slow, 26);
    }

    #[test]
    fn partial_sections_merge_with_defaults() {
        let text = r#"
            [indicators]
            sma = [10]

            [indicators.macd]
            fast = 5

            [patterns]
            cup_min_depth = 0.2

            [analytics]
            pnl_model = "broker_supplied"
            utc_offset_minutes = -300
        "#;
        let config = AnalysisConfig::from_toml(text).unwrap();
        assert_eq!(config.indicators.sma, vec![10]);
        assert_eq!(config.indicators.rsi, 14);
        assert_eq!(config.indicators.macd.fast, 5);
        assert_eq!(config.indicators.macd.slow, 26);
        assert_eq!(config.patterns.cup_min_depth, 0.2);
        assert_eq!(config.patterns.cup_max_depth, 0.45);
        assert_eq!(config.analytics.pnl_model, PnlModel::BrokerSupplied);
        assert_eq!(config.analytics.utc_offset_minutes, -300);
        assert_eq!(config.analytics.position_bucket_width, 100);
    }

    #[test]
    fn rejects_zero_periods() {
        let err = AnalysisConfig::from_toml("[indicators]\nsma = [20, 0]").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        let err = AnalysisConfig::from_toml("[indicators]\nrsi = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_fast_not_below_slow() {
        let err =
            AnalysisConfig::from_toml("[indicators.macd]\nfast = 26\nslow = 26").unwrap_err();
        assert!(err.to_string().contains("must be less than slow"));
    }

    #[test]
    fn rejects_out_of_range_offset_and_zero_width() {
        let err = AnalysisConfig::from_toml("[analytics]\nutc_offset_minutes = 1440").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        let err =
            AnalysisConfig::from_toml("[analytics]\nposition_bucket_width = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = AnalysisConfig::from_toml("[indicators\nsma = ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = AnalysisConfig::from_file(Path::new("/nonexistent/tradelens.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn fingerprint_is_deterministic() {
        let a = AnalysisConfig::default();
        let mut b = AnalysisConfig::default();
        assert_eq!(a.fingerprint().unwrap(), b.fingerprint().unwrap());
        b.indicators.rsi = 7;
        assert_ne!(a.fingerprint().unwrap(), b.fingerprint().unwrap());
        assert_eq!(a.fingerprint().unwrap().len(), 64);
    }
}
