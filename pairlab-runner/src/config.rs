//! Pipeline configuration, loaded from TOML.
//!
//! Every field has a default, so an empty file (or no file) reproduces the
//! standard screen: two years of history, p < 0.05, H < 0.5, half-life in
//! (1, 252) days, more than 12 mean crossings.

use pairlab_core::screen::{CointegrationScreen, CrossingScreen, HalfLifeScreen, HurstScreen};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("cannot serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

/// Upper bound on `data.max_retries`.
pub const MAX_RETRIES: u32 = 10;

/// Data acquisition settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DataConfig {
    /// Calendar days of history requested, ending at the run date.
    pub lookback_days: u32,
    /// Symbols with fewer observations are excluded.
    pub min_history: usize,
    /// Worker threads for fetching.
    pub concurrency: usize,
    pub request_timeout_secs: u64,
    pub max_retries: u32,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            lookback_days: 730,
            min_history: 252,
            concurrency: 4,
            request_timeout_secs: 30,
            max_retries: 3,
        }
    }
}

/// Execution settings for the screening stages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunSettings {
    /// Screen pairs on a rayon pool.
    pub parallel: bool,
    /// Pool size; 0 uses the rayon default.
    pub threads: usize,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            parallel: true,
            threads: 0,
        }
    }
}

/// Complete configuration of one screening run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    pub data: DataConfig,
    pub cointegration: CointegrationScreen,
    pub hurst: HurstScreen,
    pub half_life: HalfLifeScreen,
    pub crossing: CrossingScreen,
    pub run: RunSettings,
}

impl PipelineConfig {
    /// Load and validate a config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let data = &self.data;
        if data.concurrency == 0 {
            return Err(invalid("data.concurrency", "must be at least 1"));
        }
        if data.min_history < 2 {
            return Err(invalid("data.min_history", "must be at least 2"));
        }
        if data.lookback_days == 0 {
            return Err(invalid("data.lookback_days", "must be positive"));
        }
        if data.max_retries > MAX_RETRIES {
            return Err(invalid(
                "data.max_retries",
                format!("{} exceeds the limit of {MAX_RETRIES}", data.max_retries),
            ));
        }

        let coint = &self.cointegration;
        if !(coint.significance > 0.0 && coint.significance < 1.0) {
            return Err(invalid(
                "cointegration.significance",
                format!("{} is not in (0, 1)", coint.significance),
            ));
        }
        if coint.min_overlap < 3 {
            return Err(invalid("cointegration.min_overlap", "must be at least 3"));
        }

        let hurst = &self.hurst;
        if hurst.min_lag < 1 {
            return Err(invalid("hurst.min_lag", "must be at least 1"));
        }
        if hurst.max_lag <= hurst.min_lag + 1 {
            return Err(invalid(
                "hurst.max_lag",
                format!("must exceed min_lag + 1 (min_lag = {})", hurst.min_lag),
            ));
        }
        if hurst.min_valid_lags < 2 {
            return Err(invalid("hurst.min_valid_lags", "must be at least 2"));
        }
        if !hurst.max_hurst.is_finite() {
            return Err(invalid("hurst.max_hurst", "must be finite"));
        }

        let hl = &self.half_life;
        if !(hl.min_days >= 0.0 && hl.min_days < hl.max_days) {
            return Err(invalid(
                "half_life",
                format!("need 0 <= min_days < max_days, got ({}, {})", hl.min_days, hl.max_days),
            ));
        }

        Ok(())
    }
}
