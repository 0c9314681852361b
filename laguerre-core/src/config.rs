//! Validated configuration for the indicator and the feature expander.
//!
//! Both structs deserialize from TOML. Validation happens once, when an
//! `AtrAdaptiveLaguerreRsi` or `FeatureExpander` is constructed; nothing is
//! re-checked mid-stream.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Invalid construction parameters.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{field} must be >= 1, got {value}")]
    NonPositive { field: &'static str, value: usize },
    #[error("adaptive_offset must lie strictly inside (0, 1), got {0}")]
    OffsetOutOfRange(f64),
    #[error("levels must satisfy 0 < level_down ({level_down}) < level_up ({level_up}) < 1")]
    InvalidLevels { level_down: f64, level_up: f64 },
    #[error("warmup window {window} + smoothing_period {smoothing_period} overflows usize")]
    LookbackOverflow { window: usize, smoothing_period: usize },
    #[error("failed to parse config: {0}")]
    Parse(String),
}

pub(crate) fn require_positive(field: &'static str, value: usize) -> Result<(), ConfigError> {
    if value < 1 {
        return Err(ConfigError::NonPositive { field, value });
    }
    Ok(())
}

/// Parameters of the ATR-adaptive Laguerre RSI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LaguerreConfig {
    /// Wilder smoothing period for the ATR.
    pub atr_period: usize,
    /// Base period mapped to the Laguerre gamma.
    pub smoothing_period: usize,
    /// Size of the ATR min/max window. `None` uses `atr_period`.
    pub adaptive_lookback: Option<usize>,
    /// Coefficient reached at the midpoint of the ATR range.
    pub adaptive_offset: f64,
}

impl Default for LaguerreConfig {
    fn default() -> Self {
        Self {
            atr_period: 14,
            smoothing_period: 3,
            adaptive_lookback: None,
            adaptive_offset: 0.5,
        }
    }
}

impl LaguerreConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_positive("atr_period", self.atr_period)?;
        require_positive("smoothing_period", self.smoothing_period)?;
        if let Some(lookback) = self.adaptive_lookback {
            require_positive("adaptive_lookback", lookback)?;
        }
        if !(self.adaptive_offset > 0.0 && self.adaptive_offset < 1.0) {
            return Err(ConfigError::OffsetOutOfRange(self.adaptive_offset));
        }
        let window = self.atr_period.max(self.adaptive_lookback());
        if window.checked_add(self.smoothing_period).is_none() {
            return Err(ConfigError::LookbackOverflow {
                window,
                smoothing_period: self.smoothing_period,
            });
        }
        Ok(())
    }

    /// Effective ATR window size.
    pub fn adaptive_lookback(&self) -> usize {
        self.adaptive_lookback.unwrap_or(self.atr_period)
    }

    /// Bars required before outputs are considered stable.
    ///
    /// Saturates on configs that fail [`Self::validate`].
    pub fn min_lookback(&self) -> usize {
        self.atr_period
            .max(self.adaptive_lookback())
            .saturating_add(self.smoothing_period)
    }
}

/// Parameters of the feature expander.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExpanderConfig {
    /// Upper regime threshold (bullish above).
    pub level_up: f64,
    /// Lower regime threshold (bearish below).
    pub level_down: f64,
    /// Trailing window for rolling statistics.
    pub stats_window: usize,
    /// EMA span of the RSI velocity.
    pub velocity_span: usize,
}

impl Default for ExpanderConfig {
    fn default() -> Self {
        Self {
            level_up: 0.85,
            level_down: 0.15,
            stats_window: 20,
            velocity_span: 5,
        }
    }
}

impl ExpanderConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ordered = 0.0 < self.level_down && self.level_down < self.level_up && self.level_up < 1.0;
        if !ordered {
            return Err(ConfigError::InvalidLevels {
                level_down: self.level_down,
                level_up: self.level_up,
            });
        }
        require_positive("stats_window", self.stats_window)?;
        require_positive("velocity_span", self.velocity_span)?;
        Ok(())
    }
}

/// On-disk configuration file: an `[indicator]` and a `[features]` table.
///
/// ```toml
/// [indicator]
/// atr_period = 14
/// smoothing_period = 3
/// adaptive_offset = 0.5
///
/// [features]
/// level_up = 0.85
/// level_down = 0.15
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub indicator: LaguerreConfig,
    pub features: ExpanderConfig,
}

impl FileConfig {
    /// Parse and validate both tables.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: FileConfig = toml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.indicator.validate()?;
        config.features.validate()?;
        Ok(config)
    }
}
