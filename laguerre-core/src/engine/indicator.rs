//! The ATR-adaptive Laguerre RSI over a whole bar series.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::{ConfigError, LaguerreConfig};
use crate::domain::{Bar, BarError};

use super::intermediates::IntermediateValues;
use super::state::LaguerreState;

/// Errors from a run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("invalid bar at index {index}: {source}")]
    InvalidBar {
        index: usize,
        #[source]
        source: BarError,
    },
    #[error("insufficient data: need at least {required} bar(s), got {got}")]
    InsufficientData { required: usize, got: usize },
}

/// Result of a run: the oscillator and the intermediates behind it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaguerreOutput {
    pub rsi: Vec<f64>,
    pub intermediates: IntermediateValues,
    /// Bars before this index are warmup-degraded.
    pub min_lookback: usize,
}

impl LaguerreOutput {
    pub fn len(&self) -> usize {
        self.rsi.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rsi.is_empty()
    }

    /// Whether bar `index` lies past the warmup.
    pub fn is_warm(&self, index: usize) -> bool {
        index + 1 >= self.min_lookback
    }
}

/// Validated indicator. Cheap to clone, holds no per-run state.
#[derive(Debug, Clone, PartialEq)]
pub struct AtrAdaptiveLaguerreRsi {
    config: LaguerreConfig,
}

impl AtrAdaptiveLaguerreRsi {
    pub fn new(config: LaguerreConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &LaguerreConfig {
        &self.config
    }

    pub fn name(&self) -> String {
        format!(
            "atr_laguerre_rsi_{}_{}",
            self.config.atr_period, self.config.smoothing_period
        )
    }

    /// Bars required before outputs are considered stable:
    /// `max(atr_period, adaptive_lookback) + smoothing_period`.
    pub fn min_lookback(&self) -> usize {
        self.config.min_lookback()
    }

    /// Fresh streaming state for incremental use.
    pub fn state(&self) -> Result<LaguerreState, ConfigError> {
        LaguerreState::new(&self.config)
    }

    /// Run over a full series in one pass.
    ///
    /// A bad bar fails the whole run; no partial output is returned.
    pub fn run(&self, bars: &[Bar]) -> Result<LaguerreOutput, EngineError> {
        if bars.is_empty() {
            return Err(EngineError::InsufficientData {
                required: 1,
                got: 0,
            });
        }

        let min_lookback = self.min_lookback();
        if bars.len() < min_lookback {
            warn!(
                bars = bars.len(),
                min_lookback,
                "fewer bars than warmup; every output is warmup-degraded"
            );
        }

        let mut state = self.state()?;
        let mut rsi = Vec::with_capacity(bars.len());
        let mut intermediates = IntermediateValues::with_capacity(bars.len());

        for (index, bar) in bars.iter().enumerate() {
            let out = state
                .update(bar)
                .map_err(|source| EngineError::InvalidBar { index, source })?;
            rsi.push(out.rsi);
            intermediates.push(&out);
        }

        debug!(
            indicator = %self.name(),
            bars = bars.len(),
            min_lookback,
            "run complete"
        );

        Ok(LaguerreOutput {
            rsi,
            intermediates,
            min_lookback,
        })
    }
}
