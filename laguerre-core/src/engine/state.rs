//! Per-run streaming state.

use crate::config::{ConfigError, LaguerreConfig};
use crate::domain::{Bar, BarError};
use crate::indicators::{gamma, AdaptiveCoefficient, AtrTracker, LaguerreFilter, TrueRangeTracker};

use super::intermediates::BarOutput;
use super::warmup::WarmupState;

/// All mutable state of one run, advanced one bar at a time.
///
/// A `LaguerreState` belongs to exactly one bar stream. Independent streams
/// (symbols, intervals) each get their own instance and can run on separate
/// threads.
#[derive(Debug, Clone)]
pub struct LaguerreState {
    smoothing_period: usize,
    true_range: TrueRangeTracker,
    atr: AtrTracker,
    adaptive: AdaptiveCoefficient,
    filter: LaguerreFilter,
    warmup: WarmupState,
}

impl LaguerreState {
    pub fn new(config: &LaguerreConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            smoothing_period: config.smoothing_period,
            true_range: TrueRangeTracker::new(),
            atr: AtrTracker::new(config.atr_period)?,
            adaptive: AdaptiveCoefficient::new(config.adaptive_lookback(), config.adaptive_offset)?,
            filter: LaguerreFilter::new(),
            warmup: WarmupState::new(config.min_lookback()),
        })
    }

    pub fn bars_processed(&self) -> usize {
        self.warmup.bars_processed()
    }

    /// Warmup length this state was built with.
    pub fn min_lookback(&self) -> usize {
        self.warmup.warmup_bars()
    }

    pub fn bars_until_warm(&self) -> usize {
        self.warmup.bars_until_warm()
    }

    pub fn is_warm(&self) -> bool {
        self.warmup.is_warm()
    }

    /// Consume the next bar.
    ///
    /// The bar is validated before any tracker is touched, so a rejected bar
    /// leaves the state exactly as it was.
    pub fn update(&mut self, bar: &Bar) -> Result<BarOutput, BarError> {
        bar.validate()?;

        let tr = self.true_range.update(bar.high, bar.low, bar.close)?;
        let atr = self.atr.update(tr);
        let adaptive = self.adaptive.update(atr);
        let g = gamma(adaptive.coeff, self.smoothing_period);
        let stages = self.filter.update(bar.close, g);

        self.warmup.process_bar();

        Ok(BarOutput {
            rsi: stages.rsi,
            adaptive_coeff: adaptive.coeff,
            gamma: g,
            l0: stages.l0,
            l1: stages.l1,
            l2: stages.l2,
            l3: stages.l3,
            min_atr: adaptive.min_atr,
            max_atr: adaptive.max_atr,
            atr,
            close: bar.close,
            warm: self.warmup.is_warm(),
        })
    }
}
