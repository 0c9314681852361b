//! Average True Range (ATR), streaming.
//!
//! Two phases:
//! - warmup (first `period` bars): cumulative mean of the true ranges seen so
//!   far, so bar `period - 1` carries the usual SMA seed;
//! - afterwards: Wilder smoothing, `atr += (tr - atr) / period`
//!   (EMA with alpha = 1/period).

use crate::config::{require_positive, ConfigError};

#[derive(Debug, Clone)]
pub struct AtrTracker {
    period: usize,
    value: f64,
    bars_seen: usize,
    warmup_sum: f64,
}

impl AtrTracker {
    pub fn new(period: usize) -> Result<Self, ConfigError> {
        require_positive("atr_period", period)?;
        Ok(Self {
            period,
            value: 0.0,
            bars_seen: 0,
            warmup_sum: 0.0,
        })
    }

    pub fn period(&self) -> usize {
        self.period
    }

    /// Current smoothed value (0.0 before the first update).
    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn bars_seen(&self) -> usize {
        self.bars_seen
    }

    /// True once the Wilder phase has started.
    pub fn is_seeded(&self) -> bool {
        self.bars_seen >= self.period
    }

    pub fn update(&mut self, true_range: f64) -> f64 {
        if self.bars_seen < self.period {
            self.warmup_sum += true_range;
            self.value = self.warmup_sum / (self.bars_seen + 1) as f64;
        } else {
            self.value += (true_range - self.value) / self.period as f64;
        }
        self.bars_seen += 1;
        self.value
    }
}
