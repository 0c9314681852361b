//! Warmup tracking.
//!
//! Bars inside the warmup are still emitted, only flagged so callers can
//! discard or down-weight them.

/// Warmup state tracker
#[derive(Debug, Clone)]
pub struct WarmupState {
    warmup_bars: usize,
    bars_processed: usize,
}

impl WarmupState {
    pub fn new(warmup_bars: usize) -> Self {
        Self {
            warmup_bars,
            bars_processed: 0,
        }
    }

    pub fn warmup_bars(&self) -> usize {
        self.warmup_bars
    }

    pub fn bars_processed(&self) -> usize {
        self.bars_processed
    }

    pub fn process_bar(&mut self) {
        self.bars_processed += 1;
    }

    /// True once `warmup_bars` bars have been processed.
    pub fn is_warm(&self) -> bool {
        self.bars_processed >= self.warmup_bars
    }

    pub fn bars_until_warm(&self) -> usize {
        self.warmup_bars.saturating_sub(self.bars_processed)
    }
}
