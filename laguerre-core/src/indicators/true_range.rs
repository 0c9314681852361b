//! True Range.
//!
//! TR[0] = high - low (no previous close).
//! TR[t] = max(high - low, |high - close[t-1]|, |low - close[t-1]|).

use crate::domain::BarError;

#[derive(Debug, Clone, Default)]
pub struct TrueRangeTracker {
    prev_close: Option<f64>,
}

impl TrueRangeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prev_close(&self) -> Option<f64> {
        self.prev_close
    }

    /// Consume one bar and return its true range.
    ///
    /// On error the previous close is left untouched.
    pub fn update(&mut self, high: f64, low: f64, close: f64) -> Result<f64, BarError> {
        for (field, value) in [("high", high), ("low", low), ("close", close)] {
            if !value.is_finite() {
                return Err(BarError::NonFinite { field, value });
            }
        }
        if high < low {
            return Err(BarError::HighBelowLow { high, low });
        }

        let tr = match self.prev_close {
            None => high - low,
            Some(pc) => (high - low).max((high - pc).abs()).max((low - pc).abs()),
        };
        self.prev_close = Some(close);
        Ok(tr)
    }
}
