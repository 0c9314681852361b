//! Bar: the fundamental market data unit.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// OHLCV bar consumed by the indicator.
///
/// Only `high`, `low` and `close` feed the computation. `open`, `volume` and
/// `timestamp` are carried through untouched for downstream consumers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default)]
    pub volume: f64,
    #[serde(default)]
    pub timestamp: Option<NaiveDateTime>,
}

/// A bar the indicator refuses to consume.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BarError {
    #[error("high ({high}) is below low ({low})")]
    HighBelowLow { high: f64, low: f64 },
    #[error("{field} is not finite ({value})")]
    NonFinite { field: &'static str, value: f64 },
}

impl Bar {
    /// Bar without volume or timestamp.
    pub fn ohlc(open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            open,
            high,
            low,
            close,
            volume: 0.0,
            timestamp: None,
        }
    }

    /// Check the fields the indicator consumes.
    ///
    /// `open` is deliberately not inspected: it is pass-through data.
    pub fn validate(&self) -> Result<(), BarError> {
        for (field, value) in [("high", self.high), ("low", self.low), ("close", self.close)] {
            if !value.is_finite() {
                return Err(BarError::NonFinite { field, value });
            }
        }
        if self.high < self.low {
            return Err(BarError::HighBelowLow {
                high: self.high,
                low: self.low,
            });
        }
        Ok(())
    }
}
