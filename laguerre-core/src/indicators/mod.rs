//! Streaming building blocks of the ATR-adaptive Laguerre RSI.
//!
//! Each tracker consumes one value per bar and keeps only the state it needs
//! for the next bar. None of them looks ahead; the engine chains them:
//!
//! true range → ATR → adaptive coefficient → gamma → Laguerre filter.

pub mod adaptive;
pub mod atr;
pub mod gamma;
pub mod laguerre;
pub mod true_range;

pub use adaptive::{AdaptiveCoefficient, AdaptiveReading};
pub use atr::AtrTracker;
pub use gamma::{gamma, GAMMA_EPSILON};
pub use laguerre::{LaguerreFilter, LaguerreReading, NEUTRAL_RSI};
pub use true_range::TrueRangeTracker;

/// Create synthetic bars from close prices for testing.
///
/// open = prev_close (or close for first bar),
/// high = max(open,close) + 1.0, low = min(open,close) - 1.0.
#[cfg(test)]
pub fn make_bars(closes: &[f64]) -> Vec<crate::domain::Bar> {
    use crate::domain::Bar;
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            Bar::ohlc(open, open.max(close) + 1.0, open.min(close) - 1.0, close)
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
