//! Laguerre gamma from the adaptive coefficient.
//!
//! The smoothing period is stretched or shrunk by volatility, then mapped to a
//! damping factor with the usual Laguerre period conversion:
//!
//! ```text
//! period = smoothing_period * (1.75 - coeff)     in [0.75 s, 1.75 s]
//! gamma  = 1 - 10 / (period + 9)
//! ```
//!
//! High volatility (coeff → 1) gives a shorter period and a lower, more
//! responsive gamma. The result is clamped into `[GAMMA_EPSILON, 1 - GAMMA_EPSILON]`.

/// Distance kept from 0 and 1.
pub const GAMMA_EPSILON: f64 = 1e-6;

const PERIOD_FLOOR: f64 = 0.75;

pub fn gamma(adaptive_coeff: f64, smoothing_period: usize) -> f64 {
    let period = smoothing_period as f64 * (1.0 + PERIOD_FLOOR - adaptive_coeff);
    let g = 1.0 - 10.0 / (period + 9.0);
    g.clamp(GAMMA_EPSILON, 1.0 - GAMMA_EPSILON)
}
