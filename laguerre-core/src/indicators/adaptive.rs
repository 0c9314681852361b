//! ATR-based adaptive coefficient.
//!
//! The current ATR is located within the min/max of the last `lookback` ATR
//! values (current bar included):
//!
//! ```text
//! pos   = (atr - min) / (max - min)     if max > min, else 0
//! coeff = clamp(pos ^ k, 0, 1)          k = ln(offset) / ln(0.5)
//! ```
//!
//! `k` is chosen so that `pos = 0.5` maps to `offset`. With `offset = 0.5`
//! the mapping is the identity. The curve is monotonic and fixes 0 and 1.

use std::collections::VecDeque;

use crate::config::{require_positive, ConfigError};

/// One reading of the adaptive coefficient and the window bounds behind it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdaptiveReading {
    pub coeff: f64,
    pub min_atr: f64,
    pub max_atr: f64,
}

#[derive(Debug, Clone)]
pub struct AdaptiveCoefficient {
    lookback: usize,
    exponent: f64,
    window: VecDeque<f64>,
}

impl AdaptiveCoefficient {
    pub fn new(lookback: usize, offset: f64) -> Result<Self, ConfigError> {
        require_positive("adaptive_lookback", lookback)?;
        if !(offset > 0.0 && offset < 1.0) {
            return Err(ConfigError::OffsetOutOfRange(offset));
        }
        Ok(Self {
            lookback,
            exponent: offset.ln() / 0.5_f64.ln(),
            window: VecDeque::with_capacity(lookback),
        })
    }

    pub fn lookback(&self) -> usize {
        self.lookback
    }

    /// Number of ATR values currently held (never above `lookback`).
    pub fn len(&self) -> usize {
        self.window.len()
    }

    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }

    pub fn update(&mut self, atr: f64) -> AdaptiveReading {
        if self.window.len() == self.lookback {
            self.window.pop_front();
        }
        self.window.push_back(atr);

        let (min_atr, max_atr) = self
            .window
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });

        let pos = if max_atr > min_atr {
            (atr - min_atr) / (max_atr - min_atr)
        } else {
            // Flat volatility: nothing to normalize against.
            0.0
        };

        AdaptiveReading {
            coeff: self.remap(pos),
            min_atr,
            max_atr,
        }
    }

    fn remap(&self, pos: f64) -> f64 {
        pos.clamp(0.0, 1.0).powf(self.exponent).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    #[test]
    fn rejects_bad_parameters() {
        assert!(matches!(
            AdaptiveCoefficient::new(0, 0.5),
            Err(ConfigError::NonPositive { .. })
        ));
        assert!(matches!(
            AdaptiveCoefficient::new(5, 1.0),
            Err(ConfigError::OffsetOutOfRange(_))
        ));
        assert!(matches!(
            AdaptiveCoefficient::new(5, 0.0),
            Err(ConfigError::OffsetOutOfRange(_))
        ));
    }

    #[test]
    fn first_value_is_degenerate() {
        let mut ac = AdaptiveCoefficient::new(3, 0.5).unwrap();
        let r = ac.update(2.0);
        assert_eq!(r.coeff, 0.0);
        assert_eq!(r.min_atr, 2.0);
        assert_eq!(r.max_atr, 2.0);
    }

    #[test]
    fn identity_at_half_offset() {
        let mut ac = AdaptiveCoefficient::new(3, 0.5).unwrap();
        ac.update(1.0);
        ac.update(3.0);
        // window [1, 3, 2] → pos = 0.5
        let r = ac.update(2.0);
        assert_eq!(r.coeff, 0.5);
        assert_eq!((r.min_atr, r.max_atr), (1.0, 3.0));
    }

    #[test]
    fn midpoint_maps_to_offset() {
        for offset in [0.1, 0.3, 0.75, 0.9] {
            let mut ac = AdaptiveCoefficient::new(3, offset).unwrap();
            ac.update(1.0);
            ac.update(3.0);
            let r = ac.update(2.0);
            assert_approx(r.coeff, offset, DEFAULT_EPSILON);
        }
    }

    #[test]
    fn window_evicts_oldest() {
        let mut ac = AdaptiveCoefficient::new(3, 0.5).unwrap();
        ac.update(10.0);
        ac.update(1.0);
        ac.update(2.0);
        assert_eq!(ac.len(), 3);
        // 10.0 drops out: window [1, 2, 3]
        let r = ac.update(3.0);
        assert_eq!(ac.len(), 3);
        assert_eq!((r.min_atr, r.max_atr), (1.0, 3.0));
        assert_eq!(r.coeff, 1.0);
    }

    #[test]
    fn current_minimum_maps_to_zero() {
        let mut ac = AdaptiveCoefficient::new(4, 0.8).unwrap();
        ac.update(5.0);
        let r = ac.update(1.0);
        assert_eq!(r.coeff, 0.0);
    }

    #[test]
    fn remap_is_monotonic_and_bounded() {
        for offset in [0.05, 0.25, 0.5, 0.7, 0.95] {
            let ac = AdaptiveCoefficient::new(1, offset).unwrap();
            let mut prev = -1.0;
            for i in 0..=100 {
                let c = ac.remap(i as f64 / 100.0);
                assert!((0.0..=1.0).contains(&c));
                assert!(c >= prev, "offset {offset}: not monotonic at {i}");
                prev = c;
            }
            assert_eq!(ac.remap(0.0), 0.0);
            assert_approx(ac.remap(1.0), 1.0, DEFAULT_EPSILON);
        }
    }

    #[test]
    fn lookback_one_is_always_flat() {
        let mut ac = AdaptiveCoefficient::new(1, 0.5).unwrap();
        for atr in [1.0, 5.0, 0.5] {
            let r = ac.update(atr);
            assert_eq!(r.coeff, 0.0);
            assert_eq!(r.min_atr, r.max_atr);
        }
    }
}
