//! Deterministic synthetic bars for tests, benches and the CLI.
//!
//! The generator and the walk are fully pinned down (SplitMix64, fixed draw
//! order per bar) so a recorded fixture can be reproduced anywhere.

use chrono::DateTime;
use rand::{RngCore, SeedableRng};
use rand_xoshiro::SplitMix64;

use crate::domain::Bar;

/// 2024-01-01T00:00:00Z
const START_EPOCH_SECS: i64 = 1_704_067_200;
const BAR_SECS: i64 = 300;

const START_PRICE: f64 = 100.0;
const PRICE_FLOOR: f64 = 1.0;
const STEP: f64 = 1.0;
const OPEN_JITTER: f64 = 0.6;
const WICK: f64 = 0.4;

/// Uniform draw in `[0, 1)` from the top 53 bits of one `u64`.
pub fn next_unit<R: RngCore + ?Sized>(rng: &mut R) -> f64 {
    (rng.next_u64() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
}

/// Random-walk OHLCV bars at 5-minute spacing from 2024-01-01.
///
/// Per bar, five draws in order: close step, open jitter, upper wick,
/// lower wick, volume.
pub fn synthetic_bars(n: usize, seed: u64) -> Vec<Bar> {
    let mut rng = SplitMix64::seed_from_u64(seed);
    let mut close = START_PRICE;
    let mut bars = Vec::with_capacity(n);

    for i in 0..n {
        close = (close + (next_unit(&mut rng) - 0.5) * STEP).max(PRICE_FLOOR);
        let open = close + (next_unit(&mut rng) - 0.5) * OPEN_JITTER;
        let high = open.max(close) + next_unit(&mut rng) * WICK;
        let low = open.min(close) - next_unit(&mut rng) * WICK;
        let volume = 1000.0 + (next_unit(&mut rng) * 9000.0).floor();
        let timestamp = DateTime::from_timestamp(START_EPOCH_SECS + i as i64 * BAR_SECS, 0)
            .map(|dt| dt.naive_utc());

        bars.push(Bar {
            open,
            high,
            low,
            close,
            volume,
            timestamp,
        });
    }
    bars
}
