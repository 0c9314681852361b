//! Golden fixture: 600 synthetic bars against a recorded RSI series.
//!
//! Pins every numeric convention at once (first-bar true range, ATR warmup
//! crossover, flat-volatility coefficient, filter seeding). Regenerate with
//! `LAGUERRE_BLESS=1 cargo test --test golden_fixture` after an intended
//! change and review the diff.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use laguerre_core::config::LaguerreConfig;
use laguerre_core::engine::AtrAdaptiveLaguerreRsi;
use laguerre_core::synthetic::synthetic_bars;

const TOLERANCE: f64 = 1e-9;

#[derive(Debug, Serialize, Deserialize)]
struct Golden {
    seed: u64,
    n_bars: usize,
    atr_period: usize,
    smoothing_period: usize,
    adaptive_offset: f64,
    rsi: Vec<f64>,
    atr: Vec<f64>,
}

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/golden_rsi_600.json")
}

fn compute(seed: u64, n_bars: usize, config: LaguerreConfig) -> Golden {
    let indicator = AtrAdaptiveLaguerreRsi::new(config.clone()).unwrap();
    let out = indicator.run(&synthetic_bars(n_bars, seed)).unwrap();
    Golden {
        seed,
        n_bars,
        atr_period: config.atr_period,
        smoothing_period: config.smoothing_period,
        adaptive_offset: config.adaptive_offset,
        rsi: out.rsi,
        atr: out.intermediates.atr,
    }
}

fn assert_series_close(name: &str, got: &[f64], want: &[f64]) {
    assert_eq!(got.len(), want.len(), "{name}: length");
    for (i, (g, w)) in got.iter().zip(want).enumerate() {
        assert!(
            (g - w).abs() <= TOLERANCE,
            "{name}[{i}]: got {g}, recorded {w}, diff {}",
            (g - w).abs()
        );
    }
}

#[test]
fn golden_rsi_600() {
    let config = LaguerreConfig {
        atr_period: 14,
        smoothing_period: 3,
        adaptive_lookback: None,
        adaptive_offset: 0.5,
    };
    let got = compute(42, 600, config);

    if std::env::var("LAGUERRE_BLESS").as_deref() == Ok("1") {
        let json = serde_json::to_string_pretty(&got).unwrap();
        std::fs::write(fixture_path(), json).unwrap();
        return;
    }

    let text = std::fs::read_to_string(fixture_path()).unwrap();
    let want: Golden = serde_json::from_str(&text).unwrap();
    assert_eq!(
        (want.seed, want.n_bars, want.atr_period, want.smoothing_period),
        (42, 600, 14, 3)
    );
    assert_eq!(want.adaptive_offset, 0.5);

    assert_series_close("atr", &got.atr, &want.atr);
    assert_series_close("rsi", &got.rsi, &want.rsi);
}

#[test]
fn golden_first_bars() {
    let text = std::fs::read_to_string(fixture_path()).unwrap();
    let want: Golden = serde_json::from_str(&text).unwrap();
    let bars = synthetic_bars(1, 42);

    assert_eq!(want.rsi[0], 0.5);
    // first true range is the bar's own range, and the ATR starts there
    assert!((want.atr[0] - (bars[0].high - bars[0].low)).abs() <= TOLERANCE);
    assert!(want.rsi.iter().all(|r| (0.0..=1.0).contains(r)));
}
