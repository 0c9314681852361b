//! RSI feature expansion.
//!
//! Turns the single RSI column into 31 base features, or 43 when the
//! engine's intermediate values are supplied. Integer-valued features
//! (regime codes, flags, counters) are stored as `f64` like every other
//! column.

use thiserror::Error;
use tracing::debug;

use crate::config::{ConfigError, ExpanderConfig};
use crate::engine::IntermediateValues;

use super::rolling::{self, diff, ewm, lag, nonzero_or_one};

const EPS: f64 = 1e-10;
const MIDLINE: f64 = 0.5;
const SHOCK_THRESHOLD: f64 = 0.3;
const PERSISTENCE_BARS: f64 = 10.0;
const SPIKE_WINDOW: usize = 100;
const SPIKE_MIN_VALUES: usize = 20;
const SPIKE_SIGMAS: f64 = 2.0;
const EFFICIENT_TREND: f64 = 0.5;

/// Columns produced from the RSI alone, in output order.
pub const BASE_COLUMNS: [&str; 31] = [
    "rsi",
    "regime",
    "regime_bearish",
    "regime_neutral",
    "regime_bullish",
    "regime_changed",
    "bars_in_regime",
    "regime_strength",
    "dist_overbought",
    "dist_oversold",
    "dist_midline",
    "abs_dist_overbought",
    "abs_dist_oversold",
    "cross_above_oversold",
    "cross_below_overbought",
    "cross_above_midline",
    "cross_below_midline",
    "bars_since_oversold",
    "bars_since_overbought",
    "bars_since_extreme",
    "rsi_change_1",
    "rsi_change_5",
    "rsi_velocity",
    "rsi_percentile_20",
    "rsi_zscore_20",
    "rsi_volatility_20",
    "rsi_range_20",
    "rsi_shock_1bar",
    "extreme_regime_persistence",
    "rsi_volatility_spike",
    "tail_risk_score",
];

/// Columns appended when intermediates are supplied, in output order.
pub const INTERMEDIATE_COLUMNS: [&str; 12] = [
    "adaptive_coeff",
    "adaptive_coeff_roc_1",
    "gamma_value",
    "gamma_spread",
    "laguerre_spread",
    "laguerre_mid_convergence",
    "laguerre_slope",
    "atr_range_width",
    "efficiency_ratio",
    "efficiency_trend",
    "cycle_phase",
    "cycle_phase_changed",
];

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FeatureError {
    #[error("rsi[{index}] = {value} is outside [0, 1]")]
    RsiOutOfRange { index: usize, value: f64 },
    #[error("rsi length {len} is shorter than stats_window {stats_window}")]
    TooShort { len: usize, stats_window: usize },
    #[error("rsi has {rsi} rows but intermediates have {intermediates}")]
    LengthMismatch { rsi: usize, intermediates: usize },
}

/// Named feature columns of equal length, in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureFrame {
    names: Vec<&'static str>,
    columns: Vec<Vec<f64>>,
}

impl FeatureFrame {
    fn push(&mut self, name: &'static str, values: Vec<f64>) {
        debug_assert!(self.columns.first().map_or(true, |c| c.len() == values.len()));
        self.names.push(name);
        self.columns.push(values);
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.columns.first().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.names.len()
    }

    pub fn column_names(&self) -> &[&'static str] {
        &self.names
    }

    pub fn get(&self, name: &str) -> Option<&[f64]> {
        self.names
            .iter()
            .position(|n| *n == name)
            .map(|i| self.columns[i].as_slice())
    }

    pub fn columns(&self) -> impl Iterator<Item = (&'static str, &[f64])> + '_ {
        self.names
            .iter()
            .copied()
            .zip(self.columns.iter().map(Vec::as_slice))
    }

    /// Values of row `i` in column order.
    pub fn row(&self, i: usize) -> Option<Vec<f64>> {
        if i >= self.len() {
            return None;
        }
        Some(self.columns.iter().map(|c| c[i]).collect())
    }
}

fn flag(b: bool) -> f64 {
    if b {
        1.0
    } else {
        0.0
    }
}

/// Regime code: 0 bearish, 1 neutral, 2 bullish.
fn classify(rsi: f64, level_down: f64, level_up: f64) -> f64 {
    if rsi < level_down {
        0.0
    } else if rsi > level_up {
        2.0
    } else {
        1.0
    }
}

/// 1 where the value differs from the previous one; 0 on the first bar.
fn changed(values: &[f64]) -> Vec<f64> {
    values
        .iter()
        .zip(lag(values, 1))
        .map(|(x, prev)| flag(*x != prev))
        .collect()
}

/// 1 where `hit(previous, current)` holds.
fn crossing(rsi: &[f64], prev: &[f64], hit: impl Fn(f64, f64) -> bool) -> Vec<f64> {
    rsi.iter().zip(prev).map(|(&r, &p)| flag(hit(p, r))).collect()
}

/// Bars since `event` last held: 0 on an event bar, counting up otherwise.
fn bars_since(events: impl Iterator<Item = bool>) -> Vec<f64> {
    let mut count = 0.0;
    events
        .map(|e| {
            count = if e { 0.0 } else { count + 1.0 };
            count
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct FeatureExpander {
    config: ExpanderConfig,
}

impl FeatureExpander {
    pub fn new(config: ExpanderConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ExpanderConfig {
        &self.config
    }

    /// Expand `rsi` into feature columns.
    ///
    /// Every column at row `t` uses only rows `0..=t` of the inputs.
    pub fn expand(
        &self,
        rsi: &[f64],
        intermediates: Option<&IntermediateValues>,
    ) -> Result<FeatureFrame, FeatureError> {
        if let Some((index, &value)) = rsi
            .iter()
            .enumerate()
            .find(|(_, v)| !(0.0..=1.0).contains(*v))
        {
            return Err(FeatureError::RsiOutOfRange { index, value });
        }
        if rsi.len() < self.config.stats_window {
            return Err(FeatureError::TooShort {
                len: rsi.len(),
                stats_window: self.config.stats_window,
            });
        }
        if let Some(iv) = intermediates {
            if iv.len() != rsi.len() || !iv.is_aligned() {
                return Err(FeatureError::LengthMismatch {
                    rsi: rsi.len(),
                    intermediates: iv.shortest_len(),
                });
            }
        }

        let mut frame = FeatureFrame::default();
        frame.push("rsi", rsi.to_vec());
        let regime = self.push_regimes(&mut frame, rsi);
        self.push_thresholds(&mut frame, rsi);
        self.push_crossings(&mut frame, rsi);
        self.push_temporal(&mut frame, rsi);
        let change_1 = self.push_rate_of_change(&mut frame, rsi);
        let volatility = self.push_statistics(&mut frame, rsi);
        self.push_tail_risk(&mut frame, &regime, &change_1, &volatility);

        if let Some(iv) = intermediates {
            self.push_adaptive(&mut frame, iv);
            self.push_laguerre_stages(&mut frame, iv);
            push_atr_range(&mut frame, iv);
            self.push_efficiency(&mut frame, iv);
            push_cycle(&mut frame, iv);
        }

        debug!(rows = frame.len(), columns = frame.width(), "features expanded");
        Ok(frame)
    }

    /// Returns regime codes and bars in regime for the tail-risk block.
    fn push_regimes(&self, frame: &mut FeatureFrame, rsi: &[f64]) -> Regimes {
        let ExpanderConfig {
            level_up,
            level_down,
            ..
        } = self.config;

        let code: Vec<f64> = rsi
            .iter()
            .map(|&r| classify(r, level_down, level_up))
            .collect();
        let regime_changed = changed(&code);

        let mut run = 0.0;
        let bars_in_regime: Vec<f64> = regime_changed
            .iter()
            .enumerate()
            .map(|(t, &c)| {
                run = if t == 0 || c == 1.0 { 1.0 } else { run + 1.0 };
                run
            })
            .collect();

        let strength = rsi
            .iter()
            .zip(&code)
            .map(|(&r, &c)| match c as u8 {
                0 => (level_down - r).max(0.0),
                2 => (r - level_up).max(0.0),
                _ => 0.0,
            })
            .collect();

        frame.push("regime", code.clone());
        frame.push("regime_bearish", code.iter().map(|&c| flag(c == 0.0)).collect());
        frame.push("regime_neutral", code.iter().map(|&c| flag(c == 1.0)).collect());
        frame.push("regime_bullish", code.iter().map(|&c| flag(c == 2.0)).collect());
        frame.push("regime_changed", regime_changed);
        frame.push("bars_in_regime", bars_in_regime.clone());
        frame.push("regime_strength", strength);

        Regimes {
            code,
            bars_in_regime,
        }
    }

    fn push_thresholds(&self, frame: &mut FeatureFrame, rsi: &[f64]) {
        let up = self.config.level_up;
        let down = self.config.level_down;
        frame.push("dist_overbought", rsi.iter().map(|r| r - up).collect());
        frame.push("dist_oversold", rsi.iter().map(|r| r - down).collect());
        frame.push("dist_midline", rsi.iter().map(|r| r - MIDLINE).collect());
        frame.push("abs_dist_overbought", rsi.iter().map(|r| (r - up).abs()).collect());
        frame.push("abs_dist_oversold", rsi.iter().map(|r| (r - down).abs()).collect());
    }

    fn push_crossings(&self, frame: &mut FeatureFrame, rsi: &[f64]) {
        let up = self.config.level_up;
        let down = self.config.level_down;
        let prev = lag(rsi, 1);
        frame.push("cross_above_oversold", crossing(rsi, &prev, |p, r| p <= down && r > down));
        frame.push("cross_below_overbought", crossing(rsi, &prev, |p, r| p >= up && r < up));
        frame.push("cross_above_midline", crossing(rsi, &prev, |p, r| p <= MIDLINE && r > MIDLINE));
        frame.push("cross_below_midline", crossing(rsi, &prev, |p, r| p >= MIDLINE && r < MIDLINE));
    }

    fn push_temporal(&self, frame: &mut FeatureFrame, rsi: &[f64]) {
        let oversold = bars_since(rsi.iter().map(|&r| r < self.config.level_down));
        let overbought = bars_since(rsi.iter().map(|&r| r > self.config.level_up));
        let extreme = oversold.iter().zip(&overbought).map(|(a, b)| a.min(*b)).collect();
        frame.push("bars_since_oversold", oversold);
        frame.push("bars_since_overbought", overbought);
        frame.push("bars_since_extreme", extreme);
    }

    /// Returns the one-bar change.
    fn push_rate_of_change(&self, frame: &mut FeatureFrame, rsi: &[f64]) -> Vec<f64> {
        let change_1 = diff(rsi, 1);
        frame.push("rsi_change_1", change_1.clone());
        frame.push("rsi_change_5", diff(rsi, 5));
        frame.push("rsi_velocity", ewm(&change_1, self.config.velocity_span));
        change_1
    }

    /// Returns the rolling volatility.
    fn push_statistics(&self, frame: &mut FeatureFrame, rsi: &[f64]) -> Vec<f64> {
        let w = self.config.stats_window;
        let mean = rolling::rolling(rsi, w, rolling::mean);
        let std = rolling::rolling(rsi, w, rolling::sample_std);
        let lo = rolling::rolling(rsi, w, rolling::min);
        let hi = rolling::rolling(rsi, w, rolling::max);

        let zscore = rsi
            .iter()
            .zip(mean.iter().zip(&std))
            .map(|(r, (m, s))| (r - m) / nonzero_or_one(*s))
            .collect();
        let range = hi.iter().zip(&lo).map(|(h, l)| h - l).collect();

        frame.push("rsi_percentile_20", rolling::rolling(rsi, w, rolling::percentile_rank));
        frame.push("rsi_zscore_20", zscore);
        frame.push("rsi_volatility_20", std.clone());
        frame.push("rsi_range_20", range);
        std
    }

    fn push_tail_risk(
        &self,
        frame: &mut FeatureFrame,
        regimes: &Regimes,
        change_1: &[f64],
        volatility: &[f64],
    ) {
        let shock: Vec<f64> = change_1
            .iter()
            .map(|c| flag(c.abs() > SHOCK_THRESHOLD))
            .collect();

        let persistence: Vec<f64> = regimes
            .code
            .iter()
            .zip(&regimes.bars_in_regime)
            .map(|(&c, &n)| flag(c != 1.0 && n > PERSISTENCE_BARS))
            .collect();

        let spike: Vec<f64> = (0..volatility.len())
            .map(|t| {
                let start = (t + 1).saturating_sub(SPIKE_WINDOW);
                let window = &volatility[start..=t];
                if window.len() < SPIKE_MIN_VALUES {
                    return 0.0;
                }
                let threshold = rolling::mean(window) + SPIKE_SIGMAS * rolling::sample_std(window);
                flag(volatility[t] > threshold)
            })
            .collect();

        let score = shock
            .iter()
            .zip(persistence.iter().zip(&spike))
            .map(|(s, (p, v))| (0.4 * s + 0.3 * p + 0.3 * v).clamp(0.0, 1.0))
            .collect();

        frame.push("rsi_shock_1bar", shock);
        frame.push("extreme_regime_persistence", persistence);
        frame.push("rsi_volatility_spike", spike);
        frame.push("tail_risk_score", score);
    }

    fn push_adaptive(&self, frame: &mut FeatureFrame, iv: &IntermediateValues) {
        let gamma_mean = rolling::rolling(&iv.gamma, self.config.stats_window, rolling::mean);
        let spread = iv.gamma.iter().zip(&gamma_mean).map(|(g, m)| g - m).collect();

        frame.push("adaptive_coeff", iv.adaptive_coeff.clone());
        frame.push("adaptive_coeff_roc_1", diff(&iv.adaptive_coeff, 1));
        frame.push("gamma_value", iv.gamma.clone());
        frame.push("gamma_spread", spread);
    }

    fn push_laguerre_stages(&self, frame: &mut FeatureFrame, iv: &IntermediateValues) {
        let n = iv.len();
        let mut spread = Vec::with_capacity(n);
        let mut convergence = Vec::with_capacity(n);
        for t in 0..n {
            let (l0, l1, l2, l3) = (iv.l0[t], iv.l1[t], iv.l2[t], iv.l3[t]);
            spread.push((l0 - l3) / (l0.abs() + l3.abs() + EPS));
            convergence.push((l1 - l2).abs() / ((l0 - l1).abs() + (l2 - l3).abs() + EPS));
        }

        let l0_diff = diff(&iv.l0, 1);
        let l0_std = rolling::rolling(&l0_diff, self.config.stats_window, rolling::sample_std);
        let slope = l0_diff
            .iter()
            .zip(&l0_std)
            .map(|(d, s)| d / nonzero_or_one(*s))
            .collect();

        frame.push("laguerre_spread", spread);
        frame.push("laguerre_mid_convergence", convergence);
        frame.push("laguerre_slope", slope);
    }

    /// Kaufman efficiency ratio over `stats_window` bars of close.
    fn push_efficiency(&self, frame: &mut FeatureFrame, iv: &IntermediateValues) {
        let n = self.config.stats_window;
        let close = &iv.close;
        let direction: Vec<f64> = diff(close, n).iter().map(|d| d.abs()).collect();
        let abs_changes: Vec<f64> = diff(close, 1).iter().map(|d| d.abs()).collect();
        let path = rolling::rolling(&abs_changes, n, |w| w.iter().sum());

        let er: Vec<f64> = direction
            .iter()
            .zip(&path)
            .map(|(d, p)| (d / nonzero_or_one(*p)).clamp(0.0, 1.0))
            .collect();
        let trend = er.iter().map(|&e| flag(e > EFFICIENT_TREND)).collect();

        frame.push("efficiency_ratio", er);
        frame.push("efficiency_trend", trend);
    }
}

struct Regimes {
    code: Vec<f64>,
    bars_in_regime: Vec<f64>,
}

fn push_atr_range(frame: &mut FeatureFrame, iv: &IntermediateValues) {
    let width = iv
        .max_atr
        .iter()
        .zip(&iv.min_atr)
        .map(|(hi, lo)| (hi - lo) / (hi + EPS))
        .collect();
    frame.push("atr_range_width", width);
}

/// Phase from stage ordering: 0 down, 1 turning up, 2 up, 3 turning down.
fn push_cycle(frame: &mut FeatureFrame, iv: &IntermediateValues) {
    let phase: Vec<f64> = (0..iv.len())
        .map(|t| match (iv.l0[t] > iv.l1[t], iv.l2[t] > iv.l3[t]) {
            (false, false) => 0.0,
            (true, false) => 1.0,
            (true, true) => 2.0,
            (false, true) => 3.0,
        })
        .collect();
    let phase_changed = changed(&phase);
    frame.push("cycle_phase", phase);
    frame.push("cycle_phase_changed", phase_changed);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LaguerreConfig;
    use crate::engine::AtrAdaptiveLaguerreRsi;
    use crate::indicators::{assert_approx, make_bars, DEFAULT_EPSILON};

    fn expander() -> FeatureExpander {
        FeatureExpander::new(ExpanderConfig::default()).unwrap()
    }

    fn small(stats_window: usize) -> FeatureExpander {
        FeatureExpander::new(ExpanderConfig {
            stats_window,
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn invalid_levels_rejected() {
        let config = ExpanderConfig {
            level_up: 0.2,
            level_down: 0.3,
            ..Default::default()
        };
        assert!(matches!(
            FeatureExpander::new(config),
            Err(ConfigError::InvalidLevels { .. })
        ));
    }

    #[test]
    fn out_of_range_and_nan_rejected() {
        let mut rsi = vec![0.5; 25];
        rsi[7] = 1.2;
        assert_eq!(
            expander().expand(&rsi, None),
            Err(FeatureError::RsiOutOfRange {
                index: 7,
                value: 1.2
            })
        );
        rsi[7] = f64::NAN;
        assert!(matches!(
            expander().expand(&rsi, None),
            Err(FeatureError::RsiOutOfRange { index: 7, .. })
        ));
    }

    #[test]
    fn too_short_rejected() {
        assert_eq!(
            expander().expand(&[0.5; 10], None),
            Err(FeatureError::TooShort {
                len: 10,
                stats_window: 20
            })
        );
    }

    #[test]
    fn intermediate_length_mismatch_rejected() {
        let iv = IntermediateValues::default();
        assert_eq!(
            expander().expand(&[0.5; 20], Some(&iv)),
            Err(FeatureError::LengthMismatch {
                rsi: 20,
                intermediates: 0
            })
        );
    }

    #[test]
    fn truncated_intermediate_column_rejected() {
        let bars = make_bars(&(0..40).map(|i| 100.0 + (i % 7) as f64).collect::<Vec<_>>());
        let out = AtrAdaptiveLaguerreRsi::new(LaguerreConfig::default())
            .unwrap()
            .run(&bars)
            .unwrap();
        let mut iv = out.intermediates.clone();
        iv.l0.truncate(10);
        assert_eq!(
            expander().expand(&out.rsi, Some(&iv)),
            Err(FeatureError::LengthMismatch {
                rsi: 40,
                intermediates: 10
            })
        );

        let mut iv = out.intermediates;
        iv.max_atr.pop();
        assert!(matches!(
            expander().expand(&out.rsi, Some(&iv)),
            Err(FeatureError::LengthMismatch { intermediates: 39, .. })
        ));
    }

    #[test]
    fn base_columns_in_order() {
        let frame = expander().expand(&[0.5; 20], None).unwrap();
        assert_eq!(frame.column_names(), &BASE_COLUMNS[..]);
        assert_eq!(frame.width(), 31);
        assert_eq!(frame.len(), 20);
        assert_eq!(frame.row(0).unwrap().len(), 31);
        assert!(frame.row(20).is_none());
    }

    #[test]
    fn regimes_and_run_lengths() {
        let rsi = [0.1, 0.1, 0.5, 0.9, 0.95, 0.9];
        let frame = small(2).expand(&rsi, None).unwrap();
        assert_eq!(frame.get("regime").unwrap(), &[0.0, 0.0, 1.0, 2.0, 2.0, 2.0]);
        assert_eq!(frame.get("regime_changed").unwrap(), &[0.0, 0.0, 1.0, 1.0, 0.0, 0.0]);
        assert_eq!(frame.get("bars_in_regime").unwrap(), &[1.0, 2.0, 1.0, 1.0, 2.0, 3.0]);
        assert_eq!(frame.get("regime_bullish").unwrap(), &[0.0, 0.0, 0.0, 1.0, 1.0, 1.0]);
        let strength = frame.get("regime_strength").unwrap();
        assert_approx(strength[0], 0.05, DEFAULT_EPSILON);
        assert_eq!(strength[2], 0.0);
        assert_approx(strength[4], 0.1, DEFAULT_EPSILON);
    }

    #[test]
    fn crossings_and_bars_since() {
        let rsi = [0.1, 0.2, 0.6, 0.4, 0.9, 0.8];
        let frame = small(1).expand(&rsi, None).unwrap();
        assert_eq!(frame.get("cross_above_oversold").unwrap(), &[0.0, 1.0, 0.0, 0.0, 0.0, 0.0]);
        assert_eq!(frame.get("cross_above_midline").unwrap(), &[0.0, 0.0, 1.0, 0.0, 1.0, 0.0]);
        assert_eq!(frame.get("cross_below_midline").unwrap(), &[0.0, 0.0, 0.0, 1.0, 0.0, 0.0]);
        assert_eq!(frame.get("cross_below_overbought").unwrap(), &[0.0, 0.0, 0.0, 0.0, 0.0, 1.0]);
        assert_eq!(frame.get("bars_since_oversold").unwrap(), &[0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(frame.get("bars_since_overbought").unwrap(), &[1.0, 2.0, 3.0, 4.0, 0.0, 1.0]);
        assert_eq!(frame.get("bars_since_extreme").unwrap(), &[0.0, 1.0, 2.0, 3.0, 0.0, 1.0]);
    }

    #[test]
    fn rate_of_change_fills_with_first() {
        let rsi = [0.2, 0.4, 0.5, 0.5, 0.6, 0.7, 0.3];
        let frame = small(1).expand(&rsi, None).unwrap();
        let c5 = frame.get("rsi_change_5").unwrap();
        assert_eq!(c5[0], 0.0);
        assert_approx(c5[4], 0.4, DEFAULT_EPSILON);
        assert_approx(c5[6], -0.1, DEFAULT_EPSILON);
        let shock = frame.get("rsi_shock_1bar").unwrap();
        assert_eq!(shock[6], 1.0);
        assert_approx(frame.get("tail_risk_score").unwrap()[6], 0.4, DEFAULT_EPSILON);
    }

    #[test]
    fn flat_rsi_statistics() {
        let frame = expander().expand(&[0.5; 30], None).unwrap();
        for name in ["rsi_zscore_20", "rsi_volatility_20", "rsi_range_20", "rsi_percentile_20"] {
            assert!(frame.get(name).unwrap().iter().all(|&v| v == 0.0), "{name}");
        }
        assert!(frame.get("rsi_volatility_spike").unwrap().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn long_extreme_regime_persists() {
        let rsi = vec![0.95; 15];
        let frame = small(1).expand(&rsi, None).unwrap();
        let persistence = frame.get("extreme_regime_persistence").unwrap();
        assert_eq!(persistence[9], 0.0);
        assert_eq!(persistence[10], 1.0);
        assert_approx(frame.get("tail_risk_score").unwrap()[14], 0.3, DEFAULT_EPSILON);
    }

    fn intermediates(close: &[f64]) -> IntermediateValues {
        let n = close.len();
        IntermediateValues {
            adaptive_coeff: (0..n).map(|i| (i % 3) as f64 / 2.0).collect(),
            gamma: vec![0.5; n],
            l0: close.to_vec(),
            l1: close.iter().map(|c| c - 1.0).collect(),
            l2: vec![1.0; n],
            l3: vec![2.0; n],
            min_atr: vec![1.0; n],
            max_atr: vec![3.0; n],
            atr: vec![2.0; n],
            close: close.to_vec(),
        }
    }

    #[test]
    fn intermediate_columns_appended() {
        let close: Vec<f64> = (0..25).map(|i| 10.0 + i as f64).collect();
        let iv = intermediates(&close);
        let frame = expander().expand(&vec![0.5; 25], Some(&iv)).unwrap();
        assert_eq!(frame.width(), 43);
        assert_eq!(&frame.column_names()[31..], &INTERMEDIATE_COLUMNS[..]);

        // straight line: every move is in the trend direction
        let er = frame.get("efficiency_ratio").unwrap();
        assert_eq!(er[0], 0.0);
        assert_approx(er[24], 1.0, DEFAULT_EPSILON);
        assert_eq!(frame.get("efficiency_trend").unwrap()[24], 1.0);

        // l0 > l1 and l2 < l3 → turning up on every bar
        assert!(frame.get("cycle_phase").unwrap().iter().all(|&p| p == 1.0));
        assert!(frame.get("cycle_phase_changed").unwrap().iter().all(|&p| p == 0.0));

        assert_approx(frame.get("atr_range_width").unwrap()[3], 2.0 / 3.0, 1e-9);
        assert!(frame.get("gamma_spread").unwrap().iter().all(|&v| v == 0.0));
        assert_eq!(frame.get("adaptive_coeff_roc_1").unwrap()[..3], [0.0, 0.5, 0.5]);

        // constant L0 step of 1: std 0 at bar 0, then sample std of {0, 1, 1, ...}
        let slope = frame.get("laguerre_slope").unwrap();
        assert_eq!(slope[0], 0.0);
        assert_approx(slope[1], 1.0 / 0.5f64.sqrt(), DEFAULT_EPSILON);
    }

    #[test]
    fn stage_spread_and_convergence() {
        let mut iv = intermediates(&[4.0; 20]);
        iv.l1 = vec![3.0; 20];
        iv.l2 = vec![2.0; 20];
        iv.l3 = vec![0.0; 20];
        let frame = expander().expand(&[0.5; 20], Some(&iv)).unwrap();
        // (4 - 0) / (4 + 0)
        assert_approx(frame.get("laguerre_spread").unwrap()[0], 1.0, 1e-9);
        // |3 - 2| / (|4 - 3| + |2 - 0|)
        assert_approx(frame.get("laguerre_mid_convergence").unwrap()[0], 1.0 / 3.0, 1e-9);
        assert!(frame.get("cycle_phase").unwrap().iter().all(|&p| p == 2.0));
    }
}
