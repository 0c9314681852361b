//! Per-bar intermediate values of the computation.
//!
//! Downstream feature expansion reads these columns directly. Every row is
//! appended once and never revised, so row `t` depends only on bars `0..=t`.

use serde::{Deserialize, Serialize};

/// Output of one bar of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BarOutput {
    pub rsi: f64,
    pub adaptive_coeff: f64,
    pub gamma: f64,
    pub l0: f64,
    pub l1: f64,
    pub l2: f64,
    pub l3: f64,
    pub min_atr: f64,
    pub max_atr: f64,
    pub atr: f64,
    pub close: f64,
    /// False while the bar is inside the warmup.
    pub warm: bool,
}

/// Ten parallel columns, one entry per input bar.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IntermediateValues {
    pub adaptive_coeff: Vec<f64>,
    pub gamma: Vec<f64>,
    pub l0: Vec<f64>,
    pub l1: Vec<f64>,
    pub l2: Vec<f64>,
    pub l3: Vec<f64>,
    pub min_atr: Vec<f64>,
    pub max_atr: Vec<f64>,
    pub atr: Vec<f64>,
    pub close: Vec<f64>,
}

impl IntermediateValues {
    /// Column names in output order.
    pub const COLUMNS: [&'static str; 10] = [
        "adaptive_coeff",
        "gamma",
        "l0",
        "l1",
        "l2",
        "l3",
        "min_atr",
        "max_atr",
        "atr",
        "close",
    ];

    pub fn with_capacity(n: usize) -> Self {
        Self {
            adaptive_coeff: Vec::with_capacity(n),
            gamma: Vec::with_capacity(n),
            l0: Vec::with_capacity(n),
            l1: Vec::with_capacity(n),
            l2: Vec::with_capacity(n),
            l3: Vec::with_capacity(n),
            min_atr: Vec::with_capacity(n),
            max_atr: Vec::with_capacity(n),
            atr: Vec::with_capacity(n),
            close: Vec::with_capacity(n),
        }
    }

    pub fn push(&mut self, row: &BarOutput) {
        self.adaptive_coeff.push(row.adaptive_coeff);
        self.gamma.push(row.gamma);
        self.l0.push(row.l0);
        self.l1.push(row.l1);
        self.l2.push(row.l2);
        self.l3.push(row.l3);
        self.min_atr.push(row.min_atr);
        self.max_atr.push(row.max_atr);
        self.atr.push(row.atr);
        self.close.push(row.close);
    }

    pub fn len(&self) -> usize {
        self.close.len()
    }

    pub fn is_empty(&self) -> bool {
        self.close.is_empty()
    }

    /// True when every column has the same length.
    ///
    /// Always holds for values built with [`Self::push`]; the fields are
    /// public, so hand-built values may not.
    pub fn is_aligned(&self) -> bool {
        let n = self.len();
        self.columns().iter().all(|c| c.len() == n)
    }

    /// Length of the shortest column.
    pub fn shortest_len(&self) -> usize {
        self.columns().iter().map(|c| c.len()).min().unwrap_or(0)
    }

    fn columns(&self) -> [&[f64]; 10] {
        [
            &self.adaptive_coeff,
            &self.gamma,
            &self.l0,
            &self.l1,
            &self.l2,
            &self.l3,
            &self.min_atr,
            &self.max_atr,
            &self.atr,
            &self.close,
        ]
    }

    /// Column by name, see [`Self::COLUMNS`].
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        let col = match name {
            "adaptive_coeff" => &self.adaptive_coeff,
            "gamma" => &self.gamma,
            "l0" => &self.l0,
            "l1" => &self.l1,
            "l2" => &self.l2,
            "l3" => &self.l3,
            "min_atr" => &self.min_atr,
            "max_atr" => &self.max_atr,
            "atr" => &self.atr,
            "close" => &self.close,
            _ => return None,
        };
        Some(col.as_slice())
    }

    /// Values of row `i` in [`Self::COLUMNS`] order, `None` if any column
    /// is too short.
    pub fn row(&self, i: usize) -> Option<[f64; 10]> {
        let cols = self.columns();
        let mut row = [0.0; 10];
        for (slot, col) in row.iter_mut().zip(cols) {
            *slot = *col.get(i)?;
        }
        Some(row)
    }
}
