//! Four-stage Laguerre filter and the RSI read off its stages.
//!
//! ```text
//! L0 = (1 - g) * price + g * L0'
//! L1 = -g * L0 + L0' + g * L1'
//! L2 = -g * L1 + L1' + g * L2'
//! L3 = -g * L2 + L2' + g * L3'
//! ```
//!
//! (primes are the previous bar's stages). For each adjacent pair the
//! positive difference goes to CU, the negative one to CD, and
//! `rsi = CU / (CU + CD)`, or 0.5 when every pair is flat.
//!
//! On the first bar all stages are set to the first price rather than zero,
//! which would otherwise inject a startup spike lasting several bars.

/// RSI reported when all stage pairs are equal.
pub const NEUTRAL_RSI: f64 = 0.5;

/// Stage values and RSI for one bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaguerreReading {
    pub l0: f64,
    pub l1: f64,
    pub l2: f64,
    pub l3: f64,
    pub rsi: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Stages {
    l0: f64,
    l1: f64,
    l2: f64,
    l3: f64,
}

impl Stages {
    fn flat(price: f64) -> Self {
        Self {
            l0: price,
            l1: price,
            l2: price,
            l3: price,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LaguerreFilter {
    stages: Option<Stages>,
}

impl LaguerreFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_seeded(&self) -> bool {
        self.stages.is_some()
    }

    pub fn update(&mut self, price: f64, gamma: f64) -> LaguerreReading {
        let Some(prev) = self.stages else {
            // The recursion over flat stages is the identity up to rounding;
            // set the stages exactly so bar 0 is neutral.
            self.stages = Some(Stages::flat(price));
            return LaguerreReading {
                l0: price,
                l1: price,
                l2: price,
                l3: price,
                rsi: NEUTRAL_RSI,
            };
        };

        let l0 = (1.0 - gamma) * price + gamma * prev.l0;
        let l1 = -gamma * l0 + prev.l0 + gamma * prev.l1;
        let l2 = -gamma * l1 + prev.l1 + gamma * prev.l2;
        let l3 = -gamma * l2 + prev.l2 + gamma * prev.l3;

        self.stages = Some(Stages { l0, l1, l2, l3 });

        LaguerreReading {
            l0,
            l1,
            l2,
            l3,
            rsi: stage_rsi(l0, l1, l2, l3),
        }
    }
}

fn stage_rsi(l0: f64, l1: f64, l2: f64, l3: f64) -> f64 {
    let mut cu = 0.0;
    let mut cd = 0.0;
    for (a, b) in [(l0, l1), (l1, l2), (l2, l3)] {
        if a >= b {
            cu += a - b;
        } else {
            cd += b - a;
        }
    }
    if cu + cd > 0.0 {
        cu / (cu + cd)
    } else {
        NEUTRAL_RSI
    }
}
