//! Indicator engine: per-bar streaming state and whole-series runs.
//!
//! Each bar flows through the same pipeline:
//!
//! 1. True range against the previous close
//! 2. ATR (cumulative mean during warmup, Wilder after)
//! 3. Adaptive coefficient from the ATR's position in its trailing range
//! 4. Gamma from the coefficient
//! 5. Laguerre filter and the RSI read off its stages
//!
//! Outputs are appended once per bar and never revised.

pub mod batch;
pub mod indicator;
pub mod intermediates;
pub mod state;
pub mod warmup;

pub use batch::run_batch;
pub use indicator::{AtrAdaptiveLaguerreRsi, EngineError, LaguerreOutput};
pub use intermediates::{BarOutput, IntermediateValues};
pub use state::LaguerreState;
pub use warmup::WarmupState;
