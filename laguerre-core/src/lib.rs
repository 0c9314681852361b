//! Laguerre Core: streaming ATR-adaptive Laguerre RSI.
//!
//! This crate contains:
//! - Domain types (bars) and validated configuration
//! - Streaming trackers: true range, ATR, adaptive coefficient, Laguerre filter
//! - The engine that chains them bar by bar and records intermediate values
//! - Feature expansion of the RSI into regime, threshold and tail-risk columns
//! - Deterministic synthetic bars for tests and benches

pub mod config;
pub mod domain;
pub mod engine;
pub mod features;
pub mod indicators;
pub mod synthetic;

pub use config::{ConfigError, ExpanderConfig, FileConfig, LaguerreConfig};
pub use domain::{Bar, BarError};
pub use engine::{
    run_batch, AtrAdaptiveLaguerreRsi, BarOutput, EngineError, IntermediateValues,
    LaguerreOutput, LaguerreState,
};
pub use features::{FeatureError, FeatureExpander, FeatureFrame};
pub use synthetic::{next_unit, synthetic_bars};
