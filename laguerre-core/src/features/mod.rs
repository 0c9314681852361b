//! Feature expansion of the RSI and the engine's intermediate values.

pub mod expander;
pub mod rolling;

pub use expander::{
    FeatureError, FeatureExpander, FeatureFrame, BASE_COLUMNS, INTERMEDIATE_COLUMNS,
};
