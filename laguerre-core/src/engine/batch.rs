//! Parallel runs over independent bar series.

use rayon::prelude::*;
use tracing::info;

use crate::domain::Bar;

use super::indicator::{AtrAdaptiveLaguerreRsi, EngineError, LaguerreOutput};

/// Run `indicator` over every series in parallel.
///
/// Results come back in input order. Each series fails on its own; a bad
/// bar in one series leaves the others untouched.
pub fn run_batch(
    indicator: &AtrAdaptiveLaguerreRsi,
    series: &[Vec<Bar>],
) -> Vec<Result<LaguerreOutput, EngineError>> {
    info!(series = series.len(), indicator = %indicator.name(), "batch start");

    let results: Vec<_> = series.par_iter().map(|bars| indicator.run(bars)).collect();

    let failed = results.iter().filter(|r| r.is_err()).count();
    info!(series = series.len(), failed, "batch complete");
    results
}
