//! Small statistics helpers.

pub mod circular;
pub mod count;

pub use circular::{circmean, CircMeanOpts, NanPolicy};
pub use count::CountStat;

use thiserror::Error;

/// Errors from the statistics helpers.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StatsError {
    #[error("length mismatch: expected {expected} weights, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("invalid interval: low={low}, high={high}")]
    InvalidInterval { low: f64, high: f64 },

    #[error("input contains NaN values")]
    NanValues,

    #[error("count {count} exceeds total {total}")]
    CountExceedsTotal { count: u64, total: u64 },
}
