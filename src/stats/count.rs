//! Count statistics.

use crate::stats::StatsError;
use std::fmt;

/// A count with an optional total, exposing the derived fraction and percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountStat {
    count: u64,
    total: Option<u64>,
}

impl CountStat {
    /// A bare count with no denominator.
    pub fn new(count: u64) -> Self {
        Self { count, total: None }
    }

    /// A count out of `total`. The count may not exceed the total.
    pub fn with_total(count: u64, total: u64) -> Result<Self, StatsError> {
        if count > total {
            return Err(StatsError::CountExceedsTotal { count, total });
        }
        Ok(Self {
            count,
            total: Some(total),
        })
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn total(&self) -> Option<u64> {
        self.total
    }

    /// count / total, `None` without a total or with a zero total.
    pub fn fraction(&self) -> Option<f64> {
        match self.total {
            Some(total) if total > 0 => Some(self.count as f64 / total as f64),
            _ => None,
        }
    }

    pub fn percent(&self) -> Option<f64> {
        self.fraction().map(|f| f * 100.0)
    }
}

impl fmt::Display for CountStat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.total {
            Some(total) => write!(f, "{}/{}", self.count, total),
            None => write!(f, "{}", self.count),
        }
    }
}
