//! Circular (angular) mean.

use crate::stats::StatsError;
use std::f64::consts::TAU;

/// How to treat NaN samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NanPolicy {
    /// Any NaN sample makes the result NaN.
    #[default]
    Propagate,
    /// NaN samples (and their weights) are dropped.
    Ignore,
    /// Any NaN sample is an error.
    Raise,
}

/// Options for [`circmean`]: the value interval, per-sample weights, and the
/// NaN policy. The default interval is `[0, 2π)`.
#[derive(Debug, Clone, Default)]
pub struct CircMeanOpts {
    pub low: Option<f64>,
    pub high: Option<f64>,
    pub weights: Option<Vec<f64>>,
    pub nan_policy: NanPolicy,
}

impl CircMeanOpts {
    pub fn interval(low: f64, high: f64) -> Self {
        Self {
            low: Some(low),
            high: Some(high),
            ..Self::default()
        }
    }

    pub fn with_weights(mut self, weights: Vec<f64>) -> Self {
        self.weights = Some(weights);
        self
    }

    pub fn with_nan_policy(mut self, nan_policy: NanPolicy) -> Self {
        self.nan_policy = nan_policy;
        self
    }
}

/// Weighted circular mean of `samples` over the interval `[low, high)`.
///
/// Samples are mapped onto the unit circle, the weighted resultant angle is
/// taken, and the result is mapped back into `[low, high)`.
pub fn circmean(samples: &[f64], opts: &CircMeanOpts) -> Result<f64, StatsError> {
    let low = opts.low.unwrap_or(0.0);
    let high = opts.high.unwrap_or(TAU);
    if high <= low {
        return Err(StatsError::InvalidInterval { low, high });
    }
    if let Some(weights) = &opts.weights {
        if weights.len() != samples.len() {
            return Err(StatsError::LengthMismatch {
                expected: samples.len(),
                actual: weights.len(),
            });
        }
    }

    let weight_of = |i: usize| opts.weights.as_ref().map(|w| w[i]).unwrap_or(1.0);
    let mut sin_sum = 0.0;
    let mut cos_sum = 0.0;
    let mut total_weight = 0.0;
    for (i, &x) in samples.iter().enumerate() {
        if x.is_nan() {
            match opts.nan_policy {
                NanPolicy::Propagate => return Ok(f64::NAN),
                NanPolicy::Ignore => continue,
                NanPolicy::Raise => return Err(StatsError::NanValues),
            }
        }
        let angle = (x - low) * TAU / (high - low);
        let w = weight_of(i);
        sin_sum += w * angle.sin();
        cos_sum += w * angle.cos();
        total_weight += w;
    }
    if total_weight == 0.0 {
        return Ok(f64::NAN);
    }

    let mut resultant = sin_sum.atan2(cos_sum);
    if resultant < 0.0 {
        resultant += TAU;
    }
    Ok(low + resultant * (high - low) / TAU)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9
    }

    #[test]
    fn test_degrees_wrap_to_mean() {
        let degrees = [-150.0, 180.0, 150.0, 270.0, 90.0, 0.0, 540.0, -540.0];
        let mean = circmean(&degrees, &CircMeanOpts::interval(0.0, 360.0)).unwrap();
        assert!(approx_eq(mean, 180.0));

        let radians: Vec<f64> = degrees.iter().map(|d| d.to_radians()).collect();
        let mean = circmean(&radians, &CircMeanOpts::default()).unwrap();
        assert!(approx_eq(mean, std::f64::consts::PI));
    }

    #[test]
    fn test_weights() {
        let mean = circmean(
            &[-90.0, 0.0, 90.0],
            &CircMeanOpts::interval(0.0, 360.0).with_weights(vec![1.0, 1.0, 2.0]),
        )
        .unwrap();
        assert!(approx_eq(mean, 45.0));

        // Integer weights behave like sample repetition
        let weighted = circmean(
            &[-40.0, 0.0, 40.0],
            &CircMeanOpts::interval(0.0, 360.0).with_weights(vec![1.0, 1.0, 3.0]),
        )
        .unwrap();
        let repeated = circmean(
            &[-40.0, 0.0, 40.0, 40.0, 40.0],
            &CircMeanOpts::interval(0.0, 360.0),
        )
        .unwrap();
        assert!(approx_eq(weighted, repeated));
    }

    #[test]
    fn test_custom_interval() {
        let hours = [12.0, 14.0, 23.0, 15.0];
        let mean = circmean(&hours, &CircMeanOpts::interval(12.0, 24.0)).unwrap();
        assert!(approx_eq(mean, 13.0));

        let weighted = circmean(
            &hours,
            &CircMeanOpts::interval(12.0, 24.0).with_weights(vec![1.0, 1.0, 2.0, 1.0]),
        )
        .unwrap();
        assert!(approx_eq(weighted, 12.5));
    }

    #[test]
    fn test_nan_policies() {
        use std::f64::consts::{FRAC_PI_2, PI};
        let samples = [3.0 * PI / 2.0, 0.0, FRAC_PI_2, f64::NAN];
        let weights = vec![1.0, 1.0, 2.0, 1.0];

        assert!(circmean(&samples, &CircMeanOpts::default()).unwrap().is_nan());
        assert!(circmean(
            &samples,
            &CircMeanOpts::default().with_weights(weights.clone())
        )
        .unwrap()
        .is_nan());

        let ignored = circmean(
            &samples,
            &CircMeanOpts::default()
                .with_weights(weights.clone())
                .with_nan_policy(NanPolicy::Ignore),
        )
        .unwrap();
        assert!(approx_eq(ignored, PI / 4.0));

        assert!(matches!(
            circmean(
                &samples,
                &CircMeanOpts::default()
                    .with_weights(weights)
                    .with_nan_policy(NanPolicy::Raise),
            ),
            Err(StatsError::NanValues)
        ));
    }

    #[test]
    fn test_argument_validation() {
        assert!(matches!(
            circmean(&[1.0], &CircMeanOpts::interval(5.0, 5.0)),
            Err(StatsError::InvalidInterval { .. })
        ));
        assert!(matches!(
            circmean(
                &[1.0, 2.0],
                &CircMeanOpts::default().with_weights(vec![1.0])
            ),
            Err(StatsError::LengthMismatch {
                expected: 2,
                actual: 1
            })
        ));
    }
}
