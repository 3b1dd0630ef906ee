//! Percentile Computation
//!
//! Computes percentiles from raw consumption samples.
//! The reference consumption in percentile mode is exactly this value.

use crate::error::{StatsError, check_samples, sorted_copy};
use serde::{Deserialize, Serialize};

/// Percentiles reported alongside the summary
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Percentiles {
    /// 25th percentile (first quartile)
    pub p25: f64,
    /// 50th percentile (median)
    pub p50: f64,
    /// 75th percentile (third quartile)
    pub p75: f64,
    /// 90th percentile
    pub p90: f64,
    /// 95th percentile
    pub p95: f64,
    /// 99th percentile
    pub p99: f64,
}

/// Compute a single percentile from samples
///
/// Uses linear interpolation between closest ranks: the rank of `percentile`
/// is `percentile / 100 * (n - 1)` over the sorted samples. `0` yields the
/// minimum and `100` the maximum.
///
/// # Examples
///
/// ```
/// # use refflow_stats::compute_percentile;
/// let samples = vec![1.0, 2.0, 3.0, 4.0, 5.0];
/// let p50 = compute_percentile(&samples, 50.0).unwrap();
/// assert_eq!(p50, 3.0);
/// ```
pub fn compute_percentile(samples: &[f64], percentile: f64) -> Result<f64, StatsError> {
    check_samples(samples)?;
    if !(0.0..=100.0).contains(&percentile) {
        return Err(StatsError::InvalidPercentile(percentile));
    }

    let sorted = sorted_copy(samples);
    Ok(percentile_of_sorted(&sorted, percentile))
}

/// Percentile of data that is already sorted ascending and non-empty
pub(crate) fn percentile_of_sorted(sorted: &[f64], percentile: f64) -> f64 {
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }

    let p = percentile / 100.0;

    // Linear interpolation between nearest ranks
    let rank = p * (n - 1) as f64;
    let lower_idx = (rank.floor() as usize).min(n - 1);
    let upper_idx = (lower_idx + 1).min(n - 1);
    let fraction = rank - lower_idx as f64;

    sorted[lower_idx] + fraction * (sorted[upper_idx] - sorted[lower_idx])
}

/// Compute all reported percentiles
pub fn compute_percentiles(samples: &[f64]) -> Result<Percentiles, StatsError> {
    check_samples(samples)?;
    let sorted = sorted_copy(samples);

    Ok(Percentiles {
        p25: percentile_of_sorted(&sorted, 25.0),
        p50: percentile_of_sorted(&sorted, 50.0),
        p75: percentile_of_sorted(&sorted, 75.0),
        p90: percentile_of_sorted(&sorted, 90.0),
        p95: percentile_of_sorted(&sorted, 95.0),
        p99: percentile_of_sorted(&sorted, 99.0),
    })
}
