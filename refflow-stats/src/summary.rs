//! Summary Statistics
//!
//! Descriptive statistics of a consumption series. The standard deviation uses
//! the population convention (divisor n, not n - 1); this is the value the
//! normal overlay and the Kolmogorov-Smirnov reference distribution are built from.

use crate::error::{StatsError, check_samples, sorted_copy};
use crate::percentiles::{Percentiles, percentile_of_sorted};
use serde::{Deserialize, Serialize};

/// Descriptive statistics of a sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStatistics {
    /// Number of samples
    pub count: usize,
    /// Arithmetic mean
    pub mean: f64,
    /// Population standard deviation (divisor n)
    pub std_dev: f64,
    /// Sample standard deviation (divisor n - 1), 0 for a single sample
    pub sample_std_dev: f64,
    /// Smallest sample
    pub min: f64,
    /// Largest sample
    pub max: f64,
    /// Median
    pub median: f64,
    /// Biased skewness, m3 / m2^1.5 (0 without variance)
    pub skewness: f64,
    /// Pearson kurtosis, m4 / m2^2 (normal = 3; 0 without variance)
    pub kurtosis: f64,
    /// Reported percentiles
    pub percentiles: Percentiles,
}

impl SummaryStatistics {
    /// Coefficient of variation in percent (population std-dev over mean)
    pub fn coefficient_of_variation(&self) -> f64 {
        if self.mean == 0.0 {
            0.0
        } else {
            (self.std_dev / self.mean) * 100.0
        }
    }

    /// Interquartile range
    pub fn iqr(&self) -> f64 {
        self.percentiles.p75 - self.percentiles.p25
    }

    /// Spread between the largest and smallest sample
    pub fn range(&self) -> f64 {
        self.max - self.min
    }
}

/// Arithmetic mean
pub fn mean(samples: &[f64]) -> Result<f64, StatsError> {
    check_samples(samples)?;
    Ok(samples.iter().sum::<f64>() / samples.len() as f64)
}

/// Population standard deviation (divisor n)
pub fn population_std_dev(samples: &[f64]) -> Result<f64, StatsError> {
    let mean = mean(samples)?;
    let (m2, _, _) = central_moments(samples, mean);
    Ok(m2.sqrt())
}

/// Second, third and fourth central moments (divisor n)
pub(crate) fn central_moments(samples: &[f64], mean: f64) -> (f64, f64, f64) {
    let n = samples.len() as f64;
    let (mut m2, mut m3, mut m4) = (0.0, 0.0, 0.0);
    for &x in samples {
        let d = x - mean;
        let d2 = d * d;
        m2 += d2;
        m3 += d2 * d;
        m4 += d2 * d2;
    }
    (m2 / n, m3 / n, m4 / n)
}

/// Compute descriptive statistics for a non-empty sample
pub fn compute_summary(samples: &[f64]) -> Result<SummaryStatistics, StatsError> {
    check_samples(samples)?;

    let n = samples.len();
    let sorted = sorted_copy(samples);
    let mean = samples.iter().sum::<f64>() / n as f64;
    let (m2, m3, m4) = central_moments(samples, mean);

    let std_dev = m2.sqrt();
    let sample_std_dev = if n < 2 {
        0.0
    } else {
        (m2 * n as f64 / (n - 1) as f64).sqrt()
    };

    let (skewness, kurtosis) = if m2 > 0.0 {
        (m3 / m2.powf(1.5), m4 / (m2 * m2))
    } else {
        (0.0, 0.0)
    };

    let percentiles = Percentiles {
        p25: percentile_of_sorted(&sorted, 25.0),
        p50: percentile_of_sorted(&sorted, 50.0),
        p75: percentile_of_sorted(&sorted, 75.0),
        p90: percentile_of_sorted(&sorted, 90.0),
        p95: percentile_of_sorted(&sorted, 95.0),
        p99: percentile_of_sorted(&sorted, 99.0),
    };

    Ok(SummaryStatistics {
        count: n,
        mean,
        std_dev,
        sample_std_dev,
        min: sorted[0],
        max: sorted[n - 1],
        median: percentiles.p50,
        skewness,
        kurtosis,
        percentiles,
    })
}
