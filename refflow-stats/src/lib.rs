#![warn(missing_docs)]
//! RefFlow Statistical Engine
//!
//! Provides the statistical building blocks behind reference-consumption estimation:
//! - Percentile calculation with linear interpolation between closest ranks
//! - Descriptive statistics using the population (divisor n) convention
//! - Gaussian kernel density estimation with grid-based CDF inversion
//! - Normality test battery (Shapiro-Wilk, D'Agostino-Pearson, Kolmogorov-Smirnov)
//! - Histogram binning for distribution charts

mod distribution;
mod error;
mod histogram;
mod kde;
mod normality;
mod percentiles;
mod summary;

pub use distribution::{
    chi2_sf, kolmogorov_cdf, normal_cdf, normal_pdf, normal_quantile, normal_sf,
};
pub use error::StatsError;
pub use histogram::{Histogram, compute_histogram};
pub use kde::{Bandwidth, GaussianKde, KdeConfig, KdeCurve};
pub use normality::{
    NormalityBattery, NormalityTest, NormalityVerdict, TestOutcome, dagostino_pearson,
    interpret_p_value, kolmogorov_smirnov_normal, run_normality_battery, shapiro_wilk,
};
pub use percentiles::{Percentiles, compute_percentile, compute_percentiles};
pub use summary::{SummaryStatistics, compute_summary, mean, population_std_dev};

/// Significance level for every normality test (p > alpha fails to reject normality)
pub const NORMALITY_ALPHA: f64 = 0.05;

/// Default number of grid points for KDE evaluation
pub const DEFAULT_KDE_GRID_POINTS: usize = 1000;

/// Largest accepted number of KDE grid points
pub const MAX_KDE_GRID_POINTS: usize = 1_000_000;

/// Minimum sample count for the D'Agostino-Pearson omnibus test
pub const OMNIBUS_MIN_SAMPLES: usize = 8;

/// Sample count range supported by the Shapiro-Wilk approximation
pub const SHAPIRO_SAMPLE_RANGE: (usize, usize) = (3, 5000);
