//! Kernel Density Estimation
//!
//! Gaussian KDE evaluated on a uniform grid, with a cumulative distribution
//! obtained by trapezoidal integration.
//!
//! Quantiles read from a [`KdeCurve`] are **grid approximations**: the value
//! returned for percentile p is the first grid point whose cumulative
//! probability is at least p / 100. The error is bounded by the grid spacing
//! ([`KdeCurve::resolution`]), not by the density itself.

use crate::{DEFAULT_KDE_GRID_POINTS, MAX_KDE_GRID_POINTS};
use crate::error::{StatsError, check_samples};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Bandwidth selection rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Bandwidth {
    /// Scott's factor, n^(-1/5)
    #[default]
    Scott,
    /// Silverman's factor, (3n/4)^(-1/5)
    Silverman,
}

impl Bandwidth {
    /// Multiplier applied to the sample standard deviation
    pub fn factor(self, n: usize) -> f64 {
        let n = n as f64;
        match self {
            Bandwidth::Scott => n.powf(-0.2),
            Bandwidth::Silverman => (n * 0.75).powf(-0.2),
        }
    }
}

impl std::fmt::Display for Bandwidth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Bandwidth::Scott => write!(f, "scott"),
            Bandwidth::Silverman => write!(f, "silverman"),
        }
    }
}

impl std::str::FromStr for Bandwidth {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "scott" => Ok(Bandwidth::Scott),
            "silverman" => Ok(Bandwidth::Silverman),
            other => Err(format!("Unknown bandwidth rule: {}", other)),
        }
    }
}

/// KDE fitting and grid settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KdeConfig {
    /// Number of grid points (default: 1000)
    #[serde(default = "default_grid_points")]
    pub grid_points: usize,
    /// Grid extension beyond the data range, in bandwidths (default: 0)
    #[serde(default)]
    pub cut: f64,
    /// Bandwidth rule (default: Scott)
    #[serde(default)]
    pub bandwidth: Bandwidth,
    /// Multiplier on the rule's bandwidth (default: 1.0)
    #[serde(default = "default_bandwidth_adjust")]
    pub bandwidth_adjust: f64,
}

impl Default for KdeConfig {
    fn default() -> Self {
        Self {
            grid_points: default_grid_points(),
            cut: 0.0,
            bandwidth: Bandwidth::default(),
            bandwidth_adjust: default_bandwidth_adjust(),
        }
    }
}

fn default_grid_points() -> usize {
    DEFAULT_KDE_GRID_POINTS
}
fn default_bandwidth_adjust() -> f64 {
    1.0
}

impl KdeConfig {
    /// Check grid and bandwidth settings
    pub fn validate(&self) -> Result<(), StatsError> {
        if self.grid_points < 2 {
            return Err(StatsError::InvalidKdeConfig(format!(
                "grid_points must be at least 2, got {}",
                self.grid_points
            )));
        }
        if self.grid_points > MAX_KDE_GRID_POINTS {
            return Err(StatsError::InvalidKdeConfig(format!(
                "grid_points must be at most {}, got {}",
                MAX_KDE_GRID_POINTS, self.grid_points
            )));
        }
        if !self.cut.is_finite() || self.cut < 0.0 {
            return Err(StatsError::InvalidKdeConfig(format!(
                "cut must be a non-negative number, got {}",
                self.cut
            )));
        }
        if !self.bandwidth_adjust.is_finite() || self.bandwidth_adjust <= 0.0 {
            return Err(StatsError::InvalidKdeConfig(format!(
                "bandwidth_adjust must be positive, got {}",
                self.bandwidth_adjust
            )));
        }
        Ok(())
    }
}

/// Fitted Gaussian kernel density estimate
#[derive(Debug, Clone, PartialEq)]
pub struct GaussianKde {
    samples: Vec<f64>,
    bandwidth: f64,
    min: f64,
    max: f64,
}

impl GaussianKde {
    /// Fit a KDE to the samples
    ///
    /// Bandwidth = rule factor * sample standard deviation (n - 1) * adjustment.
    /// Needs at least two samples and non-zero variance.
    pub fn fit(samples: &[f64], config: &KdeConfig) -> Result<Self, StatsError> {
        check_samples(samples)?;
        config.validate()?;

        let n = samples.len();
        if n < 2 {
            return Err(StatsError::NotEnoughSamples { got: n, min: 2 });
        }

        let mean = samples.iter().sum::<f64>() / n as f64;
        let variance = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
        if variance <= 0.0 {
            return Err(StatsError::NoVariance);
        }

        let bandwidth = config.bandwidth.factor(n) * variance.sqrt() * config.bandwidth_adjust;
        let min = samples.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = samples.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

        Ok(Self {
            samples: samples.to_vec(),
            bandwidth,
            min,
            max,
        })
    }

    /// Kernel standard deviation
    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    /// Samples the estimate was fitted on
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// Estimated density at `x`
    pub fn density(&self, x: f64) -> f64 {
        let h = self.bandwidth;
        let norm = 1.0 / (self.samples.len() as f64 * h * (2.0 * PI).sqrt());
        let sum: f64 = self
            .samples
            .iter()
            .map(|&s| {
                let z = (x - s) / h;
                (-0.5 * z * z).exp()
            })
            .sum();
        sum * norm
    }

    /// Evaluate density and cumulative distribution on a uniform grid
    ///
    /// The grid spans `[min - cut * h, max + cut * h]`. Each grid point is
    /// evaluated independently, so the parallel evaluation is deterministic.
    pub fn evaluate(&self, config: &KdeConfig) -> Result<KdeCurve, StatsError> {
        config.validate()?;

        let points = config.grid_points;
        let lo = self.min - config.cut * self.bandwidth;
        let hi = self.max + config.cut * self.bandwidth;
        let step = (hi - lo) / (points - 1) as f64;

        let mut grid: Vec<f64> = (0..points).map(|i| lo + i as f64 * step).collect();
        grid[points - 1] = hi;

        let density: Vec<f64> = grid.par_iter().map(|&x| self.density(x)).collect();

        // Trapezoidal cumulative integral
        let mut cdf = Vec::with_capacity(points);
        cdf.push(0.0);
        let mut acc = 0.0;
        for i in 1..points {
            acc += 0.5 * (density[i] + density[i - 1]) * (grid[i] - grid[i - 1]);
            cdf.push(acc);
        }

        let mass = acc;
        if mass.is_nan() || mass <= 0.0 {
            return Err(StatsError::InvalidKdeConfig(
                "density vanishes on the grid; increase grid_points".to_string(),
            ));
        }
        for value in cdf.iter_mut() {
            *value /= mass;
        }

        Ok(KdeCurve {
            bandwidth: self.bandwidth,
            mass,
            grid,
            density,
            cdf,
        })
    }
}

/// KDE evaluated on a grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KdeCurve {
    /// Kernel standard deviation used
    pub bandwidth: f64,
    /// Probability mass captured by the grid before normalisation
    pub mass: f64,
    /// Grid points, ascending
    pub grid: Vec<f64>,
    /// Density at each grid point
    pub density: Vec<f64>,
    /// Cumulative probability at each grid point, normalised to end at 1
    pub cdf: Vec<f64>,
}

impl KdeCurve {
    /// Grid value at percentile `percentile` (0-100)
    ///
    /// First-index semantics: the smallest grid point whose cumulative
    /// probability is at least `percentile / 100`.
    pub fn quantile(&self, percentile: f64) -> Result<f64, StatsError> {
        if !(0.0..=100.0).contains(&percentile) {
            return Err(StatsError::InvalidPercentile(percentile));
        }
        let threshold = percentile / 100.0;
        let idx = self
            .cdf
            .iter()
            .position(|&c| c >= threshold)
            .unwrap_or(self.cdf.len() - 1);
        Ok(self.grid[idx])
    }

    /// Spacing between consecutive grid points
    pub fn resolution(&self) -> f64 {
        match (self.grid.first(), self.grid.last()) {
            (Some(lo), Some(hi)) if self.grid.len() > 1 => (hi - lo) / (self.grid.len() - 1) as f64,
            _ => 0.0,
        }
    }

    /// Number of grid points
    pub fn len(&self) -> usize {
        self.grid.len()
    }

    /// Whether the curve has no points
    pub fn is_empty(&self) -> bool {
        self.grid.is_empty()
    }
}
