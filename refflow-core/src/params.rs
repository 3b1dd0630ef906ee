//! Project Parameters
//!
//! Sizing parameters supplied alongside the consumption series.

use crate::error::{EstimatorError, Result};
use refflow_stats::KdeConfig;
use serde::{Deserialize, Serialize};

/// Seconds in a day of continuous operation
pub const DEFAULT_DAILY_SECONDS: u32 = 86_400;

/// Accepted range for the design percentile
pub const PERCENTILE_RANGE: (f64, f64) = (50.0, 99.0);

/// How the reference consumption is estimated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EstimationModel {
    /// Linear-interpolation percentile of the raw readings
    #[default]
    Percentile,
    /// Grid quantile of a Gaussian kernel density estimate
    Kde,
}

impl std::fmt::Display for EstimationModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EstimationModel::Percentile => write!(f, "percentile"),
            EstimationModel::Kde => write!(f, "kde"),
        }
    }
}

impl std::str::FromStr for EstimationModel {
    type Err = EstimatorError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "percentile" => Ok(EstimationModel::Percentile),
            "kde" => Ok(EstimationModel::Kde),
            other => Err(EstimatorError::invalid(format!(
                "unknown estimation model '{}' (expected 'percentile' or 'kde')",
                other
            ))),
        }
    }
}

/// Definition of the maximum combined (daily and hourly peak) flow
///
/// The two definitions give materially different numbers and are mutually
/// exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CombinedFlowDefinition {
    /// Mean flow scaled by both peaking coefficients, `Q * K1 * K2`
    #[default]
    PeakingProduct,
    /// Flow implied by the largest historical month, unscaled by K1/K2
    HistoricalMaximum,
}

impl std::fmt::Display for CombinedFlowDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CombinedFlowDefinition::PeakingProduct => write!(f, "peaking-product"),
            CombinedFlowDefinition::HistoricalMaximum => write!(f, "historical-maximum"),
        }
    }
}

impl std::str::FromStr for CombinedFlowDefinition {
    type Err = EstimatorError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "peaking-product" | "product" => Ok(CombinedFlowDefinition::PeakingProduct),
            "historical-maximum" | "historical-max" => {
                Ok(CombinedFlowDefinition::HistoricalMaximum)
            }
            other => Err(EstimatorError::invalid(format!(
                "unknown combined flow definition '{}'",
                other
            ))),
        }
    }
}

/// Parameters of one analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectParameters {
    /// Design percentile, 50-99
    pub percentile: f64,
    /// Days per month, 1-31
    pub days_per_month: u32,
    /// Seconds per day (86400 unless overridden)
    pub daily_seconds: u32,
    /// Daily operating hours, 1-24; `None` means continuous operation
    pub operating_hours: Option<f64>,
    /// Daily peaking coefficient (>= 1)
    pub k1: f64,
    /// Hourly peaking coefficient (>= 1)
    pub k2: f64,
    /// Reference estimation model
    pub model: EstimationModel,
    /// Definition of the maximum combined flow
    pub combined_flow: CombinedFlowDefinition,
    /// KDE settings (also used for the distribution curves)
    pub kde: KdeConfig,
}

impl Default for ProjectParameters {
    fn default() -> Self {
        Self {
            percentile: 95.0,
            days_per_month: 30,
            daily_seconds: DEFAULT_DAILY_SECONDS,
            operating_hours: None,
            k1: 1.2,
            k2: 1.5,
            model: EstimationModel::default(),
            combined_flow: CombinedFlowDefinition::default(),
            kde: KdeConfig::default(),
        }
    }
}

impl ProjectParameters {
    /// Check every parameter against its accepted range
    pub fn validate(&self) -> Result<()> {
        let (lo, hi) = PERCENTILE_RANGE;
        if !(lo..=hi).contains(&self.percentile) {
            return Err(EstimatorError::invalid(format!(
                "percentile must be between {} and {}, got {}",
                lo, hi, self.percentile
            )));
        }
        if !(1..=31).contains(&self.days_per_month) {
            return Err(EstimatorError::invalid(format!(
                "days per month must be between 1 and 31, got {}",
                self.days_per_month
            )));
        }
        if self.daily_seconds < 1 {
            return Err(EstimatorError::invalid("daily seconds must be at least 1"));
        }
        if let Some(hours) = self.operating_hours {
            if !(1.0..=24.0).contains(&hours) {
                return Err(EstimatorError::invalid(format!(
                    "operating hours must be between 1 and 24, got {}",
                    hours
                )));
            }
        }
        if !(self.k1 >= 1.0 && self.k1.is_finite()) {
            return Err(EstimatorError::invalid(format!(
                "K1 must be at least 1.0, got {}",
                self.k1
            )));
        }
        if !(self.k2 >= 1.0 && self.k2.is_finite()) {
            return Err(EstimatorError::invalid(format!(
                "K2 must be at least 1.0, got {}",
                self.k2
            )));
        }
        self.kde
            .validate()
            .map_err(|e| EstimatorError::from_stats("KDE", e))
    }
}
