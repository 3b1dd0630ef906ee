//! Estimation Result

use crate::curves::DistributionCurves;
use crate::flows::DerivedFlows;
use crate::params::EstimationModel;
use refflow_stats::{NormalityBattery, SummaryStatistics};
use serde::{Deserialize, Serialize};

/// Complete outcome of one analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimationResult {
    /// Reference consumption, m³/month
    pub reference_consumption: f64,
    /// Model used for the reference
    pub model: EstimationModel,
    /// Design percentile
    pub percentile: f64,
    /// Descriptive statistics of the readings
    pub summary: SummaryStatistics,
    /// Design flows, L/s
    pub flows: DerivedFlows,
    /// Normality test outcomes
    pub normality: NormalityBattery,
    /// Chart data
    pub curves: DistributionCurves,
}

impl EstimationResult {
    /// Whether every normality test fails to reject
    pub fn looks_normal(&self) -> bool {
        self.normality.all_fail_to_reject()
    }
}
