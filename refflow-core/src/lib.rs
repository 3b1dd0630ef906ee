//! RefFlow Core
//!
//! Estimates the reference monthly water consumption of a project from its
//! consumption history and derives the design flow rates from it.
//!
//! An analysis takes a [`ConsumptionSeries`] and [`ProjectParameters`] and
//! produces an [`EstimationResult`]: the reference consumption (percentile or
//! KDE model), mean and peak flows in L/s, descriptive statistics, three
//! normality tests and chart-ready distribution curves.

#![warn(missing_docs)]

mod analysis;
mod curves;
mod dataset;
mod error;
mod estimator;
mod flows;
mod params;
mod result;
mod series;
mod session;

pub use analysis::analyze;
pub use curves::{
    DistributionCurves, EmpiricalStep, ReferenceMarker, build_curves, empirical_cdf,
};
pub use dataset::{Delimiter, InputOptions, load_csv, load_csv_path};
pub use error::{EstimatorError, Result};
pub use estimator::{estimate_reference, fit_density, kde_estimate, percentile_estimate};
pub use flows::{
    DerivedFlows, HOURS_PER_DAY, LITERS_PER_CUBIC_METER, adjustment_factor, base_mean_flow,
    compute_flows,
};
pub use params::{
    CombinedFlowDefinition, DEFAULT_DAILY_SECONDS, EstimationModel, PERCENTILE_RANGE,
    ProjectParameters,
};
pub use result::EstimationResult;
pub use series::ConsumptionSeries;
pub use session::AnalysisSession;
