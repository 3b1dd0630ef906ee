#![warn(missing_docs)]
//! # RefFlow
//!
//! Reference water consumption and design flow estimation from monthly
//! consumption history.
//!
//! - **Reference consumption**: design percentile of the readings, either by
//!   linear-interpolation percentile or by inverting a Gaussian KDE
//! - **Design flows**: mean, maximum daily, maximum hourly and maximum combined
//!   flow in L/s, with peaking coefficients and operating-hours adjustment
//! - **Normality battery**: Shapiro-Wilk, D'Agostino-Pearson and
//!   Kolmogorov-Smirnov, each with its own verdict
//! - **Distribution curves**: histogram, KDE and normal densities and CDFs
//!   ready for charting
//!
//! ## Quick Start
//!
//! ```ignore
//! use refflow::prelude::*;
//!
//! let series = ConsumptionSeries::new(vec![285_400.0, 291_200.0, /* ... */])?;
//! let params = ProjectParameters {
//!     model: EstimationModel::Kde,
//!     operating_hours: Some(16.0),
//!     ..Default::default()
//! };
//! let result = analyze(&series, &params)?;
//! println!("Q = {:.2} L/s", result.flows.mean_flow);
//! ```
//!
//! ## Sessions
//!
//! ```ignore
//! let mut session = AnalysisSession::new();
//! session.load_csv_path("consumption.csv".as_ref(), &InputOptions::default())?;
//! let result = session.analyze(&ProjectParameters::default())?;
//! ```

// Re-export core types
pub use refflow_core::{
    AnalysisSession, CombinedFlowDefinition, ConsumptionSeries, DerivedFlows,
    DistributionCurves, EmpiricalStep, EstimationModel, EstimationResult, EstimatorError,
    InputOptions, ProjectParameters, ReferenceMarker, analyze, compute_flows, estimate_reference,
    load_csv, load_csv_path,
};

// Re-export stats
pub use refflow_stats::{
    Bandwidth, Histogram, KdeConfig, KdeCurve, NormalityBattery, NormalityTest,
    NormalityVerdict, SummaryStatistics, TestOutcome,
};

// Re-export reporting
pub use refflow_report::{OutputFormat, Report, generate_csv_report, generate_json_report};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        AnalysisSession, CombinedFlowDefinition, ConsumptionSeries, EstimationModel,
        EstimationResult, InputOptions, KdeConfig, ProjectParameters, analyze,
    };
}

/// Run the RefFlow command-line interface.
///
/// ```ignore
/// fn main() {
///     refflow::run().unwrap();
/// }
/// ```
pub use refflow_cli::run;
