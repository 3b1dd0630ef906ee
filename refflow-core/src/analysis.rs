//! Analysis Pipeline
//!
//! One analysis runs, in order: parameter validation, descriptive statistics,
//! a single KDE fit, the reference estimate, derived flows, the normality
//! battery and the distribution curves. Any failure aborts the whole analysis.

use crate::curves::{ReferenceMarker, build_curves};
use crate::error::{EstimatorError, Result};
use crate::estimator::{estimate_with_curve, fit_density};
use crate::flows::compute_flows;
use crate::params::ProjectParameters;
use crate::result::EstimationResult;
use crate::series::ConsumptionSeries;
use refflow_stats::{
    NormalityBattery, NormalityTest, compute_summary, dagostino_pearson,
    kolmogorov_smirnov_normal, shapiro_wilk,
};

/// Run the normality battery, naming the test that could not run
fn normality_battery(
    series: &ConsumptionSeries,
    mean: f64,
    std_dev: f64,
) -> Result<NormalityBattery> {
    let values = series.values();
    let stage = |test: NormalityTest| test.to_string();

    Ok(NormalityBattery {
        shapiro_wilk: shapiro_wilk(values)
            .map_err(|e| EstimatorError::from_stats(&stage(NormalityTest::ShapiroWilk), e))?,
        dagostino_pearson: dagostino_pearson(values).map_err(|e| {
            EstimatorError::from_stats(&stage(NormalityTest::DagostinoPearson), e)
        })?,
        kolmogorov_smirnov: kolmogorov_smirnov_normal(values, mean, std_dev).map_err(|e| {
            EstimatorError::from_stats(&stage(NormalityTest::KolmogorovSmirnov), e)
        })?,
    })
}

/// Analyse a consumption series
pub fn analyze(series: &ConsumptionSeries, params: &ProjectParameters) -> Result<EstimationResult> {
    params.validate()?;

    let summary = compute_summary(series.values())
        .map_err(|e| EstimatorError::from_stats("summary", e))?;

    // The curves need the density whichever model is selected
    let kde = fit_density(series, &params.kde)?;
    let reference = estimate_with_curve(series, params.percentile, params.model, &kde)?;
    tracing::debug!(
        model = %params.model,
        percentile = params.percentile,
        reference,
        "estimated reference consumption"
    );

    let flows = compute_flows(reference, params, series.max())?;
    let normality = normality_battery(series, summary.mean, summary.std_dev)?;
    for outcome in normality.outcomes() {
        tracing::debug!(
            test = %outcome.test,
            statistic = outcome.statistic,
            p_value = outcome.p_value,
            verdict = %outcome.verdict,
            "normality test"
        );
    }

    let marker = ReferenceMarker {
        value: reference,
        percentile: params.percentile,
        model: params.model,
    };
    let curves = build_curves(series, kde, summary.mean, summary.std_dev, marker)?;

    Ok(EstimationResult {
        reference_consumption: reference,
        model: params.model,
        percentile: params.percentile,
        summary,
        flows,
        normality,
        curves,
    })
}
