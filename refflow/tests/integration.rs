//! Integration tests for RefFlow
//!
//! These tests run complete analyses through the public API on a two-year
//! monthly consumption history.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use refflow::prelude::*;
use refflow::{
    Bandwidth, EstimatorError, NormalityVerdict, OutputFormat, Report, generate_csv_report,
    generate_json_report,
};
use std::io::Write;

const MONTHLY_M3: [f64; 24] = [
    285_400.0, 291_200.0, 302_800.0, 297_500.0, 310_300.0, 288_900.0, 279_600.0, 295_100.0,
    305_700.0, 318_200.0, 299_400.0, 292_600.0, 287_300.0, 301_900.0, 296_800.0, 308_400.0,
    314_700.0, 290_200.0, 283_500.0, 299_900.0, 311_600.0, 322_800.0, 304_100.0, 297_300.0,
];

fn series() -> ConsumptionSeries {
    ConsumptionSeries::new(MONTHLY_M3.to_vec()).unwrap()
}

fn assert_close(actual: f64, expected: f64, tolerance: f64) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {} within {} of {}",
        actual,
        tolerance,
        expected
    );
}

/// Percentile model end to end: reference, flows and statistics
#[test]
fn test_percentile_analysis() {
    let result = analyze(&series(), &ProjectParameters::default()).unwrap();

    assert_close(result.reference_consumption, 317_675.0, 1e-6);
    assert_close(result.summary.mean, 299_383.333_333, 1e-3);
    assert_close(result.summary.std_dev, 10_978.147, 1e-2);
    assert_eq!(result.summary.count, 24);

    // (317675 / 30) / 86400 * 1000
    assert_close(result.flows.base_mean_flow, 122.559_799, 1e-5);
    assert_eq!(result.flows.adjustment_factor, 1.0);
    assert_close(result.flows.max_daily_flow, 122.559_799 * 1.2, 1e-5);
    assert_close(result.flows.max_hourly_flow, 122.559_799 * 1.5, 1e-5);
    assert_close(result.flows.max_combined_flow, 122.559_799 * 1.8, 1e-5);
}

/// KDE quantiles sit within a grid step of the reference evaluation
#[test]
fn test_kde_analysis() {
    let params = ProjectParameters {
        model: EstimationModel::Kde,
        ..Default::default()
    };
    let result = analyze(&series(), &params).unwrap();
    let step = result.curves.kde.resolution();

    assert_close(step, (322_800.0 - 279_600.0) / 999.0, 1e-6);
    assert_close(result.reference_consumption, 317_870.27, step);

    for (p, expected) in [(50.0, 299_059.46), (90.0, 314_454.05), (99.0, 321_589.19)] {
        let value = result.curves.kde.quantile(p).unwrap();
        assert_close(value, expected, step);
    }
}

#[test]
fn test_kde_settings_change_the_estimate() {
    let base = ProjectParameters {
        model: EstimationModel::Kde,
        ..Default::default()
    };
    let silverman = ProjectParameters {
        kde: KdeConfig {
            bandwidth: Bandwidth::Silverman,
            ..Default::default()
        },
        ..base.clone()
    };
    let extended = ProjectParameters {
        kde: KdeConfig {
            cut: 3.0,
            ..Default::default()
        },
        ..base.clone()
    };

    let silverman = analyze(&series(), &silverman).unwrap();
    let extended = analyze(&series(), &extended).unwrap();
    assert_close(
        silverman.reference_consumption,
        317_913.51,
        silverman.curves.kde.resolution(),
    );
    // Extending the grid lets the estimate pass the largest reading
    assert_close(
        extended.reference_consumption,
        321_046.91,
        extended.curves.kde.resolution(),
    );
    assert!(extended.curves.kde.grid[0] < 279_600.0);
}

/// Both models agree closely on a well-behaved series
#[test]
fn test_models_agree_on_near_normal_history() {
    let pct = analyze(&series(), &ProjectParameters::default()).unwrap();
    let kde = analyze(
        &series(),
        &ProjectParameters {
            model: EstimationModel::Kde,
            ..Default::default()
        },
    )
    .unwrap();

    let relative = (pct.reference_consumption - kde.reference_consumption).abs()
        / pct.reference_consumption;
    assert!(relative < 0.01, "relative difference {}", relative);
}

#[test]
fn test_normality_battery_on_history() {
    let result = analyze(&series(), &ProjectParameters::default()).unwrap();
    let battery = &result.normality;

    assert_close(battery.shapiro_wilk.statistic, 0.98617, 1e-4);
    assert_close(battery.shapiro_wilk.p_value, 0.97779, 2e-3);
    assert_close(battery.dagostino_pearson.statistic, 0.55479, 1e-3);
    assert_close(battery.dagostino_pearson.p_value, 0.75775, 1e-3);
    assert_close(battery.kolmogorov_smirnov.statistic, 0.068105, 1e-5);
    assert_close(battery.kolmogorov_smirnov.p_value, 0.99948, 1e-3);

    for outcome in battery.outcomes() {
        assert_eq!(outcome.verdict, NormalityVerdict::FailsToReject);
    }
    assert!(result.looks_normal());
}

#[test]
fn test_skewed_history_rejects_normality() {
    let mut values = MONTHLY_M3[..12].to_vec();
    values.extend([610_000.0, 702_000.0, 655_000.0]);
    let series = ConsumptionSeries::new(values).unwrap();

    let result = analyze(&series, &ProjectParameters::default()).unwrap();
    assert_eq!(
        result.normality.shapiro_wilk.verdict,
        NormalityVerdict::Rejects
    );
    assert!(!result.looks_normal());
}

/// A flat year with one outlying month still analyses with a bounded histogram
#[test]
fn test_flat_history_with_outlier_month() {
    let mut values = vec![300_000.0; 9];
    values.extend([300_000.0001, 300_000.0002, 900_000.0]);
    let series = ConsumptionSeries::new(values).unwrap();

    for model in [EstimationModel::Percentile, EstimationModel::Kde] {
        let params = ProjectParameters {
            model,
            ..Default::default()
        };
        let result = analyze(&series, &params).unwrap();
        let histogram = &result.curves.histogram;

        assert!(histogram.bins() <= series.len());
        assert_eq!(histogram.counts.iter().sum::<usize>(), series.len());
        assert!(result.reference_consumption >= series.min());
        assert!(result.reference_consumption <= series.max());
        assert!(!result.looks_normal());
    }
}

#[test]
fn test_operating_hours_and_historical_maximum() {
    let params = ProjectParameters {
        operating_hours: Some(16.0),
        combined_flow: CombinedFlowDefinition::HistoricalMaximum,
        ..Default::default()
    };
    let result = analyze(&series(), &params).unwrap();

    assert_close(result.flows.adjustment_factor, 1.5, 1e-12);
    assert_close(
        result.flows.mean_flow,
        result.flows.base_mean_flow * 1.5,
        1e-9,
    );
    // 322800 / 30 / 86400 * 1000
    assert_close(result.flows.max_combined_flow, 124.537_037, 1e-5);
}

/// Analyses share no state: repeating one gives identical bits
#[test]
fn test_analysis_is_reproducible() {
    let params = ProjectParameters {
        model: EstimationModel::Kde,
        ..Default::default()
    };
    let first = analyze(&series(), &params).unwrap();
    let second = analyze(&series(), &params).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        first.reference_consumption.to_bits(),
        second.reference_consumption.to_bits()
    );
}

/// The KDE reference is read from the same curve that is charted
#[test]
fn test_reference_marker_matches_chart() {
    let params = ProjectParameters {
        model: EstimationModel::Kde,
        percentile: 90.0,
        ..Default::default()
    };
    let result = analyze(&series(), &params).unwrap();
    let charted = result.curves.kde.quantile(90.0).unwrap();
    assert_eq!(result.reference_consumption.to_bits(), charted.to_bits());
    assert_eq!(result.curves.reference_marker.value.to_bits(), charted.to_bits());
}

#[test]
fn test_random_histories_stay_in_range() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..20 {
        let n = rng.gen_range(8..60);
        let values: Vec<f64> = (0..n).map(|_| rng.gen_range(1_000.0..50_000.0)).collect();
        let series = ConsumptionSeries::new(values).unwrap();

        for model in [EstimationModel::Percentile, EstimationModel::Kde] {
            let params = ProjectParameters {
                percentile: rng.gen_range(50.0..=99.0),
                model,
                ..Default::default()
            };
            let result = analyze(&series, &params).unwrap();
            assert!(result.reference_consumption >= series.min());
            assert!(result.reference_consumption <= series.max());
            assert!(result.flows.max_combined_flow >= result.flows.mean_flow);
        }
    }
}

#[test]
fn test_session_from_csv_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "mes;consumo_m3").unwrap();
    for (i, value) in MONTHLY_M3.iter().enumerate() {
        writeln!(file, "2023-{:02};{},0", i + 1, value).unwrap();
    }

    let mut session = AnalysisSession::new();
    let loaded = session
        .load_csv_path(file.path(), &InputOptions::default())
        .unwrap();
    assert_eq!(loaded.values(), &MONTHLY_M3);
    assert_eq!(loaded.labels()[0], "2023-01");

    let result = session.analyze(&ProjectParameters::default()).unwrap();
    assert_close(result.reference_consumption, 317_675.0, 1e-6);

    session.clear();
    assert!(matches!(
        session.analyze(&ProjectParameters::default()),
        Err(EstimatorError::InvalidInput(_))
    ));
}

#[test]
fn test_error_kinds() {
    let short = ConsumptionSeries::new(MONTHLY_M3[..6].to_vec()).unwrap();
    assert!(matches!(
        analyze(&short, &ProjectParameters::default()),
        Err(EstimatorError::InsufficientSamples { got: 6, min: 8, .. })
    ));

    let flat = ConsumptionSeries::new(vec![300_000.0; 24]).unwrap();
    assert!(matches!(
        analyze(&flat, &ProjectParameters::default()),
        Err(EstimatorError::InvalidInput(_))
    ));

    assert!(ConsumptionSeries::new(vec![]).is_err());
    assert!("lognormal".parse::<EstimationModel>().is_err());
}

#[test]
fn test_reports() {
    let params = ProjectParameters::default();
    let result = analyze(&series(), &params).unwrap();
    let report = Report::new(params, result, Some("history.csv".to_string()));

    let json = generate_json_report(&report).unwrap();
    let parsed: Report = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.meta, report.meta);
    assert_eq!(parsed.result.model, report.result.model);
    assert_close(
        parsed.result.reference_consumption,
        report.result.reference_consumption,
        1e-6,
    );
    assert_eq!(
        parsed.result.curves.kde.len(),
        report.result.curves.kde.len()
    );

    let csv = generate_csv_report(&report).unwrap();
    assert_eq!(csv.lines().count(), 1 + report.result.curves.kde.len());

    assert_eq!("csv".parse::<OutputFormat>(), Ok(OutputFormat::Csv));
}
