//! Output Formatting
//!
//! Human-readable terminal output for an analysis report.

use refflow_core::EstimationModel;
use refflow_report::Report;

/// Format a volume in m³ with thousands separators
fn format_volume(value: f64) -> String {
    let rounded = format!("{:.2}", value);
    let (int_part, frac_part) = rounded.split_once('.').unwrap_or((rounded.as_str(), "00"));
    let (sign, digits) = match int_part.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", int_part),
    };

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    format!("{}{}.{}", sign, grouped, frac_part)
}

/// Format a report for human-readable terminal display
pub fn format_human_output(report: &Report) -> String {
    let params = &report.parameters;
    let result = &report.result;
    let summary = &result.summary;
    let flows = &result.flows;

    let mut output = String::new();

    output.push('\n');
    output.push_str("RefFlow Results\n");
    output.push_str(&"=".repeat(60));
    output.push_str("\n\n");

    if let Some(source) = &report.meta.source {
        output.push_str(&format!("Input: {} ({} months)\n\n", source, summary.count));
    }

    output.push_str("Reference consumption\n");
    output.push_str(&"-".repeat(60));
    output.push('\n');
    output.push_str(&format!(
        "  P{} ({}): {} m³/month\n",
        params.percentile,
        result.model,
        format_volume(result.reference_consumption)
    ));
    if result.model == EstimationModel::Kde {
        output.push_str(&format!(
            "      grid approximation, resolution {} m³ (bandwidth {})\n",
            format_volume(result.curves.kde.resolution()),
            format_volume(result.curves.kde.bandwidth)
        ));
    }
    output.push('\n');

    output.push_str("Design flows\n");
    output.push_str(&"-".repeat(60));
    output.push('\n');
    output.push_str(&format!(
        "  days/month: {}  seconds/day: {}  K1: {}  K2: {}\n",
        params.days_per_month, params.daily_seconds, params.k1, params.k2
    ));
    match params.operating_hours {
        Some(hours) => output.push_str(&format!(
            "  operating hours: {}  (adjustment x{:.4})\n",
            hours, flows.adjustment_factor
        )),
        None => output.push_str("  operating hours: 24 (continuous)\n"),
    }
    output.push_str(&format!(
        "  base mean flow:     {:>12.3} L/s\n",
        flows.base_mean_flow
    ));
    output.push_str(&format!("  mean flow:          {:>12.3} L/s\n", flows.mean_flow));
    output.push_str(&format!(
        "  max daily flow:     {:>12.3} L/s\n",
        flows.max_daily_flow
    ));
    output.push_str(&format!(
        "  max hourly flow:    {:>12.3} L/s\n",
        flows.max_hourly_flow
    ));
    output.push_str(&format!(
        "  max combined flow:  {:>12.3} L/s  ({})\n",
        flows.max_combined_flow, flows.combined_definition
    ));
    output.push('\n');

    output.push_str("Descriptive statistics\n");
    output.push_str(&"-".repeat(60));
    output.push('\n');
    output.push_str(&format!(
        "  mean: {}  std dev: {}  cv: {:.2}%\n",
        format_volume(summary.mean),
        format_volume(summary.std_dev),
        summary.coefficient_of_variation()
    ));
    output.push_str(&format!(
        "  min: {}  median: {}  max: {}\n",
        format_volume(summary.min),
        format_volume(summary.median),
        format_volume(summary.max)
    ));
    output.push_str(&format!(
        "  iqr: {}  range: {}\n",
        format_volume(summary.iqr()),
        format_volume(summary.range())
    ));
    output.push_str(&format!(
        "  skewness: {:.4}  kurtosis: {:.4}\n",
        summary.skewness, summary.kurtosis
    ));
    output.push('\n');

    output.push_str("Normality tests (alpha = 0.05)\n");
    output.push_str(&"-".repeat(60));
    output.push('\n');
    for outcome in result.normality.outcomes() {
        let icon = if outcome.verdict.is_normal() { "✓" } else { "✗" };
        output.push_str(&format!(
            "  {} {:<20} statistic: {:>10.5}  p-value: {:.5}  {}\n",
            icon,
            outcome.test.to_string(),
            outcome.statistic,
            outcome.p_value,
            outcome.verdict
        ));
    }
    if result.looks_normal() {
        output.push_str("  No test rejects normality\n");
    } else {
        output.push_str("  Normality rejected by at least one test\n");
    }

    output
}
