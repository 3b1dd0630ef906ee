//! JSON Output

use crate::report::Report;

/// Generate a prettified JSON report.
///
/// The JSON holds the whole result, curves included, and deserialises back
/// into a [`Report`].
pub fn generate_json_report(report: &Report) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}
