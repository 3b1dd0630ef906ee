#![warn(missing_docs)]
//! RefFlow Report - Output Generation
//!
//! Wraps an analysis result with its parameters and provenance and renders it:
//! - JSON (machine-readable, full result)
//! - CSV (chart series for spreadsheets)
//!
//! Human-readable terminal output lives in the CLI.

mod csv;
mod json;
mod report;

pub use csv::{generate_csv_report, generate_histogram_csv};
pub use json::generate_json_report;
pub use report::{REPORT_SCHEMA_VERSION, Report, ReportMeta};

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// JSON with the full result
    Json,
    /// CSV chart series
    Csv,
    /// Human-readable terminal output
    #[default]
    Human,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            "human" | "text" => Ok(OutputFormat::Human),
            other => Err(format!("Unknown output format: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_parsing() {
        assert_eq!("JSON".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert_eq!("text".parse::<OutputFormat>(), Ok(OutputFormat::Human));
        assert_eq!(
            "docx".parse::<OutputFormat>(),
            Err("Unknown output format: docx".to_string())
        );
    }
}
