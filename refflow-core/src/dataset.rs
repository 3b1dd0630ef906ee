//! CSV Ingestion
//!
//! Reads a consumption series from a delimited file: column 1 is the label
//! (usually the month), column 2 the consumption in m³. Extra columns are
//! ignored and blank lines skipped.

use crate::error::{EstimatorError, Result};
use crate::series::ConsumptionSeries;
use csv::{ReaderBuilder, Trim};
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;

/// Field delimiter of the input file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Delimiter {
    /// Pick from the first non-blank line (`;`, then tab, else `,`)
    #[default]
    Auto,
    /// `,`
    Comma,
    /// `;`
    Semicolon,
    /// Tab
    Tab,
}

impl Delimiter {
    fn resolve(self, content: &str) -> u8 {
        match self {
            Delimiter::Comma => b',',
            Delimiter::Semicolon => b';',
            Delimiter::Tab => b'\t',
            Delimiter::Auto => {
                let first = content.lines().find(|l| !l.trim().is_empty()).unwrap_or("");
                if first.contains(';') {
                    b';'
                } else if first.contains('\t') {
                    b'\t'
                } else {
                    b','
                }
            }
        }
    }
}

impl std::str::FromStr for Delimiter {
    type Err = EstimatorError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(Delimiter::Auto),
            "comma" | "," => Ok(Delimiter::Comma),
            "semicolon" | ";" => Ok(Delimiter::Semicolon),
            "tab" | "\\t" => Ok(Delimiter::Tab),
            other => Err(EstimatorError::invalid(format!(
                "unknown delimiter '{}' (expected auto, comma, semicolon or tab)",
                other
            ))),
        }
    }
}

/// How the input file is read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputOptions {
    /// Field delimiter
    #[serde(default)]
    pub delimiter: Delimiter,
    /// Whether the first row is a header
    #[serde(default = "default_has_headers")]
    pub has_headers: bool,
}

fn default_has_headers() -> bool {
    true
}

impl Default for InputOptions {
    fn default() -> Self {
        Self {
            delimiter: Delimiter::Auto,
            has_headers: default_has_headers(),
        }
    }
}

/// Parse one consumption field
///
/// A comma is read as the decimal separator unless it is the field delimiter.
fn parse_value(raw: &str, delimiter: u8) -> Option<f64> {
    let raw = raw.trim();
    if delimiter != b',' && raw.contains(',') && !raw.contains('.') {
        raw.replace(',', ".").parse().ok()
    } else {
        raw.parse().ok()
    }
}

/// Read a consumption series from CSV
pub fn load_csv<R: Read>(mut reader: R, options: &InputOptions) -> Result<ConsumptionSeries> {
    let mut content = String::new();
    reader
        .read_to_string(&mut content)
        .map_err(|e| EstimatorError::invalid(format!("cannot read input: {}", e)))?;

    let delimiter = options.delimiter.resolve(&content);
    let mut csv = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(options.has_headers)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(content.as_bytes());

    let mut labels = Vec::new();
    let mut values = Vec::new();
    for record in csv.records() {
        let record = record.map_err(|e| EstimatorError::invalid(format!("malformed CSV: {}", e)))?;
        let line = record.position().map_or(0, |p| p.line());

        if record.iter().all(|field| field.is_empty()) {
            continue;
        }
        if record.len() < 2 {
            return Err(EstimatorError::invalid(format!(
                "row {}: expected a label and a consumption column",
                line
            )));
        }

        let raw = &record[1];
        let value = parse_value(raw, delimiter).ok_or_else(|| {
            EstimatorError::invalid(format!("row {}: '{}' is not a number", line, raw))
        })?;
        if !value.is_finite() || value < 0.0 {
            return Err(EstimatorError::invalid(format!(
                "row {}: consumption must be a non-negative number, got '{}'",
                line, raw
            )));
        }

        labels.push(record[0].to_string());
        values.push(value);
    }

    if values.is_empty() {
        return Err(EstimatorError::invalid("input contains no data rows"));
    }

    tracing::debug!(
        rows = values.len(),
        delimiter = %(delimiter as char).escape_default(),
        "parsed consumption CSV"
    );
    ConsumptionSeries::with_labels(labels, values)
}

/// Read a consumption series from a CSV file
pub fn load_csv_path(path: &Path, options: &InputOptions) -> Result<ConsumptionSeries> {
    let file = std::fs::File::open(path).map_err(|e| {
        EstimatorError::invalid(format!("cannot open {}: {}", path.display(), e))
    })?;
    load_csv(std::io::BufReader::new(file), options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn load(content: &str) -> Result<ConsumptionSeries> {
        load_csv(content.as_bytes(), &InputOptions::default())
    }

    #[test]
    fn test_comma_file() {
        let series = load("month,consumption\njan,285400\nfeb,291200.5\n\nmar,302800\n").unwrap();
        assert_eq!(series.labels(), &["jan", "feb", "mar"]);
        assert_eq!(series.values(), &[285_400.0, 291_200.5, 302_800.0]);
    }

    #[test]
    fn test_semicolon_with_decimal_comma() {
        let series = load("mes;consumo\nene;1234,5\nfeb; 987,25 \n").unwrap();
        assert_eq!(series.values(), &[1234.5, 987.25]);
    }

    #[test]
    fn test_tab_and_extra_columns() {
        let series = load("month\tm3\tnote\njan\t10\tok\nfeb\t20\n").unwrap();
        assert_eq!(series.values(), &[10.0, 20.0]);
    }

    #[test]
    fn test_without_header() {
        let options = InputOptions {
            has_headers: false,
            ..Default::default()
        };
        let series = load_csv("jan,10\nfeb,20\n".as_bytes(), &options).unwrap();
        assert_eq!(series.len(), 2);
    }

    #[test]
    fn test_errors_name_the_row() {
        let err = load("month,consumption\njan,10\nfeb,lots\n").unwrap_err();
        assert_eq!(err.to_string(), "Invalid input: row 3: 'lots' is not a number");

        let err = load("month,consumption\njan,10\nfeb,-4\n").unwrap_err();
        assert!(err.to_string().contains("row 3"));

        let err = load("month,consumption\njan\n").unwrap_err();
        assert!(err.to_string().contains("row 2"));
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(
            load("month,consumption\n"),
            Err(EstimatorError::InvalidInput(_))
        ));
        assert!(load("").is_err());
    }

    #[test]
    fn test_delimiter_parsing() {
        assert_eq!(";".parse::<Delimiter>().unwrap(), Delimiter::Semicolon);
        assert_eq!("Tab".parse::<Delimiter>().unwrap(), Delimiter::Tab);
        assert!("pipe".parse::<Delimiter>().is_err());
    }

    #[test]
    fn test_load_from_path() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "month;m3").unwrap();
        writeln!(file, "2023-01;100").unwrap();
        writeln!(file, "2023-02;110").unwrap();
        let series = load_csv_path(file.path(), &InputOptions::default()).unwrap();
        assert_eq!(series.labels(), &["2023-01", "2023-02"]);

        let missing = file.path().with_extension("missing");
        assert!(load_csv_path(&missing, &InputOptions::default()).is_err());
    }
}
