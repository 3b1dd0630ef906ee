//! Report Data Structures

use chrono::{DateTime, Utc};
use refflow_core::{EstimationResult, ProjectParameters};
use serde::{Deserialize, Serialize};

/// Version of the serialised report layout
pub const REPORT_SCHEMA_VERSION: u32 = 1;

/// Complete analysis report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Provenance
    pub meta: ReportMeta,
    /// Parameters the analysis ran with
    pub parameters: ProjectParameters,
    /// Analysis outcome
    pub result: EstimationResult,
}

/// Report metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportMeta {
    /// Layout version, see [`REPORT_SCHEMA_VERSION`]
    pub schema_version: u32,
    /// Version of the tool that produced the report
    pub version: String,
    /// When the report was generated
    pub timestamp: DateTime<Utc>,
    /// Input the series was read from
    pub source: Option<String>,
}

impl ReportMeta {
    /// Metadata stamped with the current time
    pub fn now(source: Option<String>) -> Self {
        Self {
            schema_version: REPORT_SCHEMA_VERSION,
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: Utc::now(),
            source,
        }
    }
}

impl Report {
    /// Build a report stamped with the current time
    pub fn new(
        parameters: ProjectParameters,
        result: EstimationResult,
        source: Option<String>,
    ) -> Self {
        Self {
            meta: ReportMeta::now(source),
            parameters,
            result,
        }
    }
}
