//! Configuration loading from refflow.toml
//!
//! Project defaults can be kept in a `refflow.toml` file next to the data.
//! The configuration is discovered by walking up from the current directory;
//! command-line flags override it.

use anyhow::Context;
use refflow_core::{
    CombinedFlowDefinition, DEFAULT_DAILY_SECONDS, EstimationModel, InputOptions,
    ProjectParameters,
};
use refflow_stats::KdeConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the configuration file
pub const CONFIG_FILE_NAME: &str = "refflow.toml";

/// RefFlow configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct RefFlowConfig {
    /// Sizing parameters
    #[serde(default)]
    pub project: ProjectConfig,
    /// Kernel density settings
    #[serde(default)]
    pub kde: KdeConfig,
    /// Input file settings
    #[serde(default)]
    pub input: InputOptions,
    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,
}

/// Sizing parameters of the project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Design percentile, 50-99
    #[serde(default = "default_percentile")]
    pub percentile: f64,
    /// Days per month
    #[serde(default = "default_days_per_month")]
    pub days_per_month: u32,
    /// Seconds per operating day
    #[serde(default = "default_daily_seconds")]
    pub daily_seconds: u32,
    /// Daily operating hours (continuous operation when absent)
    #[serde(default)]
    pub operating_hours: Option<f64>,
    /// Daily peaking coefficient
    #[serde(default = "default_k1")]
    pub k1: f64,
    /// Hourly peaking coefficient
    #[serde(default = "default_k2")]
    pub k2: f64,
    /// Estimation model: "percentile" or "kde"
    #[serde(default)]
    pub model: EstimationModel,
    /// Combined flow definition: "peaking-product" or "historical-maximum"
    #[serde(default)]
    pub combined_flow: CombinedFlowDefinition,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            percentile: default_percentile(),
            days_per_month: default_days_per_month(),
            daily_seconds: default_daily_seconds(),
            operating_hours: None,
            k1: default_k1(),
            k2: default_k2(),
            model: EstimationModel::default(),
            combined_flow: CombinedFlowDefinition::default(),
        }
    }
}

fn default_percentile() -> f64 {
    95.0
}
fn default_days_per_month() -> u32 {
    30
}
fn default_daily_seconds() -> u32 {
    DEFAULT_DAILY_SECONDS
}
fn default_k1() -> f64 {
    1.2
}
fn default_k2() -> f64 {
    1.5
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Default output format: "human", "json", "csv"
    #[serde(default = "default_format")]
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
        }
    }
}

fn default_format() -> String {
    "human".to_string()
}

impl RefFlowConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config: Self =
            toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))?;
        Ok(config)
    }

    /// Find `refflow.toml` in `start` or any of its ancestors
    pub fn find_from(start: &Path) -> Option<PathBuf> {
        let mut dir = start.to_path_buf();
        loop {
            let config_path = dir.join(CONFIG_FILE_NAME);
            if config_path.is_file() {
                return Some(config_path);
            }
            if !dir.pop() {
                return None;
            }
        }
    }

    /// Discover and load configuration by walking up from the current directory
    ///
    /// A discovered file that fails to parse is an error, not a silent default.
    pub fn discover() -> anyhow::Result<Option<Self>> {
        let cwd = std::env::current_dir()?;
        match Self::find_from(&cwd) {
            Some(path) => {
                tracing::debug!(path = %path.display(), "using configuration");
                Self::load(&path).map(Some)
            }
            None => Ok(None),
        }
    }

    /// Analysis parameters described by this configuration
    pub fn parameters(&self) -> ProjectParameters {
        ProjectParameters {
            percentile: self.project.percentile,
            days_per_month: self.project.days_per_month,
            daily_seconds: self.project.daily_seconds,
            operating_hours: self.project.operating_hours,
            k1: self.project.k1,
            k2: self.project.k2,
            model: self.project.model,
            combined_flow: self.project.combined_flow,
            kde: self.kde.clone(),
        }
    }

    /// Generate a default configuration as TOML string
    pub fn default_toml() -> String {
        r#"# RefFlow Configuration

[project]
# Design percentile for the reference consumption (50-99)
percentile = 95
# Days per month used to turn monthly volume into flow
days_per_month = 30
# Seconds per operating day
daily_seconds = 86400
# Daily operating hours, 1-24 (uncomment for non-continuous operation)
# operating_hours = 16
# Peaking coefficients
k1 = 1.2
k2 = 1.5
# Estimation model: "percentile" or "kde"
model = "percentile"
# Maximum combined flow: "peaking-product" (Q * K1 * K2) or "historical-maximum"
combined_flow = "peaking-product"

[kde]
# Grid points for the density and its cumulative distribution
grid_points = 1000
# Grid extension beyond the data range, in bandwidths
cut = 0.0
# Bandwidth rule: "scott" or "silverman"
bandwidth = "scott"
# Multiplier on the rule's bandwidth
bandwidth_adjust = 1.0

[input]
# Field delimiter: "auto", "comma", "semicolon" or "tab"
delimiter = "auto"
# Whether the first row holds column names
has_headers = true

[output]
# Default output format: human, json, csv
format = "human"
"#
        .to_string()
    }

    /// Write the default configuration to `path`
    ///
    /// Refuses to overwrite an existing file unless `force` is set.
    pub fn write_default(path: &Path, force: bool) -> anyhow::Result<()> {
        if path.exists() && !force {
            anyhow::bail!(
                "{} already exists (use --force to overwrite)",
                path.display()
            );
        }
        std::fs::write(path, Self::default_toml())
            .with_context(|| format!("writing {}", path.display()))
    }
}
