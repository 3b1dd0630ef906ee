#![warn(missing_docs)]
//! RefFlow CLI Library
//!
//! Command-line front end: reads a consumption CSV, merges `refflow.toml`
//! with command-line overrides, runs the analysis and renders the report.
//!
//! ```text
//! refflow [OPTIONS] [INPUT]           analyze INPUT
//! refflow analyze [OPTIONS] INPUT
//! refflow init [--force]              write refflow.toml
//! ```

mod config;
mod formatting;

pub use config::*;
pub use formatting::format_human_output;

use anyhow::Context;
use clap::{Parser, Subcommand};
use refflow_core::{AnalysisSession, InputOptions, ProjectParameters};
use refflow_report::{
    OutputFormat, Report, generate_csv_report, generate_histogram_csv, generate_json_report,
};
use std::io::Write;
use std::path::{Path, PathBuf};

/// RefFlow CLI arguments
#[derive(Parser, Debug)]
#[command(name = "refflow")]
#[command(
    author,
    version,
    about = "RefFlow - reference water consumption and design flow estimator"
)]
pub struct Cli {
    /// Optional subcommand (Analyze, Init); defaults to Analyze
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Consumption CSV (label, m³ per month)
    pub input: Option<PathBuf>,

    /// Configuration file (discovered from the working directory if omitted)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Design percentile, 50-99
    #[arg(short, long, global = true)]
    pub percentile: Option<f64>,

    /// Days per month
    #[arg(short, long, global = true)]
    pub days: Option<u32>,

    /// Seconds per operating day
    #[arg(long, global = true)]
    pub daily_seconds: Option<u32>,

    /// Daily operating hours, 1-24
    #[arg(long, global = true)]
    pub hours: Option<f64>,

    /// Daily peaking coefficient
    #[arg(long, global = true)]
    pub k1: Option<f64>,

    /// Hourly peaking coefficient
    #[arg(long, global = true)]
    pub k2: Option<f64>,

    /// Estimation model: percentile, kde
    #[arg(short, long, global = true)]
    pub model: Option<String>,

    /// Combined flow definition: peaking-product, historical-maximum
    #[arg(long, global = true)]
    pub combined_flow: Option<String>,

    /// KDE grid points
    #[arg(long, global = true)]
    pub grid_points: Option<usize>,

    /// Field delimiter: auto, comma, semicolon, tab
    #[arg(long, global = true)]
    pub delimiter: Option<String>,

    /// Input has no header row
    #[arg(long, global = true)]
    pub no_headers: bool,

    /// Output format: human, json, csv
    #[arg(short, long, global = true)]
    pub format: Option<String>,

    /// Output file (stdout if not specified)
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyse a consumption CSV (default)
    Analyze {
        /// Consumption CSV (label, m³ per month)
        input: PathBuf,
    },
    /// Write a default refflow.toml in the current directory
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Run the RefFlow CLI with the process arguments.
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run_with_cli(cli)
}

/// Run the RefFlow CLI with pre-parsed arguments.
pub fn run_with_cli(cli: Cli) -> anyhow::Result<()> {
    // Logs go to stderr so reports on stdout stay machine-readable
    let filter = if cli.verbose {
        "refflow=debug"
    } else {
        "refflow=info"
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    match cli.command {
        Some(Commands::Init { force }) => {
            let path = std::env::current_dir()?.join(CONFIG_FILE_NAME);
            RefFlowConfig::write_default(&path, force)?;
            println!("Configuration written to: {}", path.display());
            Ok(())
        }
        Some(Commands::Analyze { ref input }) => analyze_file(&cli, input),
        None => {
            let input = cli
                .input
                .as_deref()
                .context("no input file given (see `refflow --help`)")?;
            analyze_file(&cli, input)
        }
    }
}

/// Load the explicit configuration file, or discover one
fn load_config(cli: &Cli) -> anyhow::Result<RefFlowConfig> {
    match &cli.config {
        Some(path) => RefFlowConfig::load(path),
        None => Ok(RefFlowConfig::discover()?.unwrap_or_default()),
    }
}

/// Merge configuration and command-line overrides (CLI wins)
pub fn resolve_parameters(cli: &Cli, config: &RefFlowConfig) -> anyhow::Result<ProjectParameters> {
    let mut params = config.parameters();

    if let Some(percentile) = cli.percentile {
        params.percentile = percentile;
    }
    if let Some(days) = cli.days {
        params.days_per_month = days;
    }
    if let Some(seconds) = cli.daily_seconds {
        params.daily_seconds = seconds;
    }
    if let Some(hours) = cli.hours {
        params.operating_hours = Some(hours);
    }
    if let Some(k1) = cli.k1 {
        params.k1 = k1;
    }
    if let Some(k2) = cli.k2 {
        params.k2 = k2;
    }
    if let Some(model) = &cli.model {
        params.model = model.parse()?;
    }
    if let Some(definition) = &cli.combined_flow {
        params.combined_flow = definition.parse()?;
    }
    if let Some(points) = cli.grid_points {
        params.kde.grid_points = points;
    }

    params.validate()?;
    Ok(params)
}

/// Merge input settings (CLI wins)
pub fn resolve_input_options(cli: &Cli, config: &RefFlowConfig) -> anyhow::Result<InputOptions> {
    let mut options = config.input;
    if let Some(delimiter) = &cli.delimiter {
        options.delimiter = delimiter.parse()?;
    }
    if cli.no_headers {
        options.has_headers = false;
    }
    Ok(options)
}

fn analyze_file(cli: &Cli, input: &Path) -> anyhow::Result<()> {
    let config = load_config(cli)?;
    let params = resolve_parameters(cli, &config)?;
    let input_options = resolve_input_options(cli, &config)?;

    let format_name = cli.format.as_deref().unwrap_or(&config.output.format);
    let format: OutputFormat = format_name.parse().map_err(anyhow::Error::msg)?;

    let mut session = AnalysisSession::new();
    session
        .load_csv_path(input, &input_options)
        .with_context(|| format!("loading {}", input.display()))?;

    let result = session
        .analyze(&params)
        .with_context(|| format!("analysing {}", input.display()))?;
    tracing::info!(
        reference = result.reference_consumption,
        mean_flow = result.flows.mean_flow,
        "analysis complete"
    );

    let report = Report::new(params, result, session.source().map(str::to_string));

    let output = match format {
        OutputFormat::Json => generate_json_report(&report)?,
        OutputFormat::Csv => generate_csv_report(&report)?,
        OutputFormat::Human => format_human_output(&report),
    };

    if let Some(ref path) = cli.output {
        write_output(path, &output)?;
        println!("Report written to: {}", path.display());

        if format == OutputFormat::Csv {
            let histogram_path = histogram_path(path);
            write_output(&histogram_path, &generate_histogram_csv(&report)?)?;
            println!("Histogram written to: {}", histogram_path.display());
        }
    } else {
        print!("{}", output);
    }

    Ok(())
}

fn write_output(path: &Path, content: &str) -> anyhow::Result<()> {
    let mut file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

/// `curves.csv` -> `curves_histogram.csv`
fn histogram_path(path: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "report".to_string());
    path.with_file_name(format!("{}_histogram.csv", stem))
}
