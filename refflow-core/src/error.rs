//! Estimator Errors

use refflow_stats::StatsError;
use thiserror::Error;

/// Errors surfaced to the user by an analysis
///
/// Nothing is retried: the user corrects the input or parameters and runs again.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EstimatorError {
    /// Malformed input file, non-numeric values or out-of-range parameters
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A statistical procedure needs more data than the series has
    #[error("Insufficient samples for {stage}: got {got}, need at least {min}")]
    InsufficientSamples {
        /// Computation that could not run
        stage: String,
        /// Samples available
        got: usize,
        /// Samples required
        min: usize,
    },
}

impl EstimatorError {
    /// Shorthand for [`EstimatorError::InvalidInput`]
    pub fn invalid(message: impl Into<String>) -> Self {
        EstimatorError::InvalidInput(message.into())
    }

    /// Attach the name of the failing computation to a statistics error
    pub fn from_stats(stage: &str, err: StatsError) -> Self {
        match err {
            StatsError::NotEnoughSamples { got, min } => EstimatorError::InsufficientSamples {
                stage: stage.to_string(),
                got,
                min,
            },
            other => EstimatorError::InvalidInput(format!("{}: {}", stage, other)),
        }
    }
}

/// Result alias for estimator operations
pub type Result<T> = std::result::Result<T, EstimatorError>;
