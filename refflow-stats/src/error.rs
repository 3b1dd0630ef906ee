//! Statistics Errors

use thiserror::Error;

/// Errors raised by statistical computations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StatsError {
    /// No samples at all
    #[error("No samples provided")]
    EmptySamples,

    /// Fewer samples than the procedure needs
    #[error("Not enough samples: got {got}, need at least {min}")]
    NotEnoughSamples {
        /// Samples supplied
        got: usize,
        /// Samples required
        min: usize,
    },

    /// More samples than the procedure supports
    #[error("Too many samples: got {got}, at most {max} supported")]
    TooManySamples {
        /// Samples supplied
        got: usize,
        /// Largest supported count
        max: usize,
    },

    /// Every sample has the same value
    #[error("All samples have the same value")]
    NoVariance,

    /// NaN or infinite sample
    #[error("Sample {index} is not a finite number ({value})")]
    NonFinite {
        /// Position in the input
        index: usize,
        /// Offending value
        value: f64,
    },

    /// Percentile outside [0, 100]
    #[error("Invalid percentile: {0} (must be between 0 and 100)")]
    InvalidPercentile(f64),

    /// KDE grid or bandwidth settings out of range
    #[error("Invalid KDE configuration: {0}")]
    InvalidKdeConfig(String),
}

/// Reject empty or non-finite input
pub(crate) fn check_samples(samples: &[f64]) -> Result<(), StatsError> {
    if samples.is_empty() {
        return Err(StatsError::EmptySamples);
    }
    if let Some((index, &value)) = samples.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(StatsError::NonFinite { index, value });
    }
    Ok(())
}

/// Sort a copy of the samples ascending
pub(crate) fn sorted_copy(samples: &[f64]) -> Vec<f64> {
    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    sorted
}
