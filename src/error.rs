//! Error type for fallible sequence and statistics operations.

use thiserror::Error;

/// Error returned by statistics estimators and argument-checked generators.
///
/// Every failure is deterministic for a given input and is reported to the
/// immediate caller; nothing in this crate retries or swallows it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A statistic was requested over a sequence with no elements.
    #[error("sequence contains no elements")]
    EmptySequence,

    /// The estimator needs more elements than the sequence provided.
    #[error("estimator requires at least {required} elements, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    /// The percentile lies outside the valid range for the chosen convention.
    #[error("percentile {percentile} outside valid range [{min}, {max}]")]
    PercentileOutOfRange { percentile: f64, min: f64, max: f64 },

    /// An extracted key cannot be used as a finite real number.
    #[error("key at index {index} is not a finite real number: {reason}")]
    InvalidKey { index: usize, reason: &'static str },

    /// An argument violates the operation's contract.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl Error {
    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }
}

/// Type alias for results carrying [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
