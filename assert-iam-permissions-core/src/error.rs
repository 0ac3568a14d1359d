//! Error types for assertion runs

use crate::aws::AwsError;
use crate::types::Report;
use thiserror::Error;

/// Errors that end an assertion run.
///
/// Everything except [`AssertionError::Failed`] is raised the moment it is
/// detected. `Failed` carries the mismatches accumulated over a full
/// evaluation pass.
#[derive(Error, Debug)]
pub enum AssertionError {
    /// Malformed JSON in stdin, a flag value, or a nested assertions string.
    #[error("Parse error: {0}")]
    Parse(String),

    /// A required input is missing or empty after merging all sources.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The policy document has more non-whitespace characters than allowed.
    #[error("Policy document is {overage} characters over the expected limit of {max_length}")]
    Length { overage: usize, max_length: usize },

    /// The simulation service or its credential chain failed.
    #[error(transparent)]
    Aws(#[from] AwsError),

    /// One or more simulation results did not match their assertion.
    #[error("{0}")]
    Failed(Report),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AssertionError {
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

pub type AssertionResult<T> = Result<T, AssertionError>;
