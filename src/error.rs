//! # Centralized Error Handling
//!
//! Unified error types for the entire crate using `thiserror`.
//!
//! Cancellation is deliberately absent: a caller stopping the computation is
//! reported through [`crate::model::Outcome::Cancelled`], not as an error.

use thiserror::Error;

/// Main error type for Dendra operations
#[derive(Error, Debug)]
pub enum DendraError {
    /// I/O errors (file missing, permission denied, read/write failures)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Rejected sample data (fewer than two samples, empty vectors, ragged rows, NaN)
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// The allocator refused a buffer for the distance matrix or cluster bookkeeping
    #[error("Allocation failure: could not reserve {requested} elements for {what}")]
    Allocation { what: &'static str, requested: usize },

    /// Sample file parse errors
    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    /// Configuration errors (invalid CLI arguments)
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Type alias for Results using DendraError
pub type Result<T> = std::result::Result<T, DendraError>;

impl DendraError {
    /// Create an invalid input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Create an allocation error for `requested` elements of `what`
    pub fn allocation(what: &'static str, requested: usize) -> Self {
        Self::Allocation { what, requested }
    }

    /// Create a parse error
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

/// Reserve exactly `additional` more slots in `buf`, mapping refusal to [`DendraError::Allocation`].
pub(crate) fn try_reserve_exact<T>(
    buf: &mut Vec<T>,
    additional: usize,
    what: &'static str,
) -> Result<()> {
    buf.try_reserve_exact(additional)
        .map_err(|_| DendraError::allocation(what, additional))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = DendraError::invalid_input("need at least 2 samples, got 1");
        assert_eq!(
            err.to_string(),
            "Invalid input: need at least 2 samples, got 1"
        );

        let err = DendraError::parse(7, "expected 3 values, found 2");
        assert_eq!(err.to_string(), "Parse error at line 7: expected 3 values, found 2");
    }

    #[test]
    fn test_reserve_overflow_is_allocation_error() {
        let mut buf: Vec<f32> = Vec::new();
        let err = try_reserve_exact(&mut buf, usize::MAX, "distance matrix").unwrap_err();
        assert!(matches!(
            err,
            DendraError::Allocation {
                what: "distance matrix",
                ..
            }
        ));
    }
}
