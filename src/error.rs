//! # Error Types
//!
//! This module defines the error type shared by every part of the solver.
//! There are few ways for a run to fail: the input can be rejected before
//! any search starts, or the scratch memory and worker threads a restart
//! needs cannot be obtained. The local search itself always terminates.
//!
//! ## Examples
//!
//! Using the `Result` type:
//!
//! ```rust
//! use twoopt::error::{ClimbError, Result};
//!
//! fn check_restarts(restarts: usize) -> Result<()> {
//!     if restarts == 0 {
//!         return Err(ClimbError::InvalidInput("restart count is too small: 0".to_string()));
//!     }
//!     Ok(())
//! }
//!
//! assert!(check_restarts(0).is_err());
//! assert!(check_restarts(4).is_ok());
//! ```
//!
//! Using the `ResultExt` trait to add context to foreign errors:
//!
//! ```rust
//! use twoopt::error::{Result, ResultExt};
//!
//! fn parse_count(text: &str) -> Result<usize> {
//!     text.parse::<usize>().context("Failed to parse restart count")
//! }
//!
//! assert!(parse_count("x").is_err());
//! ```
//!
//! Using the `OptionExt` trait to convert `Option` to `Result`:
//!
//! ```rust
//! use twoopt::error::{ClimbError, OptionExt};
//!
//! fn first_length(lengths: &[i64]) -> twoopt::error::Result<i64> {
//!     lengths.iter().min().copied().ok_or_else_climb(||
//!         ClimbError::Other("no restart completed".to_string())
//!     )
//! }
//!
//! assert_eq!(first_length(&[7, 3]).unwrap(), 3);
//! ```

use std::error::Error as StdError;
use std::fmt;
use thiserror::Error;

/// Represents errors that can occur while preparing or running a search.
#[derive(Error, Debug)]
pub enum ClimbError {
    /// The problem instance or restart count was rejected before any search ran.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Scratch buffers, worker threads or the team pool could not be obtained.
    #[error("Allocation failure: {0}")]
    AllocationFailure(String),

    /// Error that occurs when an invalid configuration is provided.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A generic error with a custom message.
    #[error("{0}")]
    Other(String),
}

/// A specialized Result type for solver operations.
pub type Result<T> = std::result::Result<T, ClimbError>;

/// Extension trait for Result to add context to errors.
///
/// This trait provides a convenient way to add context to errors when
/// converting from one error type to `ClimbError`.
pub trait ResultExt<T, E> {
    /// Adds context to an error.
    ///
    /// ## Arguments
    ///
    /// * `context` - A string providing context for the error.
    ///
    /// ## Returns
    ///
    /// A `Result<T, ClimbError>` with the original value or a contextualized error.
    fn context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static;

    /// Adds context to an error and reports it as an [`ClimbError::AllocationFailure`].
    ///
    /// Used where the foreign error means a resource (memory, a thread, a pool)
    /// could not be obtained.
    fn allocation_context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static;
}

impl<T, E> ResultExt<T, E> for std::result::Result<T, E>
where
    E: StdError + Send + Sync + 'static,
{
    fn context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static,
    {
        self.map_err(|e| ClimbError::Other(format!("{}: {}", context, e)))
    }

    fn allocation_context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static,
    {
        self.map_err(|e| ClimbError::AllocationFailure(format!("{}: {}", context, e)))
    }
}

/// Extension trait for Option to convert to Result with a custom error.
pub trait OptionExt<T> {
    /// Converts an Option to a Result using a closure to generate the error.
    fn ok_or_else_climb<F>(self, err_fn: F) -> Result<T>
    where
        F: FnOnce() -> ClimbError;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_else_climb<F>(self, err_fn: F) -> Result<T>
    where
        F: FnOnce() -> ClimbError,
    {
        self.ok_or_else(err_fn)
    }
}

/// Reserves exactly `len` slots in a fresh vector, reporting failure as
/// [`ClimbError::AllocationFailure`] instead of aborting the process.
pub(crate) fn try_vec_with_capacity<T>(len: usize, what: &str) -> Result<Vec<T>> {
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(len)
        .allocation_context(format!("cannot allocate {} ({} slots)", what, len))?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = ClimbError::InvalidInput("the problem size must be at least 100".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid input: the problem size must be at least 100"
        );

        let err = ClimbError::AllocationFailure("gain table".to_string());
        assert_eq!(err.to_string(), "Allocation failure: gain table");
    }

    #[test]
    fn test_allocation_context() {
        let parsed: std::result::Result<u8, _> = "300".parse::<u8>();
        match parsed.allocation_context("worker pool") {
            Err(ClimbError::AllocationFailure(msg)) => assert!(msg.starts_with("worker pool: ")),
            other => panic!("Expected AllocationFailure, got {:?}", other),
        }
    }

    #[test]
    fn test_try_vec_with_capacity() {
        let buffer: Vec<u64> = try_vec_with_capacity(16, "scratch").unwrap();
        assert!(buffer.capacity() >= 16);
        assert!(buffer.is_empty());

        let huge: Result<Vec<u64>> = try_vec_with_capacity(usize::MAX / 2, "scratch");
        assert!(matches!(huge, Err(ClimbError::AllocationFailure(_))));
    }
}
