//! # Error Types
//!
//! This module defines the error type shared by every fallible operation in the
//! crate. Construction problems (mismatched input lengths, inverted bounds) and
//! invalid configuration are reported here. Numeric trouble inside the
//! evolutionary operators is not: those cases are repaired locally and the
//! optimizer keeps going.
//!
//! ## Examples
//!
//! ```rust
//! use sres::domain::ParameterSet;
//! use sres::error::SresError;
//!
//! let result = ParameterSet::from_vectors(&[1.0, 2.0], &[0.0], &[10.0, 10.0], false);
//!
//! match result {
//!     Err(SresError::LengthMismatch { lower_bounds, .. }) => assert_eq!(lower_bounds, 1),
//!     _ => panic!("expected a length mismatch"),
//! }
//! ```

use thiserror::Error;

/// Represents errors that can occur while building or running an optimizer.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SresError {
    /// The starting values, lower bounds and upper bounds do not have the same length.
    #[error(
        "Input vectors are not equal sizes. The starting values vector is {starting_values}; \
         the lower bounds vector is {lower_bounds}; and the upper bounds vector is {upper_bounds}"
    )]
    LengthMismatch {
        starting_values: usize,
        lower_bounds: usize,
        upper_bounds: usize,
    },

    /// A parameter has bounds that cannot describe a search interval.
    #[error("Invalid bounds for parameter {index}: lower bound {lower}, upper bound {upper}")]
    InvalidBounds { index: usize, lower: f64, upper: f64 },

    /// Error that occurs when an invalid configuration is provided.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Error that occurs when an operator runs before the population exists.
    #[error("Empty population error: the population has not been initialized")]
    EmptyPopulation,
}

/// A specialized Result type for optimizer operations.
pub type Result<T> = std::result::Result<T, SresError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_mismatch_message() {
        let err = SresError::LengthMismatch {
            starting_values: 2,
            lower_bounds: 3,
            upper_bounds: 2,
        };
        let msg = err.to_string();
        assert!(msg.contains("starting values vector is 2"));
        assert!(msg.contains("lower bounds vector is 3"));
    }
}
