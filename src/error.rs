//! Error handling for program validation and execution.
//!
//! # Error Categories
//!
//! Errors fall into two groups:
//!
//! - **Validation**: a program arrived from a loosely typed host (JSON,
//!   scripting bridges) and a code value is not representable as a signed
//!   64-bit integer. Raised before execution starts.
//! - **Runtime**: a configured limit was hit while executing. The only
//!   runtime error today is the step budget; the instruction set itself is
//!   total and cannot fail.
//!
//! # Error Handling Policy
//!
//! Errors are returned, never panicked, and carry enough context (index,
//! offending value, limit) to report the failure without access to the
//! original call site.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Failures raised by program validation and execution.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A code value has a fractional part (or is NaN / infinite) and so
    /// cannot be an instruction id or an accumulator literal.
    #[error("code value at index {index} is not an integer: {value}")]
    NonIntegralCode {
        /// Position of the offending value in the code sequence.
        index: usize,
        /// The value as it arrived.
        value: f64,
    },

    /// A code value is integral but falls outside the signed 64-bit range.
    #[error("code value at index {index} does not fit a signed 64-bit integer: {value}")]
    CodeOutOfRange {
        /// Position of the offending value in the code sequence.
        index: usize,
        /// The value as it arrived.
        value: f64,
    },

    /// The run executed as many instructions as the configured budget
    /// allows and the program has not finished.
    #[error("step limit of {limit} instructions exceeded")]
    StepLimitExceeded {
        /// The configured budget.
        limit: u64,
    },
}
