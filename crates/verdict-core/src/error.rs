//! Error types for misuse of the Verdict API.
//!
//! Domain failures are data (the [`Failure`](crate::Failure) variant) and are
//! never reported through this type. `VerdictError` covers the programmer
//! errors and malformed inputs that the engine refuses to paper over.

use std::convert::Infallible;
use std::fmt;

use thiserror::Error;

/// Main error type for Verdict operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerdictError {
    /// `ok()` was called on a failure.
    #[error("can't access data on error")]
    DataOnFailure,

    /// `err()` was called on a success.
    #[error("can't access error on data")]
    ErrorOnSuccess,

    /// An `on_err` callback returned something that is not error-like.
    #[error("can't convert to error")]
    Conversion,

    /// A wire payload matched neither the success nor the error shape.
    #[error("unexpected input: {0}")]
    UnexpectedInput(String),

    /// Internal state that should be unreachable.
    #[error("invariant violated: {0}")]
    Invariant(String),
}

impl VerdictError {
    /// Returns true if this is a wrong-side extraction.
    pub fn is_access(&self) -> bool {
        matches!(
            self,
            VerdictError::DataOnFailure | VerdictError::ErrorOnSuccess
        )
    }

    /// Returns true if the error indicates misuse of the API rather than bad
    /// external input.
    pub fn is_programmer_error(&self) -> bool {
        !matches!(self, VerdictError::UnexpectedInput(_))
    }
}

/// Convenience Result type for Verdict operations.
pub type Result<T> = std::result::Result<T, VerdictError>;

impl From<serde_json::Error> for VerdictError {
    fn from(err: serde_json::Error) -> Self {
        VerdictError::UnexpectedInput(err.to_string())
    }
}

/// Exhaustiveness check for matches whose remaining arm cannot exist.
pub fn unreachable(never: Infallible) -> ! {
    match never {}
}

/// Default arm of a match over error types: reports the unhandled value as
/// an invariant violation.
pub fn nope(value: impl fmt::Debug) -> VerdictError {
    VerdictError::Invariant(format!("unreachable: {value:?}"))
}
