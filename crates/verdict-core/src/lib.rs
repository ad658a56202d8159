//! # Verdict Core
//!
//! Tagged outcomes for operations that can fail, and the engine that chains
//! them.
//!
//! This crate provides the fundamental building blocks:
//! - [`Outcome`] - Success carrying a value, or failure carrying an [`ErrInfo`]
//! - [`Transform`] - Deferred, cache-once pipeline of composition steps
//! - [`compare`] - Priority ordering between outcomes
//! - [`FailureException`] - A failure as a `std::error::Error`
//! - [`VerdictError`] - API misuse and malformed input

pub mod compare;
pub mod compose;
pub mod err;
pub mod error;
pub mod exception;
pub mod options;
pub mod outcome;
pub mod transform;

// Re-exports for convenience
pub use compare::{compare, select};
pub use compose::Recover;
pub use err::{is_error_like, ErrGroup, ErrInfo, ErrLevel, ErrorLike, UNKNOWN_TYPE};
pub use error::{nope, unreachable, Result, VerdictError};
pub use exception::{raise, FailureException};
pub use options::Options;
pub use outcome::{
    fail, failure, failure_with, success, success_with, Failure, Outcome, Status, Success,
};
pub use transform::Transform;

/// Prelude module for common imports
pub mod prelude {
    pub use crate::compare::{compare, select};
    pub use crate::err::{ErrGroup, ErrInfo, ErrLevel};
    pub use crate::error::VerdictError;
    pub use crate::exception::{raise, FailureException};
    pub use crate::options::Options;
    pub use crate::outcome::{fail, failure, failure_with, success, success_with, Outcome};
    pub use crate::transform::Transform;
}
