//! Failures as `std::error::Error` values.
//!
//! [`FailureException`] lets a failure travel through code that speaks
//! `Result<_, E>` and `?`, and turns back into an ordinary
//! [`Outcome::Failure`] on the other side.

use std::backtrace::Backtrace;

use thiserror::Error;

use crate::err::{ErrInfo, ErrorLike};
use crate::error::{Result, VerdictError};
use crate::options::Options;
use crate::outcome::{build_failure, Failure, Outcome, Status};

/// A failure raised as an error value.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct FailureException {
    failure: Failure,
    message: String,
}

impl FailureException {
    /// Never fails; input without a type gets one derived from the message
    /// or `"Unknown"`.
    pub fn new(error: impl Into<ErrorLike>, options: Options) -> Self {
        build_failure(error, options).into()
    }

    pub fn status(&self) -> Status {
        Status::Error
    }

    pub fn error(&self) -> &ErrInfo {
        self.failure.error()
    }

    pub fn order(&self) -> Option<f64> {
        self.failure.order()
    }

    pub fn code(&self) -> Option<i64> {
        self.failure.code()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn trace(&self) -> &Backtrace {
        self.failure.trace()
    }

    pub fn is_err_type(&self, kind: &str) -> bool {
        self.failure.error().is(kind)
    }

    /// Always fails: an exception carries no data.
    pub fn ok(&self) -> Result<()> {
        Err(VerdictError::DataOnFailure)
    }

    pub fn err(&self) -> &ErrInfo {
        self.failure.error()
    }

    pub fn into_failure(self) -> Failure {
        self.failure
    }
}

impl From<Failure> for FailureException {
    fn from(failure: Failure) -> Self {
        let message = failure.message().to_string();
        Self { failure, message }
    }
}

impl<T> From<FailureException> for Outcome<T> {
    fn from(exception: FailureException) -> Self {
        Outcome::Failure(exception.failure)
    }
}

impl<T> From<std::result::Result<T, FailureException>> for Outcome<T> {
    fn from(result: std::result::Result<T, FailureException>) -> Self {
        match result {
            Ok(data) => crate::outcome::success(data),
            Err(exception) => exception.into(),
        }
    }
}

impl<T> Outcome<T> {
    /// Converts into a `Result` so the failure can be propagated with `?`.
    pub fn into_result(self) -> std::result::Result<T, FailureException> {
        match self {
            Outcome::Success(success) => Ok(success.into_data()),
            Outcome::Failure(failure) => Err(failure.into()),
        }
    }
}

/// Builds a failure of type `kind` and returns it as an error.
pub fn raise<T>(
    kind: impl Into<String>,
    template: ErrInfo,
    options: Options,
) -> std::result::Result<T, FailureException> {
    Err(build_failure(template.retyped(kind), options).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::{failure, failure_with, success};
    use serde_json::Value;

    fn lookup(id: u32) -> std::result::Result<String, FailureException> {
        if id == 0 {
            return raise(
                "NotFound",
                ErrInfo::default().with_field("id", id),
                Options::new().code(404),
            );
        }
        Ok(format!("user-{id}"))
    }

    fn handler(id: u32) -> std::result::Result<usize, FailureException> {
        let name = lookup(id)?;
        Ok(name.len())
    }

    #[test]
    fn test_raise_crosses_question_mark() {
        let err = handler(0).unwrap_err();
        assert_eq!(err.error().kind(), "NotFound");
        assert_eq!(err.code(), Some(404));
        assert_eq!(err.status(), Status::Error);
        assert_eq!(err.to_string(), "NotFound");
        assert_eq!(err.ok(), Err(VerdictError::DataOnFailure));

        let outcome: Outcome<usize> = handler(0).into();
        assert!(outcome.is_err_type("NotFound"));
        assert_eq!(outcome.code(), Some(404));

        let outcome: Outcome<usize> = handler(7).into();
        assert_eq!(outcome.ok(), Ok(&6));
    }

    #[test]
    fn test_round_trip_preserves_fields() {
        let original: Outcome<()> =
            failure_with("e1", Options::new().order(2.0).code(9).message("boom"));
        let exception = original.clone().into_result().unwrap_err();

        assert_eq!(exception.message(), "boom");
        assert_eq!(exception.order(), Some(2.0));

        let back: Outcome<()> = exception.into();
        assert_eq!(back, original);
    }

    #[test]
    fn test_into_result_success() {
        assert_eq!(success(5).into_result().unwrap(), 5);
    }

    #[test]
    fn test_defaults_type() {
        let exception = FailureException::new(Value::Null, Options::new());
        assert_eq!(exception.error().kind(), "Unknown");
        assert_eq!(exception.message(), "Unknown");

        let exception = FailureException::new(Value::Null, Options::new().message("disk full"));
        assert_eq!(exception.error().kind(), "disk full");
        assert!(exception.is_err_type("disk full"));
    }

    #[test]
    fn test_works_with_anyhow() {
        fn boundary() -> anyhow::Result<()> {
            failure::<()>("e1").into_result()?;
            Ok(())
        }

        let err = boundary().unwrap_err();
        let exception = err.downcast::<FailureException>().unwrap();
        let outcome: Outcome<()> = exception.into();
        assert!(outcome.is_err_type("e1"));
    }
}
