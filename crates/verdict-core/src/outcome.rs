//! The tagged success/failure value and its constructors.

use std::backtrace::Backtrace;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::err::{derive_kind, ErrInfo, ErrorLike};
use crate::error::{Result, VerdictError};
use crate::options::Options;

/// Tag of an outcome as it appears on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Success,
    Error,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Success => "success",
            Status::Error => "error",
        }
    }
}

/// Payload of a successful outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct Success<T> {
    data: T,
    order: Option<f64>,
    code: Option<i64>,
}

impl<T> Success<T> {
    pub fn data(&self) -> &T {
        &self.data
    }

    pub fn into_data(self) -> T {
        self.data
    }

    pub fn order(&self) -> Option<f64> {
        self.order
    }

    pub fn code(&self) -> Option<i64> {
        self.code
    }
}

/// Payload of a failed outcome.
#[derive(Debug, Clone)]
pub struct Failure {
    error: ErrInfo,
    order: Option<f64>,
    code: Option<i64>,
    /// Explicit message given at construction.
    message: Option<String>,
    /// Type label used when there is no explicit message.
    label: String,
    trace: Arc<Backtrace>,
}

impl Failure {
    pub(crate) fn new(
        error: ErrInfo,
        order: Option<f64>,
        code: Option<i64>,
        message: Option<String>,
    ) -> Self {
        let label = derive_kind(error.kind(), message.as_deref());
        Self {
            error,
            order,
            code,
            message,
            label,
            trace: Arc::new(Backtrace::capture()),
        }
    }

    /// Failure built from a coerced callback result. Priority, code and any
    /// explicit message carry over from the failure it replaces.
    pub(crate) fn replacing(error: ErrInfo, previous: &Failure) -> Self {
        Self::new(
            error,
            previous.order,
            previous.code,
            previous.message.clone(),
        )
    }

    pub fn error(&self) -> &ErrInfo {
        &self.error
    }

    pub fn into_error(self) -> ErrInfo {
        self.error
    }

    pub fn order(&self) -> Option<f64> {
        self.order
    }

    pub fn code(&self) -> Option<i64> {
        self.code
    }

    /// Explicit message if one was given, otherwise the error type, otherwise
    /// `"Unknown"`.
    pub fn message(&self) -> &str {
        match self.message.as_deref() {
            Some(message) if !message.is_empty() => message,
            _ => &self.label,
        }
    }

    /// Backtrace captured when the failure was constructed.
    pub fn trace(&self) -> &Backtrace {
        &self.trace
    }

    /// Same failure with its error type prefixed by `name`.
    pub(crate) fn namespaced(&self, name: &str) -> Self {
        let mut failure = self.clone();
        failure.error = self.error.namespaced(name);
        failure.label = derive_kind(failure.error.kind(), failure.message.as_deref());
        failure
    }
}

impl PartialEq for Failure {
    fn eq(&self, other: &Self) -> bool {
        self.error == other.error
            && self.order == other.order
            && self.code == other.code
            && self.message() == other.message()
    }
}

/// Result of an operation: exactly one of success or failure.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Success(Success<T>),
    Failure(Failure),
}

/// Creates a success.
pub fn success<T>(data: T) -> Outcome<T> {
    success_with(data, Options::default())
}

/// Creates a success with a priority and/or code. `message` is ignored.
pub fn success_with<T>(data: T, options: Options) -> Outcome<T> {
    Outcome::Success(Success {
        data,
        order: options.effective_order(),
        code: options.code,
    })
}

/// Creates a failure from anything error-like.
pub fn failure<T>(error: impl Into<ErrorLike>) -> Outcome<T> {
    failure_with(error, Options::default())
}

/// Creates a failure. Never fails: malformed input gets the type `"Unknown"`.
///
/// An explicit `options.message` is also written into the descriptor,
/// replacing whatever message it carried.
pub fn failure_with<T>(error: impl Into<ErrorLike>, options: Options) -> Outcome<T> {
    Outcome::Failure(build_failure(error, options))
}

pub(crate) fn build_failure(error: impl Into<ErrorLike>, options: Options) -> Failure {
    let order = options.effective_order();
    let Options { code, message, .. } = options;

    let mut info = error.into().into_descriptor(message.as_deref());
    if message.is_some() {
        info.message = message.clone();
    }

    Failure::new(info, order, code, message)
}

/// Creates a failure of type `kind` carrying the fields of `template`.
///
/// `kind` always wins over a type already present on the template.
pub fn fail<T>(kind: impl Into<String>, template: ErrInfo, options: Options) -> Outcome<T> {
    failure_with(template.retyped(kind), options)
}

impl<T> Outcome<T> {
    pub fn status(&self) -> Status {
        match self {
            Outcome::Success(_) => Status::Success,
            Outcome::Failure(_) => Status::Error,
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    pub fn is_err(&self) -> bool {
        matches!(self, Outcome::Failure(_))
    }

    /// True only for a failure whose type is exactly `kind`.
    pub fn is_err_type(&self, kind: &str) -> bool {
        match self {
            Outcome::Failure(failure) => failure.error.is(kind),
            Outcome::Success(_) => false,
        }
    }

    /// The success payload.
    pub fn ok(&self) -> Result<&T> {
        match self {
            Outcome::Success(success) => Ok(&success.data),
            Outcome::Failure(_) => Err(VerdictError::DataOnFailure),
        }
    }

    /// The error descriptor.
    pub fn err(&self) -> Result<&ErrInfo> {
        match self {
            Outcome::Failure(failure) => Ok(&failure.error),
            Outcome::Success(_) => Err(VerdictError::ErrorOnSuccess),
        }
    }

    pub fn into_ok(self) -> Result<T> {
        match self {
            Outcome::Success(success) => Ok(success.data),
            Outcome::Failure(_) => Err(VerdictError::DataOnFailure),
        }
    }

    pub fn into_err(self) -> Result<ErrInfo> {
        match self {
            Outcome::Failure(failure) => Ok(failure.error),
            Outcome::Success(_) => Err(VerdictError::ErrorOnSuccess),
        }
    }

    pub fn as_success(&self) -> Option<&Success<T>> {
        match self {
            Outcome::Success(success) => Some(success),
            Outcome::Failure(_) => None,
        }
    }

    pub fn as_failure(&self) -> Option<&Failure> {
        match self {
            Outcome::Failure(failure) => Some(failure),
            Outcome::Success(_) => None,
        }
    }

    pub fn order(&self) -> Option<f64> {
        match self {
            Outcome::Success(success) => success.order,
            Outcome::Failure(failure) => failure.order,
        }
    }

    pub fn code(&self) -> Option<i64> {
        match self {
            Outcome::Success(success) => success.code,
            Outcome::Failure(failure) => failure.code,
        }
    }

    /// Failure message; `None` on a success.
    pub fn message(&self) -> Option<&str> {
        self.as_failure().map(Failure::message)
    }
}

impl<T> From<Failure> for Outcome<T> {
    fn from(failure: Failure) -> Self {
        Outcome::Failure(failure)
    }
}

impl<T: Serialize> fmt::Display for Outcome<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Success(success) => {
                let json = serde_json::to_string(&success.data).map_err(|_| fmt::Error)?;
                write!(f, "Success<{json}>")
            }
            Outcome::Failure(failure) => {
                let json = serde_json::to_string(&failure.error).map_err(|_| fmt::Error)?;
                write!(f, "Failure<{json}>")
            }
        }
    }
}
