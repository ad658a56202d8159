//! Synchronous composition: `on_ok`, `on_err`, `on_err_named`, `on_fail`.
//!
//! Each operation only runs its callback when the outcome has the matching
//! tag; otherwise the input is passed through untouched. Deferred variants
//! live in [`crate::transform`].

use serde_json::Value;
use tracing::debug;

use crate::err::ErrInfo;
use crate::error::{Result, VerdictError};
use crate::outcome::{Failure, Outcome};

/// What an `on_err` callback may hand back.
///
/// Anything other than a full outcome is turned into a failure that keeps the
/// priority and code of the failure it replaces.
#[derive(Debug, Clone, PartialEq)]
pub enum Recover<T> {
    Outcome(Outcome<T>),
    Type(String),
    Descriptor(ErrInfo),
    /// Untyped value; must be a string or an object with a string `type`.
    Value(Value),
}

impl<T> Recover<T> {
    /// Coerces into an outcome standing in for `previous`.
    pub(crate) fn into_outcome(self, previous: &Failure) -> Result<Outcome<T>> {
        let info = match self {
            Recover::Outcome(outcome) => return Ok(outcome),
            Recover::Type(kind) => ErrInfo::new(kind),
            Recover::Descriptor(info) => info,
            Recover::Value(value) => match ErrInfo::from_value(value) {
                Some(info) => info,
                None => {
                    debug!("on_err callback result is not error-like");
                    return Err(VerdictError::Conversion);
                }
            },
        };

        Ok(Outcome::Failure(Failure::replacing(info, previous)))
    }
}

impl<T> From<Outcome<T>> for Recover<T> {
    fn from(outcome: Outcome<T>) -> Self {
        Recover::Outcome(outcome)
    }
}

impl<T> From<Failure> for Recover<T> {
    fn from(failure: Failure) -> Self {
        Recover::Outcome(Outcome::Failure(failure))
    }
}

impl<T> From<&str> for Recover<T> {
    fn from(kind: &str) -> Self {
        Recover::Type(kind.to_string())
    }
}

impl<T> From<String> for Recover<T> {
    fn from(kind: String) -> Self {
        Recover::Type(kind)
    }
}

impl<T> From<ErrInfo> for Recover<T> {
    fn from(info: ErrInfo) -> Self {
        Recover::Descriptor(info)
    }
}

impl<T> From<Value> for Recover<T> {
    fn from(value: Value) -> Self {
        Recover::Value(value)
    }
}

/// Prefixes the error type of a failure; successes pass through.
pub(crate) fn apply_namespace<T>(outcome: Outcome<T>, name: Option<&str>) -> Outcome<T> {
    match (outcome, name) {
        (Outcome::Failure(failure), Some(name)) => Outcome::Failure(failure.namespaced(name)),
        (outcome, _) => outcome,
    }
}

impl<T> Outcome<T> {
    /// Runs `f` on the success payload. A failure is returned as is and `f`
    /// is never called.
    pub fn on_ok<U, F>(&self, f: F) -> Outcome<U>
    where
        F: FnOnce(&T, &Outcome<T>) -> Outcome<U>,
    {
        match self {
            Outcome::Success(success) => f(success.data(), self),
            Outcome::Failure(failure) => Outcome::Failure(failure.clone()),
        }
    }
}

impl<T: Clone> Outcome<T> {
    /// Replaces a failure with whatever outcome `f` returns.
    pub fn on_fail<F>(&self, f: F) -> Outcome<T>
    where
        F: FnOnce(&ErrInfo, &Outcome<T>) -> Outcome<T>,
    {
        match self {
            Outcome::Failure(failure) => f(failure.error(), self),
            Outcome::Success(_) => self.clone(),
        }
    }

    /// Maps a failure through `f`, coercing bare types and descriptors into
    /// failures.
    ///
    /// Fails with [`VerdictError::Conversion`] when `f` returns a value that
    /// is not error-like.
    pub fn on_err<R, F>(&self, f: F) -> Result<Outcome<T>>
    where
        F: FnOnce(&ErrInfo, &Outcome<T>) -> R,
        R: Into<Recover<T>>,
    {
        self.recover(None, f)
    }

    /// Like [`on_err`](Self::on_err), then prefixes the resulting error type
    /// with `name`.
    pub fn on_err_named<R, F>(&self, name: &str, f: F) -> Result<Outcome<T>>
    where
        F: FnOnce(&ErrInfo, &Outcome<T>) -> R,
        R: Into<Recover<T>>,
    {
        self.recover(Some(name), f)
    }

    fn recover<R, F>(&self, name: Option<&str>, f: F) -> Result<Outcome<T>>
    where
        F: FnOnce(&ErrInfo, &Outcome<T>) -> R,
        R: Into<Recover<T>>,
    {
        match self {
            Outcome::Failure(failure) => {
                let next = f(failure.error(), self).into().into_outcome(failure)?;
                Ok(apply_namespace(next, name))
            }
            Outcome::Success(_) => Ok(self.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::Options;
    use crate::outcome::{failure, failure_with, success};
    use serde_json::json;
    use std::cell::Cell;

    fn rnd(ok: bool) -> Outcome<String> {
        if ok {
            success("r1".to_string())
        } else {
            failure("e11")
        }
    }

    #[test]
    fn test_on_ok_success() {
        let next = rnd(true).on_ok(|data, _| success(data.len()));
        assert_eq!(next.ok(), Ok(&2));
    }

    #[test]
    fn test_on_ok_short_circuits() {
        let calls = Cell::new(0);
        let next: Outcome<bool> = rnd(false).on_ok(|_, _| {
            calls.set(calls.get() + 1);
            success(true)
        });

        assert_eq!(calls.get(), 0);
        assert!(next.is_err());
        assert_eq!(next.err().unwrap().kind(), "e11");
    }

    #[test]
    fn test_on_ok_passes_outcome() {
        let input = rnd(true);
        let next = input.on_ok(|_, outcome| success(outcome.is_ok()));
        assert_eq!(next.ok(), Ok(&true));
        assert_eq!(input.ok().unwrap(), "r1");
    }

    #[test]
    fn test_on_err_and_on_fail_skip_success() {
        let calls = Cell::new(0);
        let input = rnd(true);

        let next = input
            .on_err(|_, _| {
                calls.set(calls.get() + 1);
                "e21"
            })
            .unwrap();
        assert!(next.is_ok());
        assert_eq!(next.ok().unwrap(), "r1");

        let next = input.on_fail(|_, _| {
            calls.set(calls.get() + 1);
            failure("e21")
        });
        assert_eq!(next.ok().unwrap(), "r1");
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_on_fail_replaces() {
        let next = rnd(false).on_fail(|info, _| {
            assert_eq!(info.kind(), "e11");
            success("recovered".to_string())
        });
        assert_eq!(next.ok().unwrap(), "recovered");
    }

    #[test]
    fn test_on_err_coerces_type_string() {
        let input: Outcome<String> = failure_with("e11", Options::new().order(3.0).code(500));
        let next = input.on_err(|_, _| "e21").unwrap();

        assert_eq!(next.err().unwrap().kind(), "e21");
        assert_eq!(next.order(), Some(3.0));
        assert_eq!(next.code(), Some(500));
        assert_eq!(next.message(), Some("e21"));
    }

    #[test]
    fn test_on_err_coerces_descriptor_and_value() {
        let next = rnd(false)
            .on_err(|_, _| ErrInfo::new("e31").with_retry(true))
            .unwrap();
        assert_eq!(next.err().unwrap().kind(), "e31");
        assert_eq!(next.err().unwrap().retry, Some(true));

        let next = rnd(false)
            .on_err(|_, _| json!({ "type": "e32", "extra": 1 }))
            .unwrap();
        assert_eq!(next.err().unwrap().kind(), "e32");
        assert_eq!(next.err().unwrap().field("extra"), Some(&json!(1)));
    }

    #[test]
    fn test_on_err_keeps_explicit_message() {
        let input: Outcome<()> = failure_with("e11", Options::new().message("upstream down"));
        let next = input.on_err(|_, _| "e21").unwrap();
        assert_eq!(next.message(), Some("upstream down"));
    }

    #[test]
    fn test_on_err_accepts_full_outcome() {
        let next = rnd(false).on_err(|_, _| success("fixed".to_string())).unwrap();
        assert_eq!(next.ok().unwrap(), "fixed");
    }

    #[test]
    fn test_on_err_rejects_non_error() {
        let result = rnd(false).on_err(|_, _| json!(5));
        assert_eq!(result, Err(VerdictError::Conversion));
        assert_eq!(
            result.unwrap_err().to_string(),
            "can't convert to error"
        );

        let result = rnd(false).on_err(|_, _| json!({ "type": 5 }));
        assert_eq!(result, Err(VerdictError::Conversion));
    }

    #[test]
    fn test_namespacing_concatenates() {
        let input: Outcome<()> = failure("x");
        let next = input
            .on_err_named("a", |info, _| info.clone())
            .unwrap()
            .on_err_named("b", |info, _| info.clone())
            .unwrap();

        assert_eq!(next.err().unwrap().kind(), "bax");
        assert_eq!(input.err().unwrap().kind(), "x");
    }

    #[test]
    fn test_namespacing_applies_to_new_type() {
        let next = rnd(false).on_err_named("Db", |_, _| "Timeout").unwrap();
        assert_eq!(next.err().unwrap().kind(), "DbTimeout");
        assert_eq!(next.message(), Some("DbTimeout"));
    }

    #[test]
    fn test_namespacing_ignores_recovered_success() {
        let next = rnd(false)
            .on_err_named("Db", |_, _| success("ok".to_string()))
            .unwrap();
        assert_eq!(next.ok().unwrap(), "ok");
    }
}
