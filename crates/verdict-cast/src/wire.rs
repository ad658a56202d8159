//! Wire representation of outcomes.
//!
//! ```json
//! { "status": "success", "data": ..., "order": 1, "code": 200 }
//! { "status": "error", "error": { "type": "NotFound", ... }, "code": 404 }
//! ```
//!
//! `order` and `code` are optional. A skipped outcome's negative-infinity
//! order has no JSON form and is written as `null`, so it does not survive a
//! round trip.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;
use verdict_core::{
    failure_with, is_error_like, success_with, ErrInfo, Options, Outcome, Result, Status,
    VerdictError,
};

/// Owned form, used for decoding.
#[derive(Debug, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
enum Wire<T> {
    Success {
        data: T,
        #[serde(default)]
        order: Option<f64>,
        #[serde(default)]
        code: Option<i64>,
    },
    Error {
        error: Value,
        #[serde(default)]
        order: Option<f64>,
        #[serde(default)]
        code: Option<i64>,
    },
}

/// Borrowed form, used for encoding.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
enum WireRef<'a, T> {
    Success {
        data: &'a T,
        #[serde(skip_serializing_if = "Option::is_none")]
        order: Option<f64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        code: Option<i64>,
    },
    Error {
        error: &'a ErrInfo,
        #[serde(skip_serializing_if = "Option::is_none")]
        order: Option<f64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        code: Option<i64>,
    },
}

fn reject(detail: impl Into<String>) -> VerdictError {
    let detail = detail.into();
    debug!(%detail, "rejected wire payload");
    VerdictError::UnexpectedInput(detail)
}

/// Checks the outer shape before handing the payload to serde, so that
/// rejections name what is wrong.
fn check_shape(input: &Value) -> Result<Status> {
    let object = input
        .as_object()
        .ok_or_else(|| reject("payload is not an object"))?;

    match object.get("status").and_then(Value::as_str) {
        Some("success") => Ok(Status::Success),
        Some("error") => match object.get("error") {
            Some(error @ Value::Object(_)) if is_error_like(error) => Ok(Status::Error),
            _ => Err(reject("error payload lacks a string `type`")),
        },
        Some(other) => Err(reject(format!("unknown status `{other}`"))),
        None => Err(reject("missing `status`")),
    }
}

/// Converts an untyped `{status, data | error}` payload into an outcome.
///
/// Fails with [`VerdictError::UnexpectedInput`] when the payload matches
/// neither shape, when an error payload lacks a string `type`, or when `data`
/// does not decode as `T`. Error hints of the wrong JSON type are kept as
/// extra fields rather than rejected.
pub fn from_wire<T: DeserializeOwned>(input: Value) -> Result<Outcome<T>> {
    let status = check_shape(&input)?;
    let wire: Wire<T> =
        serde_json::from_value(input).map_err(|e| reject(format!("{}: {e}", status.as_str())))?;

    Ok(match wire {
        Wire::Success { data, order, code } => success_with(data, options(order, code)),
        Wire::Error { error, order, code } => {
            let error = ErrInfo::from_value(error)
                .ok_or_else(|| reject("error payload lacks a string `type`"))?;
            let mut options = options(order, code);
            options.message = error.message.clone();
            failure_with(error, options)
        }
    })
}

/// Parses JSON text and converts it with [`from_wire`].
pub fn from_wire_str<T: DeserializeOwned>(input: &str) -> Result<Outcome<T>> {
    let value: Value = serde_json::from_str(input)?;
    from_wire(value)
}

/// Encodes an outcome in the wire shape accepted by [`from_wire`].
pub fn to_wire<T: Serialize>(outcome: &Outcome<T>) -> Result<Value> {
    let wire = match outcome {
        Outcome::Success(success) => WireRef::Success {
            data: success.data(),
            order: success.order(),
            code: success.code(),
        },
        Outcome::Failure(failure) => WireRef::Error {
            error: failure.error(),
            order: failure.order(),
            code: failure.code(),
        },
    };
    serde_json::to_value(wire).map_err(|e| VerdictError::Invariant(e.to_string()))
}

/// Encodes an outcome as JSON text.
pub fn to_wire_string<T: Serialize>(outcome: &Outcome<T>) -> Result<String> {
    Ok(to_wire(outcome)?.to_string())
}

fn options(order: Option<f64>, code: Option<i64>) -> Options {
    Options {
        order,
        code,
        ..Options::default()
    }
}
