//! Construction options shared by the success and failure constructors.

use serde::{Deserialize, Serialize};

/// Options accepted by [`success_with`](crate::success_with) and
/// [`failure_with`](crate::failure_with).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Options {
    /// Priority used by [`compare`](crate::compare). Missing means 0.
    pub order: Option<f64>,

    /// Numeric code, e.g. an HTTP status.
    pub code: Option<i64>,

    /// Forces `order` to negative infinity so the outcome always loses.
    #[serde(default)]
    pub skip: bool,

    /// Human-readable message. Ignored by the success constructor.
    pub message: Option<String>,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn order(mut self, order: f64) -> Self {
        self.order = Some(order);
        self
    }

    pub fn code(mut self, code: i64) -> Self {
        self.code = Some(code);
        self
    }

    pub fn skip(mut self) -> Self {
        self.skip = true;
        self
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// The order after applying `skip`.
    pub(crate) fn effective_order(&self) -> Option<f64> {
        if self.skip {
            Some(f64::NEG_INFINITY)
        } else {
            self.order
        }
    }
}
