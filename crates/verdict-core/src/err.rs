//! Error descriptors carried by failures.
//!
//! An [`ErrInfo`] is plain data: a `type` discriminator plus optional
//! diagnostic hints. The engine never acts on `retry`, `notify` or `fatal`;
//! they are advisory flags for the caller's own policy layer.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::options::Options;
use crate::outcome::{failure_with, Outcome};

/// Type used when nothing better can be derived from the input.
pub const UNKNOWN_TYPE: &str = "Unknown";

/// Keys that map to typed fields and never live in [`ErrInfo::extra`].
const RESERVED_KEYS: [&str; 6] = ["type", "message", "level", "retry", "notify", "fatal"];

/// Severity of an error. Lower is more severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum ErrLevel {
    Emerg = 0,
    Alert = 1,
    Crit = 2,
    Error = 3,
    Warning = 4,
    Notice = 5,
    Info = 6,
    Debug = 7,
}

impl ErrLevel {
    /// Returns true if `self` is strictly more severe than `other`.
    pub fn is_more_severe_than(self, other: ErrLevel) -> bool {
        (self as u8) < (other as u8)
    }
}

impl From<ErrLevel> for u8 {
    fn from(level: ErrLevel) -> Self {
        level as u8
    }
}

impl TryFrom<u8> for ErrLevel {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, String> {
        Ok(match value {
            0 => ErrLevel::Emerg,
            1 => ErrLevel::Alert,
            2 => ErrLevel::Crit,
            3 => ErrLevel::Error,
            4 => ErrLevel::Warning,
            5 => ErrLevel::Notice,
            6 => ErrLevel::Info,
            7 => ErrLevel::Debug,
            other => return Err(format!("invalid error level {other}")),
        })
    }
}

/// Structured failure payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrInfo {
    #[serde(rename = "type")]
    kind: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<ErrLevel>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notify: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fatal: Option<bool>,

    /// Caller-defined fields attached to this error.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ErrInfo {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: None,
            level: None,
            retry: None,
            notify: None,
            fatal: None,
            extra: Map::new(),
        }
    }

    /// The `type` discriminator.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn is(&self, kind: &str) -> bool {
        self.kind == kind
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_level(mut self, level: ErrLevel) -> Self {
        self.level = Some(level);
        self
    }

    pub fn with_retry(mut self, retry: bool) -> Self {
        self.retry = Some(retry);
        self
    }

    pub fn with_notify(mut self, notify: bool) -> Self {
        self.notify = Some(notify);
        self
    }

    pub fn with_fatal(mut self, fatal: bool) -> Self {
        self.fatal = Some(fatal);
        self
    }

    /// Attach an extra field. Reserved keys (`type` and the typed hints) are
    /// ignored; use the dedicated setters for those.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let key = key.into();
        if !RESERVED_KEYS.contains(&key.as_str()) {
            self.extra.insert(key, value.into());
        }
        self
    }

    pub fn field(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }

    /// Copy of this descriptor with `prefix` prepended to its type.
    pub fn namespaced(&self, prefix: &str) -> Self {
        let mut info = self.clone();
        info.kind = format!("{prefix}{}", self.kind);
        info
    }

    /// Replaces the type. Only the outer constructors may do this.
    pub(crate) fn retyped(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }

    /// Interprets an untyped value as a descriptor.
    ///
    /// A string becomes the type. An object needs a string `type` field;
    /// known hint fields are lifted when they carry the right JSON type and
    /// everything else lands in [`ErrInfo::extra`].
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::String(kind) => Some(Self::new(kind)),
            Value::Object(mut map) => match map.remove("type") {
                Some(Value::String(kind)) => Some(Self::from_fields(kind, map)),
                _ => None,
            },
            _ => None,
        }
    }

    fn from_fields(kind: String, mut map: Map<String, Value>) -> Self {
        let mut info = Self::new(kind);

        if let Some(Value::String(message)) = map.get("message").cloned() {
            map.remove("message");
            info.message = Some(message);
        }

        let level = map
            .get("level")
            .and_then(Value::as_u64)
            .and_then(|n| u8::try_from(n).ok())
            .and_then(|n| ErrLevel::try_from(n).ok());
        if level.is_some() {
            map.remove("level");
            info.level = level;
        }

        for key in ["retry", "notify", "fatal"] {
            if let Some(flag) = map.get(key).and_then(Value::as_bool) {
                map.remove(key);
                match key {
                    "retry" => info.retry = Some(flag),
                    "notify" => info.notify = Some(flag),
                    _ => info.fatal = Some(flag),
                }
            }
        }

        info.extra = map;
        info
    }
}

/// Empty-typed descriptor, handy as a template for [`fail`](crate::fail).
impl Default for ErrInfo {
    fn default() -> Self {
        Self::new("")
    }
}

/// Returns true if `value` can be read as an error descriptor.
///
/// True exactly when [`ErrInfo::from_value`] would succeed, without
/// consuming the value.
pub fn is_error_like(value: &Value) -> bool {
    match value {
        Value::String(_) => true,
        Value::Object(map) => matches!(map.get("type"), Some(Value::String(_))),
        _ => false,
    }
}

/// Anything a failure can be built from.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorLike {
    /// A bare type string.
    Type(String),
    /// A well-formed descriptor.
    Descriptor(ErrInfo),
    /// Untyped input, interpreted on a best-effort basis.
    Value(Value),
}

impl ErrorLike {
    /// Builds a descriptor, never failing.
    ///
    /// Input without a recognizable type gets one derived from `message`,
    /// falling back to [`UNKNOWN_TYPE`].
    pub fn into_descriptor(self, message: Option<&str>) -> ErrInfo {
        match self {
            ErrorLike::Type(kind) => ErrInfo::new(kind),
            ErrorLike::Descriptor(info) => info,
            ErrorLike::Value(Value::String(kind)) => ErrInfo::new(kind),
            ErrorLike::Value(Value::Object(mut map)) => match map.remove("type") {
                Some(Value::String(kind)) => ErrInfo::from_fields(kind, map),
                _ => ErrInfo::from_fields(derive_kind("", message), map),
            },
            ErrorLike::Value(_) => ErrInfo::new(derive_kind("", message)),
        }
    }
}

/// Type label used for a failure's message: the descriptor type, or the
/// explicit message, or [`UNKNOWN_TYPE`].
pub(crate) fn derive_kind(kind: &str, message: Option<&str>) -> String {
    if !kind.is_empty() {
        return kind.to_string();
    }
    match message {
        Some(message) if !message.is_empty() => message.to_string(),
        _ => UNKNOWN_TYPE.to_string(),
    }
}

impl From<&str> for ErrorLike {
    fn from(kind: &str) -> Self {
        ErrorLike::Type(kind.to_string())
    }
}

impl From<String> for ErrorLike {
    fn from(kind: String) -> Self {
        ErrorLike::Type(kind)
    }
}

impl From<ErrInfo> for ErrorLike {
    fn from(info: ErrInfo) -> Self {
        ErrorLike::Descriptor(info)
    }
}

impl From<Value> for ErrorLike {
    fn from(value: Value) -> Self {
        ErrorLike::Value(value)
    }
}

/// A named family of error types sharing a prefix.
///
/// `ErrGroup::new("Db").kind("Timeout")` is `"DbTimeout"`, the same string
/// that `on_err_named("Db", ..)` produces for a `"Timeout"` error.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ErrGroup {
    name: String,
}

impl ErrGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Full type string of a group member.
    pub fn kind(&self, member: &str) -> String {
        format!("{}{member}", self.name)
    }

    /// Descriptor for a group member.
    pub fn err(&self, member: &str) -> ErrInfo {
        ErrInfo::new(self.kind(member))
    }

    /// Failure for a group member.
    pub fn fail<T>(&self, member: &str, options: Options) -> Outcome<T> {
        failure_with(self.err(member), options)
    }

    pub fn contains(&self, info: &ErrInfo) -> bool {
        info.kind().starts_with(&self.name)
    }

    /// Member name of `info` within this group, if it belongs to it.
    pub fn member<'a>(&self, info: &'a ErrInfo) -> Option<&'a str> {
        info.kind().strip_prefix(self.name.as_str())
    }
}
