//! Loosely typed date input.
//!
//! Farm records arrive with dates in whatever shape the source produced:
//! a missing field, a timestamp already parsed upstream, a string of any
//! format, or a numeric epoch offset. [`DateInput`] tags each shape so the
//! resolver can dispatch on it without guessing.

use std::borrow::Cow;
use std::fmt;

use chrono::{DateTime, FixedOffset, SecondsFormat, TimeZone};
use serde_json::Value;

use crate::validated::ValidatedDate;

/// A date-like value of unknown quality.
#[derive(Debug, Clone, PartialEq)]
pub enum DateInput<'a> {
    /// Absent value (`null` or a missing field).
    Nullish,
    /// An already-constructed instant.
    Instant(DateTime<FixedOffset>),
    /// Date text in any format.
    Text(Cow<'a, str>),
    /// Milliseconds since the Unix epoch.
    Numeric(f64),
    /// A value with no date interpretation, named by its kind.
    Unsupported(&'static str),
}

impl DateInput<'_> {
    pub fn is_nullish(&self) -> bool {
        matches!(self, Self::Nullish)
    }

    /// Nullish, empty text, zero, or `NaN`.
    pub fn is_falsy(&self) -> bool {
        match self {
            Self::Nullish => true,
            Self::Text(text) => text.is_empty(),
            Self::Numeric(millis) => *millis == 0.0 || millis.is_nan(),
            Self::Instant(_) | Self::Unsupported(_) => false,
        }
    }

    /// Short name of the input shape, for log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Nullish => "null",
            Self::Instant(_) => "instant",
            Self::Text(_) => "text",
            Self::Numeric(_) => "number",
            Self::Unsupported(kind) => kind,
        }
    }

    pub fn into_owned(self) -> DateInput<'static> {
        match self {
            Self::Nullish => DateInput::Nullish,
            Self::Instant(dt) => DateInput::Instant(dt),
            Self::Text(text) => DateInput::Text(Cow::Owned(text.into_owned())),
            Self::Numeric(millis) => DateInput::Numeric(millis),
            Self::Unsupported(kind) => DateInput::Unsupported(kind),
        }
    }
}

impl fmt::Display for DateInput<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nullish => f.write_str("null"),
            Self::Instant(dt) => f.write_str(&dt.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            Self::Text(text) => write!(f, "{text:?}"),
            Self::Numeric(millis) => write!(f, "{millis}"),
            Self::Unsupported(kind) => write!(f, "<{kind}>"),
        }
    }
}

impl<'a> From<&'a str> for DateInput<'a> {
    fn from(value: &'a str) -> Self {
        Self::Text(Cow::Borrowed(value))
    }
}

impl<'a> From<&'a String> for DateInput<'a> {
    fn from(value: &'a String) -> Self {
        Self::Text(Cow::Borrowed(value.as_str()))
    }
}

impl From<String> for DateInput<'static> {
    fn from(value: String) -> Self {
        Self::Text(Cow::Owned(value))
    }
}

impl<'a> From<Cow<'a, str>> for DateInput<'a> {
    fn from(value: Cow<'a, str>) -> Self {
        Self::Text(value)
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for DateInput<'static> {
    fn from(value: DateTime<Tz>) -> Self {
        Self::Instant(value.fixed_offset())
    }
}

impl From<ValidatedDate> for DateInput<'static> {
    fn from(value: ValidatedDate) -> Self {
        Self::Instant(value.instant())
    }
}

impl From<&ValidatedDate> for DateInput<'static> {
    fn from(value: &ValidatedDate) -> Self {
        Self::Instant(value.instant())
    }
}

impl From<i64> for DateInput<'static> {
    #[allow(clippy::cast_precision_loss)]
    fn from(value: i64) -> Self {
        Self::Numeric(value as f64)
    }
}

impl From<i32> for DateInput<'static> {
    fn from(value: i32) -> Self {
        Self::Numeric(f64::from(value))
    }
}

impl From<f64> for DateInput<'static> {
    fn from(value: f64) -> Self {
        Self::Numeric(value)
    }
}

impl<'a, T> From<Option<T>> for DateInput<'a>
where
    T: Into<DateInput<'a>>,
{
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Nullish, Into::into)
    }
}

impl<'a> From<&'a Value> for DateInput<'a> {
    fn from(value: &'a Value) -> Self {
        match value {
            Value::Null => Self::Nullish,
            Value::Bool(_) => Self::Unsupported("boolean"),
            Value::Number(number) => Self::Numeric(number.as_f64().unwrap_or(f64::NAN)),
            Value::String(text) => Self::Text(Cow::Borrowed(text.as_str())),
            Value::Array(_) => Self::Unsupported("array"),
            Value::Object(_) => Self::Unsupported("object"),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_falsy_inputs() {
        assert!(DateInput::Nullish.is_falsy());
        assert!(DateInput::from("").is_falsy());
        assert!(DateInput::from(0).is_falsy());
        assert!(DateInput::from(f64::NAN).is_falsy());

        assert!(!DateInput::from(" ").is_falsy());
        assert!(!DateInput::from(1).is_falsy());
        assert!(!DateInput::Unsupported("boolean").is_falsy());
        assert!(!DateInput::from(DateTime::<Utc>::UNIX_EPOCH).is_falsy());
    }

    #[test]
    fn test_option_maps_none_to_nullish() {
        assert!(DateInput::from(None::<&str>).is_nullish());
        assert_eq!(DateInput::from(Some("2024-03-15")), DateInput::from("2024-03-15"));
    }

    #[test]
    fn test_json_values() {
        assert!(DateInput::from(&json!(null)).is_nullish());
        assert_eq!(DateInput::from(&json!(true)).kind(), "boolean");
        assert_eq!(DateInput::from(&json!([1])).kind(), "array");
        assert_eq!(DateInput::from(&json!({"d": 1})).kind(), "object");
        assert_eq!(
            DateInput::from(&json!(1_710_460_800_000_i64)),
            DateInput::Numeric(1_710_460_800_000.0)
        );
        assert_eq!(
            DateInput::from(&json!("2024-03-15")),
            DateInput::Text(Cow::Borrowed("2024-03-15"))
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(DateInput::Nullish.to_string(), "null");
        assert_eq!(DateInput::from("x\"y").to_string(), r#""x\"y""#);
        assert_eq!(DateInput::from(1.5).to_string(), "1.5");
        assert_eq!(DateInput::Unsupported("array").to_string(), "<array>");
        assert_eq!(
            DateInput::from(DateTime::<Utc>::UNIX_EPOCH).to_string(),
            "1970-01-01T00:00:00Z"
        );
    }

    #[test]
    fn test_into_owned_keeps_value() {
        let text = String::from("03/15/2024");
        let owned = DateInput::from(&text).into_owned();
        drop(text);
        assert_eq!(owned, DateInput::Text(Cow::Owned("03/15/2024".to_string())));
    }
}
