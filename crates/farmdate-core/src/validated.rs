//! The validated date type.

use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DateError;
use crate::pattern::{PatternError, format_datetime};

/// Outer bound on timestamp magnitude (±100,000,000 days).
///
/// chrono's own range is narrower (roughly -8.33e15 to 8.21e15 ms, years
/// ±262,000), so timestamps between that range and this bound are
/// [`DateError::OutOfRange`] as well.
pub const MAX_EPOCH_MILLIS: f64 = 8.64e15;

/// A date confirmed to represent a real calendar instant.
///
/// The wrapped value keeps the offset it was parsed with; equality and
/// ordering compare instants, so `08:00+02:00` equals `06:00Z`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidatedDate(DateTime<FixedOffset>);

impl ValidatedDate {
    pub fn new(instant: DateTime<FixedOffset>) -> Self {
        Self(instant)
    }

    /// Builds a date from epoch milliseconds, viewed in `offset`.
    ///
    /// Fractional milliseconds are truncated toward zero.
    ///
    /// # Errors
    ///
    /// [`DateError::NonFinite`] for `NaN`/infinite input and
    /// [`DateError::OutOfRange`] beyond ±[`MAX_EPOCH_MILLIS`] or outside
    /// what chrono can represent.
    pub fn from_epoch_millis(millis: f64, offset: FixedOffset) -> Result<Self, DateError> {
        if !millis.is_finite() {
            return Err(DateError::NonFinite);
        }
        let truncated = millis.trunc();
        if truncated.abs() > MAX_EPOCH_MILLIS {
            return Err(DateError::OutOfRange { millis });
        }

        #[allow(clippy::cast_possible_truncation)]
        let whole = truncated as i64;
        DateTime::from_timestamp_millis(whole)
            .map(|utc| Self(utc.with_timezone(&offset)))
            .ok_or(DateError::OutOfRange { millis })
    }

    /// The instant in the offset it was parsed or converted with.
    pub fn instant(&self) -> DateTime<FixedOffset> {
        self.0
    }

    pub fn to_utc(&self) -> DateTime<Utc> {
        self.0.with_timezone(&Utc)
    }

    /// The same instant viewed in another offset.
    #[must_use]
    pub fn with_offset(&self, offset: FixedOffset) -> Self {
        Self(self.0.with_timezone(&offset))
    }

    pub fn offset(&self) -> FixedOffset {
        *self.0.offset()
    }

    /// Calendar date in this value's own offset.
    pub fn date(&self) -> NaiveDate {
        self.0.date_naive()
    }

    /// Wall-clock date and time in this value's own offset.
    pub fn naive_local(&self) -> NaiveDateTime {
        self.0.naive_local()
    }

    pub fn epoch_millis(&self) -> i64 {
        self.0.timestamp_millis()
    }

    /// Whole days from `base` to `self`, truncated toward zero.
    ///
    /// Negative when `self` precedes `base`. With fixed offsets every day is
    /// 24 hours long, so this equals the count of full calendar days elapsed.
    pub fn days_since(&self, base: &ValidatedDate) -> i64 {
        (self.0 - base.0).num_days()
    }

    /// Renders this value with a format pattern, in its own offset.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError`] if the pattern does not compile.
    pub fn format(&self, pattern: &str) -> Result<String, PatternError> {
        format_datetime(&self.0, pattern)
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for ValidatedDate {
    fn from(value: DateTime<Tz>) -> Self {
        Self(value.fixed_offset())
    }
}

impl From<ValidatedDate> for DateTime<FixedOffset> {
    fn from(value: ValidatedDate) -> Self {
        value.0
    }
}

impl fmt::Display for ValidatedDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_rfc3339_opts(SecondsFormat::AutoSi, true))
    }
}
