//! Strict ISO 8601 date/time parsing.
//!
//! This is the first stage of every text resolution. It accepts the ISO 8601
//! forms that record fields and browser pickers actually produce, and nothing
//! looser:
//!
//! - Calendar dates: `YYYY`, `YYYY-MM`, `YYYY-MM-DD`, `YYYYMMDD`
//! - Ordinal dates: `YYYY-DDD`, `YYYYDDD`
//! - Week dates: `YYYY-Www`, `YYYY-Www-D`, `YYYYWww`, `YYYYWwwD`
//! - Times after `T` or a single space: `hh`, `hh:mm`, `hhmm`, `hh:mm:ss`,
//!   `hhmmss`, with a `.` or `,` fraction on the last component
//! - Zones: `Z`, `±hh`, `±hhmm`, `±hh:mm`
//!
//! `24:00` is accepted as the end of the given day. Values without a zone are
//! placed in the caller's default offset by [`IsoDateTime::to_instant`].

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Weekday};
use thiserror::Error;

const NANOS_PER_SECOND: u64 = 1_000_000_000;
const SECONDS_PER_HOUR: u64 = 3_600;
const SECONDS_PER_MINUTE: u64 = 60;

/// Precision level of a parsed ISO 8601 value.
///
/// Precision is indicated by which components were present in the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DateTimePrecision {
    /// Year only: `YYYY`
    Year,
    /// Year and month: `YYYY-MM`
    Month,
    /// Full date, including ordinal and week forms
    Day,
    /// Date and hour: `YYYY-MM-DDThh`
    Hour,
    /// Date, hour, and minute: `YYYY-MM-DDThh:mm`
    Minute,
    /// Date, hour, minute, and second: `YYYY-MM-DDThh:mm:ss`
    Second,
    /// Seconds with a fraction: `YYYY-MM-DDThh:mm:ss.sss`
    FractionalSecond,
}

/// A successfully parsed ISO 8601 value.
///
/// Missing components are filled with their lowest value (January, the first
/// day, midnight), so the value always names a single wall-clock instant.
#[derive(Debug, Clone, PartialEq)]
pub struct IsoDateTime {
    /// Wall-clock date and time as written (after `24:00` roll-over).
    pub datetime: NaiveDateTime,
    /// Explicit zone, if the text carried one.
    pub offset: Option<FixedOffset>,
    /// Finest component present in the text.
    pub precision: DateTimePrecision,
    /// The original string representation.
    pub original: String,
}

impl IsoDateTime {
    /// Returns whether the text carried an explicit zero offset.
    pub fn is_utc(&self) -> bool {
        self.offset.is_some_and(|offset| offset.local_minus_utc() == 0)
    }

    /// Places the value on the timeline.
    ///
    /// The explicit zone wins; otherwise `default_offset` is used.
    pub fn to_instant(&self, default_offset: FixedOffset) -> Result<DateTime<FixedOffset>, IsoError> {
        let offset = self.offset.unwrap_or(default_offset);
        offset
            .from_local_datetime(&self.datetime)
            .single()
            .ok_or(IsoError::OutOfRange)
    }
}

/// Result of strict ISO 8601 parsing.
#[derive(Debug, Clone)]
pub enum IsoValidation {
    /// Valid ISO 8601 value
    Valid(IsoDateTime),
    /// Empty string
    Empty,
    /// Not ISO 8601, or names a date that does not exist
    Invalid(IsoError),
}

impl IsoValidation {
    /// Returns true if the validation result is valid.
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }

    /// Returns true if the value was empty.
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Returns the parsed value if valid.
    pub fn as_datetime(&self) -> Option<&IsoDateTime> {
        match self {
            Self::Valid(dt) => Some(dt),
            _ => None,
        }
    }

    /// Returns the error if invalid.
    pub fn as_error(&self) -> Option<&IsoError> {
        match self {
            Self::Invalid(err) => Some(err),
            _ => None,
        }
    }
}

/// Reasons a string is not a strict ISO 8601 date/time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IsoError {
    #[error("invalid year component")]
    InvalidYear,
    #[error("invalid month component (must be 01-12)")]
    InvalidMonth,
    #[error("invalid day component")]
    InvalidDay,
    #[error("invalid week component")]
    InvalidWeek,
    #[error("invalid hour component (must be 00-24)")]
    InvalidHour,
    #[error("invalid minute component (must be 00-59)")]
    InvalidMinute,
    #[error("invalid second component (must be 00-59)")]
    InvalidSecond,
    #[error("invalid timezone format")]
    InvalidTimezone,
    #[error("date/time is outside the supported range")]
    OutOfRange,
    #[error("malformed ISO 8601 value: {0}")]
    Malformed(String),
}

/// Parses a string as strict ISO 8601.
///
/// The input is not trimmed; surrounding whitespace makes it invalid here and
/// leaves it to the permissive parser.
///
/// # Examples
///
/// ```
/// use farmdate_core::iso::{parse_iso8601, DateTimePrecision};
///
/// let result = parse_iso8601("2024-03-15T08:30:00Z");
/// let parsed = result.as_datetime().unwrap();
/// assert!(parsed.is_utc());
/// assert_eq!(parsed.precision, DateTimePrecision::Second);
///
/// assert!(!parse_iso8601("2024-13-40").is_valid());
/// assert!(parse_iso8601("").is_empty());
/// ```
pub fn parse_iso8601(value: &str) -> IsoValidation {
    if value.is_empty() {
        return IsoValidation::Empty;
    }

    match parse_datetime(value) {
        Ok(dt) => IsoValidation::Valid(dt),
        Err(err) => IsoValidation::Invalid(err),
    }
}

fn parse_datetime(value: &str) -> Result<IsoDateTime, IsoError> {
    // Every slice below is byte-indexed.
    if !value.is_ascii() {
        return Err(malformed(value));
    }

    let mut parts = value.split(['T', ' ']);
    let date_part = parts.next().unwrap_or_default();
    let time_part = parts.next();
    if parts.next().is_some() {
        return Err(malformed(value));
    }

    let (date, date_precision) = parse_date_part(date_part)?;

    let Some(time_str) = time_part else {
        return Ok(IsoDateTime {
            datetime: date.and_time(NaiveTime::MIN),
            offset: None,
            precision: date_precision,
            original: value.to_string(),
        });
    };

    let (clock_str, tz_str) = extract_timezone(time_str);
    let offset = tz_str.map(parse_timezone_offset).transpose()?;
    let clock = parse_time_part(clock_str)?;

    let date = if clock.rolls_over {
        date.succ_opt().ok_or(IsoError::OutOfRange)?
    } else {
        date
    };

    Ok(IsoDateTime {
        datetime: date.and_time(clock.time),
        offset,
        precision: clock.precision,
        original: value.to_string(),
    })
}

/// Parses the date portion: a four-digit year followed by an optional
/// calendar, ordinal, or week designation.
fn parse_date_part(date_str: &str) -> Result<(NaiveDate, DateTimePrecision), IsoError> {
    let year_str = date_str.get(..4).filter(|s| is_digits(s)).ok_or(IsoError::InvalidYear)?;
    let year: i32 = year_str.parse().map_err(|_| IsoError::InvalidYear)?;

    let rest = &date_str[4..];
    if rest.is_empty() {
        let date = NaiveDate::from_ymd_opt(year, 1, 1).ok_or(IsoError::InvalidYear)?;
        return Ok((date, DateTimePrecision::Year));
    }

    let (rest, extended) = match rest.strip_prefix('-') {
        Some(stripped) => (stripped, true),
        None => (rest, false),
    };

    if let Some(week_str) = rest.strip_prefix('W') {
        return parse_week_date(year, week_str).map(|date| (date, DateTimePrecision::Day));
    }

    match rest.len() {
        // MM (only in extended form; YYYYMM is ambiguous with ordinals)
        2 if extended => {
            let month = parse_month(rest)?;
            let date = NaiveDate::from_ymd_opt(year, month, 1).ok_or(IsoError::InvalidMonth)?;
            Ok((date, DateTimePrecision::Month))
        }
        // DDD
        3 => {
            let ordinal: u32 = parse_digits(rest).ok_or(IsoError::InvalidDay)?;
            let date = NaiveDate::from_yo_opt(year, ordinal).ok_or(IsoError::InvalidDay)?;
            Ok((date, DateTimePrecision::Day))
        }
        // MMDD (basic)
        4 if !extended => calendar_date(year, &rest[..2], &rest[2..]),
        // MM-DD
        5 if extended && rest.as_bytes()[2] == b'-' => {
            calendar_date(year, &rest[..2], &rest[3..])
        }
        _ => Err(malformed(date_str)),
    }
}

fn calendar_date(
    year: i32,
    month_str: &str,
    day_str: &str,
) -> Result<(NaiveDate, DateTimePrecision), IsoError> {
    let month = parse_month(month_str)?;
    let day: u32 = parse_digits(day_str).ok_or(IsoError::InvalidDay)?;
    let date = NaiveDate::from_ymd_opt(year, month, day).ok_or(IsoError::InvalidDay)?;
    Ok((date, DateTimePrecision::Day))
}

fn parse_month(month_str: &str) -> Result<u32, IsoError> {
    let month: u32 = parse_digits(month_str).ok_or(IsoError::InvalidMonth)?;
    if (1..=12).contains(&month) {
        Ok(month)
    } else {
        Err(IsoError::InvalidMonth)
    }
}

/// Parses `ww`, `ww-D`, or `wwD` following the `W` designator.
fn parse_week_date(year: i32, week_str: &str) -> Result<NaiveDate, IsoError> {
    let week: u32 = week_str
        .get(..2)
        .and_then(parse_digits)
        .ok_or(IsoError::InvalidWeek)?;

    let day_str = &week_str[2..];
    let day_str = day_str.strip_prefix('-').unwrap_or(day_str);
    let day: u8 = match day_str {
        "" => 1,
        d if d.len() == 1 => parse_digits(d).ok_or(IsoError::InvalidDay)?,
        _ => return Err(malformed(week_str)),
    };
    if !(1..=7).contains(&day) {
        return Err(IsoError::InvalidDay);
    }

    let weekday = Weekday::try_from(day - 1).map_err(|_| IsoError::InvalidDay)?;
    NaiveDate::from_isoywd_opt(year, week, weekday).ok_or(IsoError::InvalidWeek)
}

struct ClockTime {
    time: NaiveTime,
    precision: DateTimePrecision,
    rolls_over: bool,
}

struct TimeComponent<'a> {
    whole: u64,
    fraction: Option<&'a str>,
}

/// Parses the time-of-day portion (zone already removed).
fn parse_time_part(time_str: &str) -> Result<ClockTime, IsoError> {
    let components = split_time_components(time_str)?;

    let hour = components[0].whole;
    let minute = components.get(1).map_or(0, |c| c.whole);
    let second = components.get(2).map_or(0, |c| c.whole);

    if hour > 24 {
        return Err(IsoError::InvalidHour);
    }
    if minute > 59 {
        return Err(IsoError::InvalidMinute);
    }
    if second > 59 {
        return Err(IsoError::InvalidSecond);
    }

    // A fraction is only allowed on the last component and scales that unit.
    let last = components.len() - 1;
    let unit_seconds = [SECONDS_PER_HOUR, SECONDS_PER_MINUTE, 1][last];
    let fraction_nanos = components[last]
        .fraction
        .map_or(0, fraction_to_nanos)
        * unit_seconds;

    let total_nanos = (hour * SECONDS_PER_HOUR + minute * SECONDS_PER_MINUTE + second)
        * NANOS_PER_SECOND
        + fraction_nanos;

    let precision = match (components.len(), components[last].fraction.is_some()) {
        (1, _) => DateTimePrecision::Hour,
        (2, _) => DateTimePrecision::Minute,
        (_, false) => DateTimePrecision::Second,
        (_, true) => DateTimePrecision::FractionalSecond,
    };

    if hour == 24 {
        if total_nanos != 24 * SECONDS_PER_HOUR * NANOS_PER_SECOND {
            return Err(IsoError::InvalidHour);
        }
        return Ok(ClockTime {
            time: NaiveTime::MIN,
            precision,
            rolls_over: true,
        });
    }

    let seconds = u32::try_from(total_nanos / NANOS_PER_SECOND).map_err(|_| IsoError::InvalidHour)?;
    let nanos = u32::try_from(total_nanos % NANOS_PER_SECOND).map_err(|_| IsoError::InvalidSecond)?;
    let time = NaiveTime::from_num_seconds_from_midnight_opt(seconds, nanos)
        .ok_or(IsoError::InvalidHour)?;

    Ok(ClockTime {
        time,
        precision,
        rolls_over: false,
    })
}

/// Splits `hh[:mm[:ss]]` (colons optional) into at most three two-digit
/// components.
fn split_time_components(time_str: &str) -> Result<Vec<TimeComponent<'_>>, IsoError> {
    let mut components: Vec<TimeComponent<'_>> = Vec::with_capacity(3);
    let mut rest = time_str;

    while !rest.is_empty() {
        if components.len() == 3 || components.last().is_some_and(|c| c.fraction.is_some()) {
            return Err(malformed(time_str));
        }
        if !components.is_empty() {
            rest = rest.strip_prefix(':').unwrap_or(rest);
        }

        let whole: u64 = rest
            .get(..2)
            .and_then(parse_digits)
            .ok_or_else(|| malformed(time_str))?;
        rest = &rest[2..];

        let mut fraction = None;
        if let Some(after) = rest.strip_prefix(['.', ',']) {
            let len = after.bytes().take_while(u8::is_ascii_digit).count();
            fraction = Some(&after[..len]);
            rest = &after[len..];
        }

        components.push(TimeComponent { whole, fraction });
    }

    if components.is_empty() {
        return Err(malformed(time_str));
    }
    Ok(components)
}

/// Converts fraction digits to billionths of the unit (truncating past nine
/// digits).
fn fraction_to_nanos(digits: &str) -> u64 {
    if digits.is_empty() {
        return 0;
    }
    let truncated = &digits[..digits.len().min(9)];
    format!("{truncated:0<9}").parse().unwrap_or(0)
}

/// Extracts the zone designator from the end of a time string.
fn extract_timezone(time_str: &str) -> (&str, Option<&str>) {
    match time_str.find(['Z', 'z', '+', '-']) {
        Some(pos) => (&time_str[..pos], Some(&time_str[pos..])),
        None => (time_str, None),
    }
}

/// Parses `Z`, `±hh`, `±hhmm`, or `±hh:mm`.
fn parse_timezone_offset(tz_str: &str) -> Result<FixedOffset, IsoError> {
    if tz_str.eq_ignore_ascii_case("z") {
        return FixedOffset::east_opt(0).ok_or(IsoError::InvalidTimezone);
    }

    let sign = match tz_str.as_bytes().first() {
        Some(b'+') => 1,
        Some(b'-') => -1,
        _ => return Err(IsoError::InvalidTimezone),
    };

    let body = &tz_str[1..];
    let (hours_str, minutes_str) = match body.len() {
        2 => (body, "00"),
        4 => (&body[..2], &body[2..]),
        5 if body.as_bytes()[2] == b':' => (&body[..2], &body[3..]),
        _ => return Err(IsoError::InvalidTimezone),
    };

    let hours: i32 = parse_digits(hours_str).ok_or(IsoError::InvalidTimezone)?;
    let minutes: i32 = parse_digits(minutes_str).ok_or(IsoError::InvalidTimezone)?;
    if !(0..=23).contains(&hours) || !(0..=59).contains(&minutes) {
        return Err(IsoError::InvalidTimezone);
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or(IsoError::InvalidTimezone)
}

fn is_digits(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}

fn parse_digits<T: std::str::FromStr>(value: &str) -> Option<T> {
    if is_digits(value) {
        value.parse().ok()
    } else {
        None
    }
}

fn malformed(value: &str) -> IsoError {
    IsoError::Malformed(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    fn valid(value: &str) -> IsoDateTime {
        match parse_iso8601(value) {
            IsoValidation::Valid(dt) => dt,
            other => panic!("expected {value:?} to parse, got {other:?}"),
        }
    }

    fn error(value: &str) -> IsoError {
        match parse_iso8601(value) {
            IsoValidation::Invalid(err) => err,
            other => panic!("expected {value:?} to be rejected, got {other:?}"),
        }
    }

    #[test]
    fn test_complete_datetime() {
        let dt = valid("2003-12-15T13:14:17");
        assert_eq!(dt.datetime.year(), 2003);
        assert_eq!(dt.datetime.month(), 12);
        assert_eq!(dt.datetime.day(), 15);
        assert_eq!(dt.datetime.hour(), 13);
        assert_eq!(dt.datetime.minute(), 14);
        assert_eq!(dt.datetime.second(), 17);
        assert_eq!(dt.precision, DateTimePrecision::Second);
        assert!(dt.offset.is_none());
    }

    #[test]
    fn test_truncated_dates() {
        assert_eq!(valid("2003").precision, DateTimePrecision::Year);
        assert_eq!(valid("2003-12").precision, DateTimePrecision::Month);
        assert_eq!(valid("2003-12-15").precision, DateTimePrecision::Day);

        let year_only = valid("2003");
        assert_eq!(
            year_only.datetime.date(),
            NaiveDate::from_ymd_opt(2003, 1, 1).unwrap()
        );
    }

    #[test]
    fn test_basic_format_date() {
        let dt = valid("20240315");
        assert_eq!(
            dt.datetime.date(),
            NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
        );
    }

    #[test]
    fn test_ordinal_and_week_dates() {
        assert_eq!(
            valid("2024-075").datetime.date(),
            NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
        );
        assert_eq!(
            valid("2024-W11-5").datetime.date(),
            NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
        );
        assert_eq!(
            valid("2024W11").datetime.date(),
            NaiveDate::from_ymd_opt(2024, 3, 11).unwrap()
        );
        assert_eq!(error("2024-W11-8"), IsoError::InvalidDay);
        assert_eq!(error("2023-W53"), IsoError::InvalidWeek);
        assert_eq!(error("2023-366"), IsoError::InvalidDay);
    }

    #[test]
    fn test_fractional_seconds() {
        let dt = valid("2003-12-15T13:14:17.123");
        assert_eq!(dt.datetime.nanosecond(), 123_000_000);
        assert_eq!(dt.precision, DateTimePrecision::FractionalSecond);

        let comma = valid("2003-12-15T13:14:17,5");
        assert_eq!(comma.datetime.nanosecond(), 500_000_000);
    }

    #[test]
    fn test_fraction_on_minutes_scales_unit() {
        let dt = valid("2024-03-15T10:30.5");
        assert_eq!(dt.datetime.minute(), 30);
        assert_eq!(dt.datetime.second(), 30);
        assert_eq!(dt.precision, DateTimePrecision::Minute);
    }

    #[test]
    fn test_basic_time_and_space_delimiter() {
        let dt = valid("2024-03-15 083005");
        assert_eq!(
            (dt.datetime.hour(), dt.datetime.minute(), dt.datetime.second()),
            (8, 30, 5)
        );
    }

    #[test]
    fn test_timezones() {
        assert!(valid("2003-12-15T13:14:17Z").is_utc());

        let plus = valid("2003-12-15T13:14:17+05:30");
        assert_eq!(plus.offset.unwrap().local_minus_utc(), 330 * 60);

        let minus = valid("2003-12-15T13:14-0800");
        assert_eq!(minus.offset.unwrap().local_minus_utc(), -480 * 60);

        let hours_only = valid("2003-12-15T13+02");
        assert_eq!(hours_only.offset.unwrap().local_minus_utc(), 7200);

        assert_eq!(error("2003-12-15T13:14:17+25:00"), IsoError::InvalidTimezone);
        assert_eq!(error("2003-12-15T13:14:17+5"), IsoError::InvalidTimezone);
    }

    #[test]
    fn test_end_of_day_rolls_over() {
        let dt = valid("2024-02-29T24:00");
        assert_eq!(
            dt.datetime,
            NaiveDate::from_ymd_opt(2024, 3, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
        );
        assert_eq!(error("2024-02-29T24:00:01"), IsoError::InvalidHour);
    }

    #[test]
    fn test_invalid_components() {
        assert_eq!(error("2024-13-40"), IsoError::InvalidMonth);
        assert_eq!(error("2023-02-29"), IsoError::InvalidDay);
        assert_eq!(error("2024-04-31"), IsoError::InvalidDay);
        assert_eq!(error("2024-03-15T25:00"), IsoError::InvalidHour);
        assert_eq!(error("2024-03-15T10:60"), IsoError::InvalidMinute);
        assert_eq!(error("2024-03-15T10:30:60"), IsoError::InvalidSecond);
        assert_eq!(error("not-a-date"), IsoError::InvalidYear);
    }

    #[test]
    fn test_malformed_shapes() {
        assert!(matches!(error("2024-03-15T"), IsoError::Malformed(_)));
        assert!(matches!(error("2024-03-15T10:"), IsoError::Malformed(_)));
        assert!(matches!(error("2024-03-15T10:30:00:00"), IsoError::Malformed(_)));
        assert!(matches!(error("2024-03-15T10.5:30"), IsoError::Malformed(_)));
        assert!(matches!(error("2024-03-15 10:00 extra"), IsoError::Malformed(_)));
        assert!(matches!(error("202403"), IsoError::Malformed(_)));
        assert!(matches!(error("03/15/2024"), IsoError::InvalidYear));
    }

    #[test]
    fn test_surrounding_whitespace_is_not_strict() {
        assert!(!parse_iso8601(" 2024-03-15").is_valid());
        assert!(parse_iso8601("").is_empty());
    }

    #[test]
    fn test_to_instant_uses_default_offset_only_when_missing() {
        let plus_two = FixedOffset::east_opt(7200).unwrap();

        let naive = valid("2024-03-15T08:00");
        assert_eq!(
            naive.to_instant(plus_two).unwrap().to_rfc3339(),
            "2024-03-15T08:00:00+02:00"
        );

        let zoned = valid("2024-03-15T08:00Z");
        assert_eq!(
            zoned.to_instant(plus_two).unwrap().to_rfc3339(),
            "2024-03-15T08:00:00+00:00"
        );
    }
}
