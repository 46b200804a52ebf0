//! Permissive date parsing for loosely formatted text.
//!
//! This is the second stage of text resolution, used only after the strict
//! ISO 8601 parser has rejected a value. It mirrors what a lenient date
//! constructor accepts in practice: RFC 2822 and RFC 3339 timestamps,
//! slash-separated dates read month-first, spelled-out month names, and the
//! `Fri Mar 15 2024 08:00:00 GMT+0000 (...)` shape engines print for dates.
//!
//! Day-first forms such as `15/03/2024` are not accepted; `03/04/2024` is
//! always March 4. Calendar overflow (`02/30/2024`) is rejected, never
//! carried into the next month.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};

use crate::error::DateError;

/// Datetime layouts, tried in order.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S%.f", // US
    "%m/%d/%Y %H:%M",
    "%b %d, %Y %H:%M:%S", // Mar 15, 2024 08:00:00
    "%b %d, %Y %H:%M",
    "%b %d %Y %H:%M:%S",
    "%d %b %Y %H:%M:%S", // 15 Mar 2024 08:00:00
    "%d %b %Y %H:%M",
    "%a %b %d %Y %H:%M:%S", // Fri Mar 15 2024 08:00:00
    "%a, %d %b %Y %H:%M:%S",
];

/// Date-only layouts, tried in order.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y", // US: 03/15/2024
    "%m-%d-%Y", // 03-15-2024
    "%b %d, %Y", // Mar 15, 2024
    "%B %d, %Y", // March 15, 2024
    "%b %d %Y",
    "%B %d %Y",
    "%d %b %Y", // 15 Mar 2024
    "%d %B %Y", // 15 March 2024
    "%a %b %d %Y", // Fri Mar 15 2024
    "%a, %b %d, %Y",
    "%A, %B %d, %Y", // Friday, March 15, 2024
];

/// Parses loosely formatted date text.
///
/// Text without a zone is placed in `default_offset`.
///
/// # Errors
///
/// Returns [`DateError::Unrecognized`] when no layout matches or the matched
/// layout names a date that does not exist.
pub fn parse_generic(
    value: &str,
    default_offset: FixedOffset,
) -> Result<DateTime<FixedOffset>, DateError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DateError::unrecognized(value));
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt);
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(trimmed) {
        return Ok(dt);
    }

    let (body, zone) = split_zone_suffix(trimmed);
    let offset = zone.unwrap_or(default_offset);

    let naive = try_parse_datetime(body)
        .or_else(|| try_parse_date(body).map(|d| d.and_time(NaiveTime::MIN)))
        .ok_or_else(|| DateError::unrecognized(value))?;

    offset
        .from_local_datetime(&naive)
        .single()
        .ok_or_else(|| DateError::unrecognized(value))
}

/// Try to parse full datetime formats.
fn try_parse_datetime(value: &str) -> Option<NaiveDateTime> {
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
}

/// Try to parse date-only formats.
fn try_parse_date(value: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
}

/// Splits a trailing zone word (`GMT`, `UTC`, `Z`, `GMT+0530`, `-05:00`) and
/// an optional parenthesized zone name off the end of the text.
fn split_zone_suffix(value: &str) -> (&str, Option<FixedOffset>) {
    let value = strip_zone_comment(value);
    let Some((body, last)) = value.rsplit_once(' ') else {
        return (value, None);
    };
    match parse_zone_word(last) {
        Some(offset) => (body.trim_end(), Some(offset)),
        None => (value, None),
    }
}

fn strip_zone_comment(value: &str) -> &str {
    if value.ends_with(')')
        && let Some(open) = value.rfind('(')
    {
        return value[..open].trim_end();
    }
    value
}

fn parse_zone_word(word: &str) -> Option<FixedOffset> {
    let upper = word.to_ascii_uppercase();
    if matches!(upper.as_str(), "Z" | "GMT" | "UTC") {
        return FixedOffset::east_opt(0);
    }

    let signed = upper
        .strip_prefix("GMT")
        .or_else(|| upper.strip_prefix("UTC"))
        .unwrap_or(&upper);
    let (sign, digits) = match *signed.as_bytes().first()? {
        b'+' => (1, &signed[1..]),
        b'-' => (-1, &signed[1..]),
        _ => return None,
    };

    let digits: String = digits.chars().filter(|c| *c != ':').collect();
    if digits.len() != 4 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let hours: i32 = digits[..2].parse().ok()?;
    let minutes: i32 = digits[2..].parse().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    fn rfc3339(value: &str) -> String {
        parse_generic(value, utc()).unwrap().to_rfc3339()
    }

    #[test]
    fn test_us_slash_dates() {
        assert_eq!(rfc3339("03/15/2024"), "2024-03-15T00:00:00+00:00");
        assert_eq!(rfc3339("3/5/2024"), "2024-03-05T00:00:00+00:00");
        assert_eq!(rfc3339("03/15/2024 14:30"), "2024-03-15T14:30:00+00:00");
    }

    #[test]
    fn test_day_first_is_rejected() {
        assert!(parse_generic("15/03/2024", utc()).is_err());
    }

    #[test]
    fn test_month_names() {
        assert_eq!(rfc3339("Mar 15, 2024"), "2024-03-15T00:00:00+00:00");
        assert_eq!(rfc3339("March 15, 2024"), "2024-03-15T00:00:00+00:00");
        assert_eq!(rfc3339("15 March 2024"), "2024-03-15T00:00:00+00:00");
        assert_eq!(rfc3339("Friday, March 15, 2024"), "2024-03-15T00:00:00+00:00");
    }

    #[test]
    fn test_rfc_formats() {
        assert_eq!(
            rfc3339("Fri, 15 Mar 2024 08:00:00 +0000"),
            "2024-03-15T08:00:00+00:00"
        );
        assert_eq!(
            rfc3339("2024-03-15T08:00:00.250+02:00"),
            "2024-03-15T08:00:00.250+02:00"
        );
    }

    #[test]
    fn test_engine_to_string_shape() {
        assert_eq!(
            rfc3339("Fri Mar 15 2024 08:00:00 GMT+0100 (Central European Standard Time)"),
            "2024-03-15T08:00:00+01:00"
        );
        assert_eq!(
            rfc3339("Fri Mar 15 2024 08:00:00 GMT"),
            "2024-03-15T08:00:00+00:00"
        );
    }

    #[test]
    fn test_zone_words() {
        assert_eq!(rfc3339("2024/03/15 08:00 UTC"), "2024-03-15T08:00:00+00:00");
        assert_eq!(rfc3339("2024/03/15 08:00 -05:00"), "2024-03-15T08:00:00-05:00");
    }

    #[test]
    fn test_whitespace_is_trimmed() {
        assert_eq!(rfc3339("  2024-03-15  "), "2024-03-15T00:00:00+00:00");
    }

    #[test]
    fn test_default_offset_applies_to_naive_text() {
        let plus_nine = FixedOffset::east_opt(9 * 3600).unwrap();
        let dt = parse_generic("03/15/2024 09:00", plus_nine).unwrap();
        assert_eq!(dt.to_rfc3339(), "2024-03-15T09:00:00+09:00");
    }

    #[test]
    fn test_overflow_is_rejected() {
        assert!(parse_generic("2024-13-40", utc()).is_err());
        assert!(parse_generic("02/30/2024", utc()).is_err());
        assert!(parse_generic("2024-02-30 10:00", utc()).is_err());
    }

    #[test]
    fn test_garbage_is_unrecognized() {
        for value in ["", "   ", "not-a-date", "1710460800000", "yesterday"] {
            assert!(
                matches!(
                    parse_generic(value, utc()),
                    Err(DateError::Unrecognized { .. })
                ),
                "{value:?} should be unrecognized"
            );
        }
    }
}
