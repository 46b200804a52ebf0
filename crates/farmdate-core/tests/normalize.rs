//! End-to-end tests for the safe date operations.

use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use farmdate_core::{
    DateInput, DateNormalizer, FixedClock, NormalizerConfig, ValidatedDate, is_valid_date,
    safe_difference_in_days, safe_format, safe_format_or, safe_parse_date,
};
use proptest::prelude::*;
use serde_json::json;

const LOSSLESS: &str = "yyyy-MM-dd'T'HH:mm:ss.SSSxxx";

// Year 1 through year 9999, skipping the falsy zero.
const MIN_MILLIS: i64 = -62_135_596_800_000;
const MAX_MILLIS: i64 = 253_402_300_799_999;

// =========================================================================
// Documented scenarios
// =========================================================================

#[test]
fn test_format_iso_instant() {
    assert_eq!(safe_format("2024-03-15T00:00:00Z", "yyyy-MM-dd"), "2024-03-15");
}

#[test]
fn test_format_null_returns_default_fallback() {
    assert_eq!(safe_format(None::<&str>, "yyyy-MM-dd"), "N/A");
    assert_eq!(safe_format(&json!(null), "yyyy-MM-dd"), "N/A");
}

#[test]
fn test_format_garbage_returns_custom_fallback() {
    assert_eq!(safe_format_or("not-a-date", "yyyy-MM-dd", "Unknown"), "Unknown");
}

#[test]
fn test_difference_between_plain_dates() {
    assert_eq!(safe_difference_in_days("2024-03-20", "2024-03-15"), Some(5));
}

#[test]
fn test_overflowing_components_are_invalid() {
    assert!(!is_valid_date("2024-13-40"));
    assert_eq!(safe_parse_date("2024-13-40"), None);
    assert_eq!(safe_format("2024-13-40", "yyyy-MM-dd"), "N/A");
}

#[test]
fn test_parse_epoch_millis() {
    let date = safe_parse_date(1_710_460_800_000_i64).unwrap();
    assert_eq!(date.to_utc(), Utc.with_ymd_and_hms(2024, 3, 15, 0, 0, 0).unwrap());
}

// =========================================================================
// Nullish and falsy input
// =========================================================================

#[test]
fn test_nullish_input_everywhere() {
    let nullish = || DateInput::Nullish;
    assert!(!is_valid_date(nullish()));
    assert_eq!(safe_format(nullish(), "yyyy"), "N/A");
    assert_eq!(safe_difference_in_days(nullish(), "2024-03-15"), None);
    assert_eq!(safe_difference_in_days("2024-03-15", nullish()), None);
    assert_eq!(safe_parse_date(nullish()), None);
}

#[test]
fn test_zero_is_falsy_but_formats() {
    assert!(!is_valid_date(0));
    assert_eq!(safe_parse_date(0), None);
    assert_eq!(safe_format(0, "yyyy-MM-dd"), "1970-01-01");
}

// =========================================================================
// Record fields
// =========================================================================

#[test]
fn test_json_record_fields() {
    let record = json!({
        "plantedOn": "2024-03-15",
        "harvestedOn": "03/25/2024",
        "updatedAt": 1_710_460_800_000_i64,
        "inspectedOn": null,
        "organic": true,
    });

    assert_eq!(
        safe_difference_in_days(&record["harvestedOn"], &record["plantedOn"]),
        Some(10)
    );
    assert_eq!(
        safe_format(&record["updatedAt"], "MMM d, yyyy"),
        "Mar 15, 2024"
    );
    assert_eq!(safe_format(&record["inspectedOn"], "MMM d, yyyy"), "N/A");
    assert!(!is_valid_date(&record["organic"]));
    assert!(!is_valid_date(&record["missingField"]));
}

#[test]
fn test_rendered_output_snapshot() {
    let normalizer = DateNormalizer::new(
        NormalizerConfig::default().with_offset(FixedOffset::west_opt(5 * 3600).unwrap()),
    );
    insta::assert_snapshot!(
        normalizer.safe_format("2024-03-15T14:05:00Z", "EEEE, MMMM do yyyy 'at' h:mm a (xxx)"),
        @"Friday, March 15th 2024 at 9:05 AM (-05:00)"
    );
}

#[test]
fn test_difference_from_now_with_fixed_clock() {
    let now = Utc.with_ymd_and_hms(2024, 3, 15, 9, 30, 0).unwrap();
    let normalizer = DateNormalizer::with_clock(NormalizerConfig::default(), FixedClock::new(now));
    assert_eq!(normalizer.difference_in_days_from_now("2024-04-14T09:30:00Z"), Some(30));
    assert_eq!(normalizer.difference_in_days_from_now("2024-03-14T09:30:01Z"), Some(0));
    assert_eq!(normalizer.difference_in_days_from_now(""), None);
}

#[test]
fn test_native_instants_pass_through() {
    let dt: DateTime<FixedOffset> = DateTime::parse_from_rfc3339("2024-03-15T08:00:00+02:00").unwrap();
    assert!(is_valid_date(dt));
    assert_eq!(safe_parse_date(dt), Some(ValidatedDate::new(dt)));
    assert_eq!(safe_format(dt, "HH:mm"), "06:00");
}

// =========================================================================
// Properties
// =========================================================================

proptest! {
    #[test]
    fn prop_difference_with_itself_is_zero(millis in 1..=MAX_MILLIS) {
        prop_assert_eq!(safe_difference_in_days(millis, millis), Some(0));
    }

    #[test]
    fn prop_difference_is_antisymmetric(a in 1..=MAX_MILLIS, b in 1..=MAX_MILLIS) {
        let forward = safe_difference_in_days(a, b);
        let backward = safe_difference_in_days(b, a);
        prop_assert_eq!(forward, backward.map(|days| -days));
    }

    #[test]
    fn prop_lossless_format_round_trips(millis in MIN_MILLIS..=MAX_MILLIS) {
        prop_assume!(millis != 0);
        let rendered = safe_format(millis, LOSSLESS);
        prop_assert_ne!(&rendered, "N/A");
        let reparsed = safe_format(rendered.as_str(), LOSSLESS);
        prop_assert_eq!(&reparsed, &rendered);
        prop_assert_eq!(safe_parse_date(rendered.as_str()).map(|d| d.epoch_millis()), Some(millis));
    }

    #[test]
    fn prop_letters_only_text_is_never_a_date(text in "[a-z]{1,12}") {
        prop_assert!(!is_valid_date(text.as_str()));
        prop_assert_eq!(safe_format_or(text.as_str(), "yyyy", "fallback"), "fallback");
    }

    #[test]
    fn prop_bad_patterns_never_panic(pattern in "[a-zA-Z' -]{0,16}") {
        let rendered = safe_format_or("2024-03-15T00:00:00Z", &pattern, "fallback");
        prop_assert!(!rendered.is_empty() || pattern.is_empty());
    }
}
