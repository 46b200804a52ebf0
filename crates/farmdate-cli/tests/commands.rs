//! Integration tests for the subcommand bodies.

use farmdate_cli::commands::{
    diff, format, parse, render_diff, render_parse_json, render_parse_lines, validate,
};
use farmdate_cli::input::{InputMode, RawValue, read_values};
use farmdate_core::{DateNormalizer, FixedClock, NormalizerConfig, parse_offset};

fn normalizer() -> DateNormalizer<FixedClock> {
    let now = "2024-03-15T12:00:00Z".parse().unwrap();
    DateNormalizer::with_clock(NormalizerConfig::default(), FixedClock::new(now))
}

fn values(raw: &[&str], mode: InputMode) -> Vec<RawValue> {
    let raw: Vec<String> = raw.iter().map(ToString::to_string).collect();
    read_values(&raw, mode)
}

#[test]
fn test_validate_table_lists_every_value() {
    let table = validate(
        &normalizer(),
        &values(&["2024-03-15T00:00:00Z", "2024-13-40", "03/15/2024"], InputMode::Text),
    );
    let rendered = table.to_string();

    assert_eq!(table.row_count(), 3);
    assert!(rendered.contains("Value"));
    assert!(rendered.contains("Resolved"));
    assert!(rendered.contains("2024-13-40"));
    assert!(rendered.contains("2024-03-15T00:00:00Z"));
    assert!(rendered.contains('✓'));
    assert!(rendered.contains('✗'));
}

#[test]
fn test_format_command() {
    let value = RawValue::read("2024-03-15T00:00:00Z", InputMode::Text);
    insta::assert_snapshot!(format(&normalizer(), &value, "EEE, MMM do yyyy", None), @"Fri, Mar 15th 2024");

    let null = RawValue::read("null", InputMode::Json);
    assert_eq!(format(&normalizer(), &null, "yyyy-MM-dd", None), "N/A");

    let garbage = RawValue::read("not-a-date", InputMode::Text);
    assert_eq!(format(&normalizer(), &garbage, "yyyy-MM-dd", Some("Unknown")), "Unknown");
}

#[test]
fn test_format_uses_configured_offset() {
    let config = NormalizerConfig::default()
        .with_offset(parse_offset("+09:00").unwrap())
        .with_fallback("--");
    let normalizer = DateNormalizer::new(config);
    let value = RawValue::read("2024-03-15T20:00:00Z", InputMode::Text);
    assert_eq!(format(&normalizer, &value, "yyyy-MM-dd HH:mm", None), "2024-03-16 05:00");
    let garbage = RawValue::read("soon", InputMode::Millis);
    assert_eq!(format(&normalizer, &garbage, "yyyy", None), "--");
}

#[test]
fn test_parse_lines_and_json() {
    let records = parse(
        &normalizer(),
        &values(&["1710460800000", "0", "abc"], InputMode::Millis),
    );
    assert_eq!(render_parse_lines(&records), "2024-03-15T00:00:00Z\nnull\nnull");

    let json: serde_json::Value =
        serde_json::from_str(&render_parse_json(&records).unwrap()).unwrap();
    assert_eq!(json[0]["input"], "1710460800000");
    assert_eq!(json[0]["date"], "2024-03-15T00:00:00Z");
    assert!(json[1]["date"].is_null());
    assert_eq!(json[2]["input"], "abc");
    assert!(json[2]["date"].is_null());
}

#[test]
fn test_diff_with_base() {
    let date = RawValue::read("2024-03-20", InputMode::Text);
    let base = RawValue::read("2024-03-15", InputMode::Text);
    assert_eq!(render_diff(diff(&normalizer(), &date, Some(&base))), "5");
    assert_eq!(render_diff(diff(&normalizer(), &base, Some(&date))), "-5");
}

#[test]
fn test_diff_defaults_to_clock() {
    let date = RawValue::read("2024-03-25T12:00:00Z", InputMode::Text);
    assert_eq!(diff(&normalizer(), &date, None), Some(10));

    let missing = RawValue::read("null", InputMode::Json);
    assert_eq!(render_diff(diff(&normalizer(), &missing, None)), "null");
}
