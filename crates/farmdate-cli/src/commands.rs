//! Subcommand bodies. Each returns what `main` prints.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use farmdate_core::{Clock, DateNormalizer, ValidatedDate};
use serde::Serialize;

use crate::input::RawValue;

/// One line of `parse` output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseRecord {
    pub input: String,
    pub date: Option<ValidatedDate>,
}

/// Builds the `validate` table: value, validity, and resolved instant.
pub fn validate<C: Clock>(normalizer: &DateNormalizer<C>, values: &[RawValue]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Value"),
        header_cell("Valid"),
        header_cell("Resolved"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Center);

    for value in values {
        let valid = normalizer.is_valid_date(value.input.clone());
        let resolved = if valid {
            normalizer.safe_parse_date(value.input.clone())
        } else {
            None
        };
        table.add_row(vec![
            Cell::new(&value.raw),
            valid_cell(valid),
            match resolved {
                Some(date) => Cell::new(date),
                None => dim_cell("-"),
            },
        ]);
    }
    tracing::debug!(count = values.len(), "validated values");
    table
}

/// Formats one value, using the configured fallback unless one is given.
pub fn format<C: Clock>(
    normalizer: &DateNormalizer<C>,
    value: &RawValue,
    pattern: &str,
    fallback: Option<&str>,
) -> String {
    let input = value.input.clone();
    match fallback {
        Some(fallback) => normalizer.safe_format_or(input, pattern, fallback),
        None => normalizer.safe_format(input, pattern),
    }
}

pub fn parse<C: Clock>(normalizer: &DateNormalizer<C>, values: &[RawValue]) -> Vec<ParseRecord> {
    values
        .iter()
        .map(|value| ParseRecord {
            input: value.raw.clone(),
            date: normalizer.safe_parse_date(value.input.clone()),
        })
        .collect()
}

/// One RFC 3339 instant or `null` per line.
pub fn render_parse_lines(records: &[ParseRecord]) -> String {
    records
        .iter()
        .map(|record| {
            record
                .date
                .map_or_else(|| "null".to_string(), |date| date.to_string())
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// # Errors
///
/// Fails only if JSON serialization fails.
pub fn render_parse_json(records: &[ParseRecord]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(records)
}

/// Days from `base` (or now) to `date`.
pub fn diff<C: Clock>(
    normalizer: &DateNormalizer<C>,
    date: &RawValue,
    base: Option<&RawValue>,
) -> Option<i64> {
    match base {
        Some(base) => normalizer.safe_difference_in_days(date.input.clone(), base.input.clone()),
        None => normalizer.difference_in_days_from_now(date.input.clone()),
    }
}

pub fn render_diff(days: Option<i64>) -> String {
    days.map_or_else(|| "null".to_string(), |days| days.to_string())
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn valid_cell(valid: bool) -> Cell {
    if valid {
        Cell::new("✓")
            .fg(Color::Green)
            .add_attribute(Attribute::Bold)
    } else {
        Cell::new("✗").fg(Color::Red)
    }
}

fn dim_cell(value: &str) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
