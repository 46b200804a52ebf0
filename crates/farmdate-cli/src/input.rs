//! Turning command-line arguments into date inputs.

use farmdate_core::DateInput;

/// How positional values are read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InputMode {
    /// Every value is date text.
    #[default]
    Text,
    /// Every value is epoch milliseconds; unreadable numbers become `NaN`.
    Millis,
    /// Every value is a JSON scalar; text that is not JSON is read as date text.
    Json,
}

/// A command-line value alongside the input it was read as.
#[derive(Debug, Clone, PartialEq)]
pub struct RawValue {
    pub raw: String,
    pub input: DateInput<'static>,
}

impl RawValue {
    pub fn read(raw: &str, mode: InputMode) -> Self {
        Self {
            raw: raw.to_string(),
            input: read_input(raw, mode),
        }
    }
}

pub fn read_values(raw: &[String], mode: InputMode) -> Vec<RawValue> {
    raw.iter().map(|value| RawValue::read(value, mode)).collect()
}

fn read_input(raw: &str, mode: InputMode) -> DateInput<'static> {
    match mode {
        InputMode::Text => DateInput::from(raw.to_string()),
        InputMode::Millis => DateInput::Numeric(raw.trim().parse().unwrap_or(f64::NAN)),
        InputMode::Json => match serde_json::from_str::<serde_json::Value>(raw) {
            Ok(value) => DateInput::from(&value).into_owned(),
            Err(_) => DateInput::from(raw.to_string()),
        },
    }
}
