//! Normalizer configuration.
//!
//! A config file is plain TOML with two optional keys:
//!
//! ```toml
//! fallback = "Unknown"
//! offset = "+05:30"
//! ```

use std::fs;
use std::path::Path;

use chrono::{FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_FALLBACK: &str = "N/A";

/// Settings shared by every operation of a [`DateNormalizer`](crate::DateNormalizer).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NormalizerConfig {
    /// Text returned by `safe_format` when the input cannot be rendered.
    pub fallback: String,
    /// Offset applied to offset-less input and used for rendering.
    #[serde(with = "offset_serde")]
    pub offset: FixedOffset,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            fallback: DEFAULT_FALLBACK.to_string(),
            offset: Utc.fix(),
        }
    }
}

impl NormalizerConfig {
    #[must_use]
    pub fn with_fallback(mut self, fallback: impl Into<String>) -> Self {
        self.fallback = fallback.into();
        self
    }

    #[must_use]
    pub fn with_offset(mut self, offset: FixedOffset) -> Self {
        self.offset = offset;
        self
    }

    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Parses a config from TOML text.
    ///
    /// # Errors
    ///
    /// Returns the TOML error for malformed text, unknown keys, or a bad offset.
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Loads a config file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read and
    /// [`ConfigError::Toml`] if it does not parse.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
        let config = Self::from_toml_str(&content).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), offset = %config.offset, "loaded normalizer config");
        Ok(config)
    }

    /// Serializes the config as TOML.
    ///
    /// # Errors
    ///
    /// Fails only if TOML serialization fails.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

/// Parses a zone offset: `Z`, `UTC`, `±HH`, `±HHMM`, or `±HH:MM`.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidOffset`] for anything else, including
/// hours above 23 or minutes above 59.
pub fn parse_offset(value: &str) -> Result<FixedOffset, ConfigError> {
    let invalid = || ConfigError::InvalidOffset {
        value: value.to_string(),
    };

    let trimmed = value.trim();
    if trimmed.eq_ignore_ascii_case("z") || trimmed.eq_ignore_ascii_case("utc") {
        return Ok(Utc.fix());
    }

    let (sign, rest) = if let Some(rest) = trimmed.strip_prefix('+') {
        (1, rest)
    } else if let Some(rest) = trimmed.strip_prefix('-') {
        (-1, rest)
    } else {
        return Err(invalid());
    };

    let digits: String = match rest.split_once(':') {
        Some((hours, minutes)) if hours.len() == 2 && minutes.len() == 2 => {
            format!("{hours}{minutes}")
        }
        Some(_) => return Err(invalid()),
        None if rest.len() == 2 || rest.len() == 4 => rest.to_string(),
        None => return Err(invalid()),
    };
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    let hours: i32 = digits[..2].parse().map_err(|_| invalid())?;
    let minutes: i32 = match digits.get(2..) {
        Some(m) if !m.is_empty() => m.parse().map_err(|_| invalid())?,
        _ => 0,
    };
    if hours > 23 || minutes > 59 {
        return Err(invalid());
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(invalid)
}

/// Formats an offset as `±HH:MM`.
pub fn format_offset(offset: FixedOffset) -> String {
    let seconds = offset.local_minus_utc();
    let sign = if seconds < 0 { '-' } else { '+' };
    let minutes = seconds.unsigned_abs() / 60;
    format!("{sign}{:02}:{:02}", minutes / 60, minutes % 60)
}

mod offset_serde {
    use chrono::FixedOffset;
    use serde::{Deserialize, Deserializer, Serializer, de};

    use super::{format_offset, parse_offset};

    pub(super) fn serialize<S: Serializer>(
        offset: &FixedOffset,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_offset(*offset))
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<FixedOffset, D::Error> {
        let value = String::deserialize(deserializer)?;
        parse_offset(&value).map_err(de::Error::custom)
    }
}
