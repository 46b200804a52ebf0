//! Error taxonomy for date resolution.
//!
//! These errors never cross the public safe operations; they travel inside a
//! [`DateResolution`](crate::resolve::DateResolution) and end up in log
//! events.

use std::path::PathBuf;

use thiserror::Error;

use crate::iso::IsoError;
use crate::pattern::PatternError;

/// Why a value could not be turned into a validated date.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DateError {
    #[error("strict ISO 8601 parse failed: {0}")]
    Iso(#[from] IsoError),

    #[error("unrecognized date text: {value:?}")]
    Unrecognized { value: String },

    #[error("timestamp {millis} ms is outside the representable range")]
    OutOfRange { millis: f64 },

    #[error("timestamp is not a finite number")]
    NonFinite,

    #[error("unsupported input type: {kind}")]
    Unsupported { kind: &'static str },

    #[error("invalid format pattern: {0}")]
    Pattern(#[from] PatternError),
}

impl DateError {
    pub(crate) fn unrecognized(value: impl Into<String>) -> Self {
        Self::Unrecognized {
            value: value.into(),
        }
    }
}

/// Errors raised while loading a [`NormalizerConfig`](crate::config::NormalizerConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse TOML config {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid zone offset {value:?}: expected Z, UTC, or ±HH[:MM]")]
    InvalidOffset { value: String },
}

impl ConfigError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
