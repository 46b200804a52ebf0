//! Lenient date handling for farm management records.
//!
//! Record fields carry dates as missing values, parsed instants, free-form
//! text, or epoch milliseconds. This crate validates, parses, formats, and
//! subtracts them without ever returning an error to the caller: anything
//! that is not a real calendar instant becomes `false`, `None`, or a
//! fallback string, and the reason is emitted through `tracing`.
//!
//! ```
//! use farmdate_core::{is_valid_date, safe_difference_in_days, safe_format, safe_format_or};
//!
//! assert_eq!(safe_format("2024-03-15T00:00:00Z", "yyyy-MM-dd"), "2024-03-15");
//! assert_eq!(safe_format(None::<&str>, "yyyy-MM-dd"), "N/A");
//! assert_eq!(safe_format_or("not-a-date", "yyyy-MM-dd", "Unknown"), "Unknown");
//! assert_eq!(safe_difference_in_days("2024-03-20", "2024-03-15"), Some(5));
//! assert!(!is_valid_date("2024-13-40"));
//! ```

pub mod clock;
pub mod config;
pub mod error;
pub mod generic;
pub mod input;
pub mod iso;
pub mod normalizer;
pub mod pattern;
pub mod resolve;
pub mod validated;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{DEFAULT_FALLBACK, NormalizerConfig, format_offset, parse_offset};
pub use error::{ConfigError, DateError};
pub use input::DateInput;
pub use iso::{DateTimePrecision, IsoDateTime, IsoError, IsoValidation, parse_iso8601};
pub use normalizer::{
    DateNormalizer, is_valid_date, safe_difference_in_days, safe_difference_in_days_from_now,
    safe_format, safe_format_or, safe_parse_date,
};
pub use pattern::{FormatPattern, PatternError, format_datetime};
pub use resolve::{DateResolution, resolve};
pub use validated::{MAX_EPOCH_MILLIS, ValidatedDate};
