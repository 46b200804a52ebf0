//! The four safe operations.
//!
//! Every operation accepts anything convertible to [`DateInput`] and never
//! returns an error: bad input collapses into `false`, `None`, or the
//! fallback text, with the reason emitted as a `tracing` event.

use std::sync::LazyLock;

use crate::clock::{Clock, SystemClock};
use crate::config::NormalizerConfig;
use crate::error::DateError;
use crate::input::DateInput;
use crate::resolve::{DateResolution, resolve};
use crate::validated::ValidatedDate;

/// Date validation, parsing, and formatting bound to one configuration.
///
/// # Example
///
/// ```
/// use farmdate_core::{DateNormalizer, NormalizerConfig};
///
/// let normalizer = DateNormalizer::new(NormalizerConfig::default().with_fallback("Unknown"));
/// assert_eq!(normalizer.safe_format("2024-03-15T00:00:00Z", "MMM d, yyyy"), "Mar 15, 2024");
/// assert_eq!(normalizer.safe_format("not-a-date", "MMM d, yyyy"), "Unknown");
/// assert_eq!(normalizer.safe_difference_in_days("2024-03-20", "2024-03-15"), Some(5));
/// ```
#[derive(Debug, Clone, Default)]
pub struct DateNormalizer<C = SystemClock> {
    config: NormalizerConfig,
    clock: C,
}

impl DateNormalizer<SystemClock> {
    pub fn new(config: NormalizerConfig) -> Self {
        Self {
            config,
            clock: SystemClock,
        }
    }
}

impl<C: Clock> DateNormalizer<C> {
    /// Uses `clock` as the source of "now".
    pub fn with_clock(config: NormalizerConfig, clock: C) -> Self {
        Self { config, clock }
    }

    pub fn config(&self) -> &NormalizerConfig {
        &self.config
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Runs the resolution pipeline without any short-circuit or logging.
    pub fn resolve<'a>(&self, input: impl Into<DateInput<'a>>) -> DateResolution {
        resolve(&input.into(), self.config.offset())
    }

    /// Returns whether `input` names a real calendar instant.
    ///
    /// Falsy input (null, empty text, `0`, `NaN`) is never valid.
    pub fn is_valid_date<'a>(&self, input: impl Into<DateInput<'a>>) -> bool {
        let input = input.into();
        if input.is_falsy() {
            return false;
        }
        match resolve(&input, self.config.offset()) {
            DateResolution::Valid(_) => true,
            DateResolution::Invalid(err) => {
                log_rejection("is_valid_date", &input, &err);
                false
            }
            DateResolution::Empty => false,
        }
    }

    /// Formats `input` with `pattern`, or returns the configured fallback.
    pub fn safe_format<'a>(&self, input: impl Into<DateInput<'a>>, pattern: &str) -> String {
        self.safe_format_or(input, pattern, &self.config.fallback)
    }

    /// Formats `input` with `pattern`, or returns `fallback`.
    ///
    /// Only nullish input short-circuits, so `0` renders the epoch. The
    /// output is rendered in the configured offset. A pattern that does not
    /// compile is logged at `warn` and yields `fallback`.
    pub fn safe_format_or<'a>(
        &self,
        input: impl Into<DateInput<'a>>,
        pattern: &str,
        fallback: &str,
    ) -> String {
        let input = input.into();
        let date = match resolve(&input, self.config.offset()) {
            DateResolution::Valid(date) => date,
            DateResolution::Empty => return fallback.to_string(),
            DateResolution::Invalid(err) => {
                log_rejection("safe_format", &input, &err);
                return fallback.to_string();
            }
        };

        match date.with_offset(self.config.offset()).format(pattern) {
            Ok(rendered) => rendered,
            Err(err) => {
                tracing::warn!(
                    operation = "safe_format",
                    input = %input,
                    pattern,
                    error = %DateError::from(err),
                    "failed to format date"
                );
                fallback.to_string()
            }
        }
    }

    /// Whole days from `base` to `date`, or `None` if either is not a valid date.
    ///
    /// The result is truncated toward zero and negative when `date` precedes
    /// `base`. This never reads the clock.
    pub fn safe_difference_in_days<'a, 'b>(
        &self,
        date: impl Into<DateInput<'a>>,
        base: impl Into<DateInput<'b>>,
    ) -> Option<i64> {
        let date = self.safe_parse_date(date)?;
        let base = self.safe_parse_date(base)?;
        Some(date.days_since(&base))
    }

    /// Whole days from now to `date`, or `None` if `date` is not a valid date.
    ///
    /// The clock is read once per call.
    pub fn difference_in_days_from_now<'a>(&self, date: impl Into<DateInput<'a>>) -> Option<i64> {
        let date = self.safe_parse_date(date)?;
        let now = ValidatedDate::from(self.clock.now());
        Some(date.days_since(&now))
    }

    /// Parses `input` into a validated date, or `None`.
    ///
    /// Falsy input yields `None`. Offset-less input is placed in the
    /// configured offset; explicit offsets are kept.
    pub fn safe_parse_date<'a>(&self, input: impl Into<DateInput<'a>>) -> Option<ValidatedDate> {
        let input = input.into();
        if input.is_falsy() {
            return None;
        }
        match resolve(&input, self.config.offset()) {
            DateResolution::Valid(date) => Some(date),
            DateResolution::Invalid(err) => {
                log_rejection("safe_parse_date", &input, &err);
                None
            }
            DateResolution::Empty => None,
        }
    }
}

fn log_rejection(operation: &'static str, input: &DateInput<'_>, err: &DateError) {
    tracing::debug!(
        operation,
        input = %input,
        kind = input.kind(),
        error = %err,
        "date input rejected"
    );
}

static DEFAULT_NORMALIZER: LazyLock<DateNormalizer> =
    LazyLock::new(|| DateNormalizer::new(NormalizerConfig::default()));

/// [`DateNormalizer::is_valid_date`] with the default configuration.
pub fn is_valid_date<'a>(input: impl Into<DateInput<'a>>) -> bool {
    DEFAULT_NORMALIZER.is_valid_date(input)
}

/// [`DateNormalizer::safe_format`] with the default configuration (fallback `"N/A"`, UTC).
pub fn safe_format<'a>(input: impl Into<DateInput<'a>>, pattern: &str) -> String {
    DEFAULT_NORMALIZER.safe_format(input, pattern)
}

/// [`DateNormalizer::safe_format_or`] with the default configuration.
pub fn safe_format_or<'a>(input: impl Into<DateInput<'a>>, pattern: &str, fallback: &str) -> String {
    DEFAULT_NORMALIZER.safe_format_or(input, pattern, fallback)
}

/// [`DateNormalizer::safe_difference_in_days`] with the default configuration.
pub fn safe_difference_in_days<'a, 'b>(
    date: impl Into<DateInput<'a>>,
    base: impl Into<DateInput<'b>>,
) -> Option<i64> {
    DEFAULT_NORMALIZER.safe_difference_in_days(date, base)
}

/// [`DateNormalizer::difference_in_days_from_now`] against the system clock.
pub fn safe_difference_in_days_from_now<'a>(date: impl Into<DateInput<'a>>) -> Option<i64> {
    DEFAULT_NORMALIZER.difference_in_days_from_now(date)
}

/// [`DateNormalizer::safe_parse_date`] with the default configuration.
pub fn safe_parse_date<'a>(input: impl Into<DateInput<'a>>) -> Option<ValidatedDate> {
    DEFAULT_NORMALIZER.safe_parse_date(input)
}
