//! The single resolution pipeline shared by every safe operation.

use chrono::FixedOffset;

use crate::error::DateError;
use crate::generic::parse_generic;
use crate::input::DateInput;
use crate::iso::{IsoError, IsoValidation, parse_iso8601};
use crate::validated::ValidatedDate;

/// Outcome of resolving a [`DateInput`].
#[derive(Debug, Clone, PartialEq)]
pub enum DateResolution {
    /// The input names a real calendar instant.
    Valid(ValidatedDate),
    /// The input was nullish.
    Empty,
    /// The input could not be turned into an instant.
    Invalid(DateError),
}

impl DateResolution {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    pub fn as_date(&self) -> Option<&ValidatedDate> {
        match self {
            Self::Valid(date) => Some(date),
            _ => None,
        }
    }

    pub fn as_error(&self) -> Option<&DateError> {
        match self {
            Self::Invalid(err) => Some(err),
            _ => None,
        }
    }

    pub fn into_date(self) -> Option<ValidatedDate> {
        match self {
            Self::Valid(date) => Some(date),
            _ => None,
        }
    }
}

impl From<Result<ValidatedDate, DateError>> for DateResolution {
    fn from(result: Result<ValidatedDate, DateError>) -> Self {
        match result {
            Ok(date) => Self::Valid(date),
            Err(err) => Self::Invalid(err),
        }
    }
}

/// Resolves any input shape to a validated instant.
///
/// Text goes through the strict ISO 8601 parser first and the permissive
/// parser second. Offset-less values land in `default_offset`. Only
/// [`DateInput::Nullish`] resolves to [`DateResolution::Empty`]; falsy
/// short-circuits belong to the callers that want them.
pub fn resolve(input: &DateInput<'_>, default_offset: FixedOffset) -> DateResolution {
    match input {
        DateInput::Nullish => DateResolution::Empty,
        DateInput::Instant(dt) => DateResolution::Valid(ValidatedDate::new(*dt)),
        DateInput::Text(text) => resolve_text(text, default_offset).into(),
        DateInput::Numeric(millis) => {
            ValidatedDate::from_epoch_millis(*millis, default_offset).into()
        }
        DateInput::Unsupported(kind) => {
            DateResolution::Invalid(DateError::Unsupported { kind: *kind })
        }
    }
}

fn resolve_text(text: &str, default_offset: FixedOffset) -> Result<ValidatedDate, DateError> {
    let iso_error = match parse_iso8601(text) {
        IsoValidation::Valid(iso) => {
            return iso
                .to_instant(default_offset)
                .map(ValidatedDate::new)
                .map_err(DateError::from);
        }
        IsoValidation::Empty => None,
        IsoValidation::Invalid(err) => Some(err),
    };

    match parse_generic(text, default_offset) {
        Ok(dt) => Ok(ValidatedDate::new(dt)),
        // Text that starts like ISO but names a bad component reports that component.
        Err(generic_err) => match iso_error {
            Some(IsoError::InvalidYear | IsoError::Malformed(_)) | None => Err(generic_err),
            Some(err) => Err(DateError::Iso(err)),
        },
    }
}
