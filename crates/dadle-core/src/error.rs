//! Validation errors for poll option normalization.

use thiserror::Error;

/// Result type for option normalization.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Malformed option data or an unrecognized timezone.
///
/// Always fatal to a single hint computation; never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The poll's timezone is not a recognized IANA zone.
    #[error("unknown timezone: {timezone}")]
    UnknownTimezone { timezone: String },

    /// A Date or DateTime option lacks a bound it requires.
    #[error("option {option_id}: missing `{bound}` bound")]
    MissingBound {
        option_id: String,
        bound: &'static str,
    },

    /// A bound could not be parsed as a civil date or date-time.
    #[error("option {option_id}: cannot parse {value:?} as a civil date or date-time")]
    Unparsable { option_id: String, value: String },

    /// A DateTime option whose `from` is not before its `to`.
    #[error("option {option_id}: `from` must be before `to`")]
    EmptyRange { option_id: String },

    /// A bound that has no instant chrono can represent in the poll's
    /// timezone.
    #[error("option {option_id}: date lies outside the supported range")]
    OutOfRange { option_id: String },
}

impl ValidationError {
    /// Creates a missing bound error.
    pub fn missing_bound(option_id: impl Into<String>, bound: &'static str) -> Self {
        Self::MissingBound {
            option_id: option_id.into(),
            bound,
        }
    }

    /// Creates an unparsable value error.
    pub fn unparsable(option_id: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Unparsable {
            option_id: option_id.into(),
            value: value.into(),
        }
    }

    /// Creates an out of range error.
    pub fn out_of_range(option_id: impl Into<String>) -> Self {
        Self::OutOfRange {
            option_id: option_id.into(),
        }
    }

    /// Returns the id of the offending option, if the error concerns one.
    pub fn option_id(&self) -> Option<&str> {
        match self {
            Self::UnknownTimezone { .. } => None,
            Self::MissingBound { option_id, .. }
            | Self::Unparsable { option_id, .. }
            | Self::EmptyRange { option_id }
            | Self::OutOfRange { option_id } => Some(option_id),
        }
    }
}
