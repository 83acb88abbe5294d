//! Poll options and their normalization into absolute intervals.
//!
//! A poll option is either a free-text choice, a calendar date, or a
//! date-time range. Date and DateTime options carry civil (wall clock)
//! timestamps that only become absolute instants once combined with the
//! poll's IANA timezone. [`normalize_options`] performs that conversion.
//!
//! # DST handling
//!
//! - A Date option covers 24 elapsed hours from local midnight, not
//!   "midnight to next midnight". On transition days that window ends an
//!   hour before or after the next local midnight.
//! - An ambiguous local time (clocks falling back) resolves to the earliest
//!   instant.
//! - A nonexistent local time (clocks springing forward) is shifted forward
//!   by the length of the gap, so 02:30 in a 02:00 → 03:00 gap becomes 03:30.

use chrono::{
    DateTime, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone, Utc,
};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{ValidationError, ValidationResult};
use crate::interval::Interval;

/// The shape of a poll option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionKind {
    /// A full calendar day.
    Date,
    /// An explicit date-time range.
    DateTime,
    /// A free-text choice without time semantics.
    Arbitrary,
}

/// A candidate choice on a poll.
///
/// `from`/`to` are civil timestamps interpreted in the poll's timezone.
/// Date options use `from` only; DateTime options need both. `title` is
/// only meaningful for Arbitrary options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollOption {
    pub id: String,
    pub kind: OptionKind,
    #[serde(default)]
    pub from: Option<NaiveDateTime>,
    #[serde(default)]
    pub to: Option<NaiveDateTime>,
    #[serde(default)]
    pub title: Option<String>,
}

impl PollOption {
    /// Creates a free-text option.
    pub fn arbitrary(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: OptionKind::Arbitrary,
            from: None,
            to: None,
            title: Some(title.into()),
        }
    }

    /// Creates a full-day option.
    pub fn date(id: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            id: id.into(),
            kind: OptionKind::Date,
            from: Some(date.and_time(NaiveTime::MIN)),
            to: None,
            title: None,
        }
    }

    /// Creates a date-time range option.
    pub fn date_time(id: impl Into<String>, from: NaiveDateTime, to: NaiveDateTime) -> Self {
        Self {
            id: id.into(),
            kind: OptionKind::DateTime,
            from: Some(from),
            to: Some(to),
            title: None,
        }
    }

    /// Parses a full-day option from text such as `2021-11-08`.
    pub fn parse_date(id: impl Into<String>, text: &str) -> ValidationResult<Self> {
        let id = id.into();
        let from = parse_civil(&id, text)?;
        Ok(Self::date(id, from.date()))
    }

    /// Parses a date-time range option from text such as `2021-11-04T10:00`.
    pub fn parse_date_time(id: impl Into<String>, from: &str, to: &str) -> ValidationResult<Self> {
        let id = id.into();
        let from = parse_civil(&id, from)?;
        let to = parse_civil(&id, to)?;
        Ok(Self::date_time(id, from, to))
    }

    /// Returns `true` for Date and DateTime options.
    pub fn has_time_semantics(&self) -> bool {
        matches!(self.kind, OptionKind::Date | OptionKind::DateTime)
    }
}

/// A Date or DateTime option translated into an absolute half-open range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedInterval {
    pub option_id: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl NormalizedInterval {
    /// Returns the range covered by the option.
    pub fn interval(&self) -> Interval {
        Interval {
            start: self.start,
            end: self.end,
        }
    }
}

const CIVIL_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Parses a civil timestamp.
///
/// Accepts `YYYY-MM-DD` (read as local midnight) and `YYYY-MM-DDTHH:MM[:SS]`,
/// with either `T` or a space as separator.
pub fn parse_civil(option_id: &str, text: &str) -> ValidationResult<NaiveDateTime> {
    let trimmed = text.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN));
    }
    CIVIL_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .ok_or_else(|| ValidationError::unparsable(option_id, text))
}

/// Parses an IANA timezone identifier.
pub fn parse_timezone(timezone: &str) -> ValidationResult<Tz> {
    timezone
        .parse::<Tz>()
        .map_err(|_| ValidationError::UnknownTimezone {
            timezone: timezone.to_string(),
        })
}

/// Converts a civil timestamp in `tz` into an absolute instant.
///
/// Returns `None` if the instant falls outside the range chrono can
/// represent.
pub fn civil_to_utc(tz: &Tz, local: NaiveDateTime) -> Option<DateTime<Utc>> {
    match tz.from_local_datetime(&local) {
        LocalResult::Single(dt) => Some(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, _) => Some(earliest.with_timezone(&Utc)),
        LocalResult::None => {
            // Read the wall clock with the offset in force before the gap.
            let earlier = local.checked_sub_signed(Duration::hours(24))?;
            let before = tz.offset_from_utc_datetime(&earlier);
            let offset = Duration::seconds(i64::from(before.fix().local_minus_utc()));
            local.checked_sub_signed(offset).map(|utc| utc.and_utc())
        }
    }
}

/// Normalizes one option against an already parsed timezone.
///
/// Returns `Ok(None)` for Arbitrary options.
pub fn normalize_option(option: &PollOption, tz: &Tz) -> ValidationResult<Option<NormalizedInterval>> {
    let (start, end) = match option.kind {
        OptionKind::Arbitrary => return Ok(None),
        OptionKind::Date => {
            let from = option
                .from
                .ok_or_else(|| ValidationError::missing_bound(&option.id, "from"))?;
            let start = to_instant(tz, option, from.date().and_time(NaiveTime::MIN))?;
            let end = start
                .checked_add_signed(Duration::hours(24))
                .ok_or_else(|| ValidationError::out_of_range(&option.id))?;
            (start, end)
        }
        OptionKind::DateTime => {
            let from = option
                .from
                .ok_or_else(|| ValidationError::missing_bound(&option.id, "from"))?;
            let to = option
                .to
                .ok_or_else(|| ValidationError::missing_bound(&option.id, "to"))?;
            (to_instant(tz, option, from)?, to_instant(tz, option, to)?)
        }
    };

    if start >= end {
        return Err(ValidationError::EmptyRange {
            option_id: option.id.clone(),
        });
    }

    Ok(Some(NormalizedInterval {
        option_id: option.id.clone(),
        start,
        end,
    }))
}

fn to_instant(tz: &Tz, option: &PollOption, local: NaiveDateTime) -> ValidationResult<DateTime<Utc>> {
    civil_to_utc(tz, local).ok_or_else(|| ValidationError::out_of_range(&option.id))
}

/// Normalizes every Date/DateTime option of a poll, preserving option order.
///
/// The timezone is only resolved when at least one option needs it, so a
/// poll consisting purely of Arbitrary options never fails.
pub fn normalize_options(
    options: &[PollOption],
    timezone: &str,
) -> ValidationResult<Vec<NormalizedInterval>> {
    let mut timed = options.iter().filter(|o| o.has_time_semantics()).peekable();
    if timed.peek().is_none() {
        return Ok(Vec::new());
    }

    let tz = parse_timezone(timezone)?;
    timed
        .filter_map(|option| normalize_option(option, &tz).transpose())
        .collect()
}
