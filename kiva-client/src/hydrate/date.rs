//! Best-effort coercion of date-like strings.
//!
//! The web API is inconsistent about timestamp formats: most endpoints emit RFC 3339
//! (`2009-03-19T02:10:07Z`) while older payloads and recorded fixtures carry the Unix
//! `date` style (`Thu Mar 19 02:10:07 UTC 2009`). Both parse; anything else is kept verbatim.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use serde::{Serialize, Serializer};
use serde_json::Value;
use tracing::debug;

/// Formats carrying a numeric UTC offset (`+0000`, `-05:00`).
const OFFSET_FORMATS: &[&str] = &[
    "%a %b %d %H:%M:%S %z %Y",
    "%Y-%m-%d %H:%M:%S %z",
    "%Y-%m-%dT%H:%M:%S%z",
];

/// Formats whose zone designator was a name (`UTC`, `GMT`) and has been stripped.
const NAMED_ZONE_FORMATS: &[&str] = &["%a %b %d %H:%M:%S %Y", "%Y-%m-%d %H:%M:%S"];

/// Zone names that denote UTC, matched case-insensitively.
const UTC_ZONE_NAMES: &[&str] = &["UTC", "GMT", "Z"];

/// Value of a date-tagged record field.
///
/// Serializes untagged: a parsed timestamp as an RFC 3339 string (`Z` for UTC, fractional
/// seconds only when present), a raw value as itself.
#[derive(Debug, Clone, PartialEq)]
pub enum DateValue {
    /// The string matched one of the supported grammars.
    Parsed(DateTime<FixedOffset>),
    /// The original JSON value, kept because it could not be parsed.
    Raw(Value),
}

impl DateValue {
    /// Returns the parsed timestamp, if parsing succeeded.
    #[must_use]
    pub fn timestamp(&self) -> Option<&DateTime<FixedOffset>> {
        match self {
            Self::Parsed(timestamp) => Some(timestamp),
            Self::Raw(_) => None,
        }
    }

    /// Returns the parsed timestamp normalised to UTC.
    #[must_use]
    pub fn to_utc(&self) -> Option<DateTime<Utc>> {
        self.timestamp().map(|timestamp| timestamp.with_timezone(&Utc))
    }

    /// Returns the raw value kept after a failed parse.
    #[must_use]
    pub fn raw(&self) -> Option<&Value> {
        match self {
            Self::Parsed(_) => None,
            Self::Raw(value) => Some(value),
        }
    }

    /// Returns true when the value was parsed into a timestamp.
    #[must_use]
    pub fn is_parsed(&self) -> bool {
        matches!(self, Self::Parsed(_))
    }
}

impl Serialize for DateValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Parsed(timestamp) => {
                serializer.serialize_str(&timestamp.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
            Self::Raw(value) => value.serialize(serializer),
        }
    }
}

/// Coerces a JSON value assigned to a date-tagged field.
///
/// Strings are parsed with [`parse_timestamp`]; on failure, and for every non-string value,
/// the input is kept unchanged as [`DateValue::Raw`].
#[must_use]
pub fn coerce(value: Value) -> DateValue {
    match value {
        Value::String(text) => match parse_timestamp(&text) {
            Some(timestamp) => DateValue::Parsed(timestamp),
            None => {
                debug!(value = %text, "keeping unparseable date string verbatim");
                DateValue::Raw(Value::String(text))
            }
        },
        other => DateValue::Raw(other),
    }
}

/// Parses a timestamp in any of the grammars the web API has been observed to emit.
///
/// Supported forms:
/// - RFC 3339: `2009-03-19T02:10:07Z`
/// - RFC 2822: `Thu, 19 Mar 2009 02:10:07 +0000`
/// - Unix `date`: `Thu Mar 19 02:10:07 UTC 2009`, zone `UTC`/`GMT` or a numeric offset;
///   day, month and zone names in any letter case
/// - SQL-ish: `2009-03-19 02:10:07 UTC`, `2009-03-19 02:10:07 +0000`
/// - Bare date: `2009-03-19` (midnight UTC)
///
/// # Examples
///
/// ```
/// use kiva_client::hydrate::date::parse_timestamp;
///
/// let iso = parse_timestamp("2009-03-19T02:10:07Z").unwrap();
/// let unix = parse_timestamp("Thu Mar 19 02:10:07 UTC 2009").unwrap();
/// assert_eq!(iso, unix);
/// assert!(parse_timestamp("last tuesday").is_none());
/// ```
#[must_use]
pub fn parse_timestamp(input: &str) -> Option<DateTime<FixedOffset>> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    DateTime::parse_from_rfc3339(input)
        .ok()
        .or_else(|| DateTime::parse_from_rfc2822(input).ok())
        .or_else(|| parse_with_offset(input))
        .or_else(|| parse_with_zone_name(input))
        .or_else(|| parse_date_only(input))
}

fn parse_with_offset(input: &str) -> Option<DateTime<FixedOffset>> {
    let normalized = collapse_whitespace(input);
    OFFSET_FORMATS
        .iter()
        .find_map(|format| DateTime::parse_from_str(&normalized, format).ok())
}

fn parse_with_zone_name(input: &str) -> Option<DateTime<FixedOffset>> {
    let tokens: Vec<&str> = input.split_whitespace().collect();
    let zone_index = tokens
        .iter()
        .position(|token| UTC_ZONE_NAMES.iter().any(|zone| token.eq_ignore_ascii_case(zone)))?;

    let without_zone = tokens
        .iter()
        .enumerate()
        .filter(|(index, _)| *index != zone_index)
        .map(|(_, token)| *token)
        .collect::<Vec<_>>()
        .join(" ");

    let naive = NAMED_ZONE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(&without_zone, format).ok())?;

    utc_offset().map(|utc| utc.from_utc_datetime(&naive))
}

fn parse_date_only(input: &str) -> Option<DateTime<FixedOffset>> {
    let naive = NaiveDate::parse_from_str(input, "%Y-%m-%d").ok()?.and_hms_opt(0, 0, 0)?;
    utc_offset().map(|utc| utc.from_utc_datetime(&naive))
}

fn collapse_whitespace(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn utc_offset() -> Option<FixedOffset> {
    FixedOffset::east_opt(0)
}
