//! # Timestamp Format
//!
//! Transactions carry a UTC creation timestamp. It is rendered in one fixed
//! textual format everywhere it leaves the process: the database column, the
//! JSON API, and backup documents.
//!
//! ```text
//! 2026-10-17T14:03:07.512094
//! └──── date ┘└ time ┘└ µs ─┘   (UTC, no offset suffix)
//! ```
//!
//! Timestamps are truncated to microseconds when created (see [`now`]), so a
//! value written in this format parses back to the same instant.
//!
//! A restored document may carry text that is not a date at all. That text is
//! kept as [`StoredTimestamp::Verbatim`] and written back out unchanged, so
//! such rows stay listable and exportable.

use chrono::{DateTime, NaiveDateTime, SubsecRound, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// The fixed date-time format (ISO-8601, UTC, microsecond precision).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// Additional layouts accepted when parsing restored documents.
const LENIENT_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
];

/// Current time truncated to microsecond precision.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Renders a timestamp in [`TIMESTAMP_FORMAT`].
pub fn format(ts: &DateTime<Utc>) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Parses a timestamp written by [`format`], by RFC 3339 producers, or by
/// space-separated SQL-style producers.
///
/// Offset-less values are taken as UTC.
pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    LENIENT_FORMATS
        .iter()
        .find_map(|layout| NaiveDateTime::parse_from_str(raw, layout).ok())
        .map(|naive| naive.and_utc())
}

// =============================================================================
// Stored Timestamp
// =============================================================================

/// A transaction timestamp as held in the store.
///
/// Serializes as a string either way: the fixed format for parsed values,
/// the original text for verbatim ones.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StoredTimestamp {
    Parsed(DateTime<Utc>),
    Verbatim(String),
}

impl StoredTimestamp {
    /// Parses `raw` when possible, otherwise keeps it as supplied.
    pub fn from_text(raw: &str) -> Self {
        match parse(raw) {
            Some(ts) => StoredTimestamp::Parsed(ts),
            None => StoredTimestamp::Verbatim(raw.to_string()),
        }
    }

    /// The instant, when the stored text was a date.
    pub fn instant(&self) -> Option<DateTime<Utc>> {
        match self {
            StoredTimestamp::Parsed(ts) => Some(*ts),
            StoredTimestamp::Verbatim(_) => None,
        }
    }

    /// Text for the timestamp column and for JSON.
    pub fn to_text(&self) -> String {
        match self {
            StoredTimestamp::Parsed(ts) => format(ts),
            StoredTimestamp::Verbatim(raw) => raw.clone(),
        }
    }
}

impl From<DateTime<Utc>> for StoredTimestamp {
    fn from(ts: DateTime<Utc>) -> Self {
        StoredTimestamp::Parsed(ts)
    }
}

impl fmt::Display for StoredTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl Serialize for StoredTimestamp {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_text())
    }
}

impl<'de> Deserialize<'de> for StoredTimestamp {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(StoredTimestamp::from_text(&raw))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
