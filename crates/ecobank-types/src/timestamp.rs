//! Wall-clock timestamps as the Ecobank API emits them.
//!
//! The API is inconsistent about timestamp layouts: the same field may come
//! back as `2022-09-23T17:04:43.506`, `2022-09-23 17:04:43`, an RFC 3339
//! string with an offset, or a bare date. [`Timestamp`] parses by trying an
//! ordered list of candidate layouts and keeping the first match. [`Date`]
//! covers the compact `YYYYMMDD` form used by request fields such as
//! statement ranges.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;
use std::sync::{LazyLock, RwLock};

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Layout the API expects when a timestamp is sent back to it.
const DEFAULT_OUTPUT_LAYOUT: &str = "%Y-%m-%d %H:%M:%S";

/// Compact numeric date layout: four-digit year, two-digit month, two-digit
/// day, no separators.
const DATE_LAYOUT: &str = "%Y%m%d";

/// Candidate layouts tried in order when parsing. `%+` is RFC 3339 and also
/// covers the nanosecond variant.
static LAYOUTS: LazyLock<RwLock<Vec<String>>> = LazyLock::new(|| {
    RwLock::new(vec![
        "%Y-%m-%dT%H:%M:%S%.f".to_string(),
        "%Y-%m-%d %H:%M:%S".to_string(),
        "%+".to_string(),
        "%Y-%m-%d".to_string(),
    ])
});

/// Appends extra layouts to the process-wide candidate list.
///
/// Call this during startup, before any requests are issued. The registry is
/// not meant to be mutated concurrently with in-flight parsing.
pub fn register_timestamp_layout<I, S>(layouts: I)
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut guard = LAYOUTS.write().expect("timestamp layout registry poisoned");
    guard.extend(layouts.into_iter().map(Into::into));
}

/// Failure to parse a timestamp against every candidate layout.
///
/// Carries one entry per attempted layout so the offending input can be
/// diagnosed without re-running the parse.
#[derive(Debug, thiserror::Error)]
#[error("cannot parse {input:?} as a timestamp; attempted layouts: {}", .attempts.join("; "))]
pub struct TimestampParseError {
    /// The unquoted input text.
    pub input: String,
    /// `layout: parse error` entry per candidate, in attempt order.
    pub attempts: Vec<String>,
}

/// A point in time plus an optional explicit output layout.
///
/// Equality and ordering follow the underlying clock value only; the layout
/// is presentation state. The default output layout is
/// `%Y-%m-%d %H:%M:%S`, which is what the API expects in request bodies.
#[derive(Debug, Clone)]
pub struct Timestamp {
    inner: NaiveDateTime,
    layout: Option<String>,
}

impl Timestamp {
    /// Wraps a clock value with the default output layout.
    pub fn new(inner: NaiveDateTime) -> Self {
        Self {
            inner,
            layout: None,
        }
    }

    /// Wraps a clock value with an explicit output layout (chrono strftime).
    pub fn with_layout(inner: NaiveDateTime, layout: impl Into<String>) -> Self {
        Self {
            inner,
            layout: Some(layout.into()),
        }
    }

    /// The wrapped clock value.
    pub fn naive(&self) -> NaiveDateTime {
        self.inner
    }

    /// Parses `text` against the candidate layout list, first match wins.
    pub fn parse(text: &str) -> Result<Self, TimestampParseError> {
        let guard = LAYOUTS.read().expect("timestamp layout registry poisoned");
        let mut attempts = Vec::with_capacity(guard.len());
        for layout in guard.iter() {
            match parse_with_layout(text, layout) {
                Ok(inner) => return Ok(Self::new(inner)),
                Err(err) => attempts.push(format!("{layout}: {err}")),
            }
        }
        Err(TimestampParseError {
            input: text.to_string(),
            attempts,
        })
    }
}

/// Parses with a single layout, accepting full and date-only inputs.
///
/// Offset-bearing input keeps its wall-clock reading: under `%+` the naive
/// parser accepts the offset and ignores it.
fn parse_with_layout(text: &str, layout: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    match NaiveDateTime::parse_from_str(text, layout) {
        Ok(dt) => Ok(dt),
        Err(naive_err) => {
            if let Ok(date) = NaiveDate::parse_from_str(text, layout) {
                return Ok(date.and_hms_opt(0, 0, 0).unwrap_or_default());
            }
            Err(naive_err)
        }
    }
}

impl From<NaiveDateTime> for Timestamp {
    fn from(inner: NaiveDateTime) -> Self {
        Self::new(inner)
    }
}

impl PartialEq for Timestamp {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl Eq for Timestamp {}

impl PartialOrd for Timestamp {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Timestamp {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.inner.cmp(&other.inner)
    }
}

impl Display for Timestamp {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let layout = self.layout.as_deref().unwrap_or(DEFAULT_OUTPUT_LAYOUT);
        write!(f, "{}", self.inner.format(layout))
    }
}

impl FromStr for Timestamp {
    type Err = TimestampParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Timestamp::parse(&text).map_err(serde::de::Error::custom)
    }
}

/// A calendar date in the API's fixed `YYYYMMDD` wire form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Date(NaiveDate);

impl Date {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn naive(&self) -> NaiveDate {
        self.0
    }

    /// Parses the fixed compact layout; no other layout is accepted.
    pub fn parse(text: &str) -> Result<Self, chrono::ParseError> {
        NaiveDate::parse_from_str(text, DATE_LAYOUT).map(Self)
    }
}

impl From<NaiveDate> for Date {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl Display for Date {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_LAYOUT))
    }
}

impl FromStr for Date {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Date {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Date {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Date::parse(&text).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_api_millisecond_layout() {
        let ts = Timestamp::parse("2022-09-23T17:04:43.506").unwrap();
        assert_eq!(
            ts.naive(),
            NaiveDate::from_ymd_opt(2022, 9, 23)
                .unwrap()
                .and_hms_milli_opt(17, 4, 43, 506)
                .unwrap()
        );
    }

    #[test]
    fn parses_without_fraction() {
        let ts = Timestamp::parse("2022-04-19T19:46:57").unwrap();
        assert_eq!(ts.to_string(), "2022-04-19 19:46:57");
    }

    #[test]
    fn parses_space_separated_layout() {
        let ts = Timestamp::parse("2025-03-16 12:34:56").unwrap();
        assert_eq!(ts.to_string(), "2025-03-16 12:34:56");
    }

    #[test]
    fn rfc3339_offset_keeps_wall_clock() {
        let ts = Timestamp::parse("2025-03-16T12:34:56+02:00").unwrap();
        assert_eq!(ts.to_string(), "2025-03-16 12:34:56");
    }

    #[test]
    fn parses_date_only_as_midnight() {
        let ts = Timestamp::parse("2024-01-31").unwrap();
        assert_eq!(ts.to_string(), "2024-01-31 00:00:00");
    }

    #[test]
    fn unparseable_input_reports_every_layout() {
        let err = Timestamp::parse("not a timestamp").unwrap_err();
        assert_eq!(err.input, "not a timestamp");
        assert!(err.attempts.len() >= 4);
        let rendered = err.to_string();
        assert!(rendered.contains("not a timestamp"));
        assert!(rendered.contains("%Y-%m-%dT%H:%M:%S%.f"));
    }

    #[test]
    fn explicit_layout_drives_serialization() {
        let inner = NaiveDate::from_ymd_opt(2020, 3, 1)
            .unwrap()
            .and_hms_opt(8, 15, 0)
            .unwrap();
        let ts = Timestamp::with_layout(inner, "%d/%m/%Y %H:%M");
        assert_eq!(ts.to_string(), "01/03/2020 08:15");
        assert_eq!(serde_json::to_string(&ts).unwrap(), "\"01/03/2020 08:15\"");
    }

    #[test]
    fn equality_ignores_layout() {
        let inner = NaiveDate::from_ymd_opt(2020, 3, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(Timestamp::new(inner), Timestamp::with_layout(inner, "%Y"));
    }

    #[test]
    fn deserializes_from_quoted_json() {
        let ts: Timestamp = serde_json::from_str("\"2022-09-23T17:04:43.506\"").unwrap();
        assert_eq!(ts.to_string(), "2022-09-23 17:04:43");
    }

    #[test]
    fn date_round_trips_compact_layout() {
        let date = Date::new(NaiveDate::from_ymd_opt(2020, 3, 16).unwrap());
        assert_eq!(date.to_string(), "20200316");
        assert_eq!(Date::parse("20200316").unwrap(), date);
        assert_eq!(serde_json::to_string(&date).unwrap(), "\"20200316\"");
        let back: Date = serde_json::from_str("\"20200316\"").unwrap();
        assert_eq!(back, date);
    }

    #[test]
    fn date_rejects_separated_input() {
        assert!(Date::parse("2020-03-16").is_err());
    }

    #[test]
    fn registered_layout_participates_in_parsing() {
        register_timestamp_layout(["%d.%m.%Y %H:%M:%S"]);
        let ts = Timestamp::parse("16.03.2025 12:00:01").unwrap();
        assert_eq!(ts.to_string(), "2025-03-16 12:00:01");
    }
}
