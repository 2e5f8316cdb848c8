use core::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};

/// Largest magnitude of epoch milliseconds a timestamp may carry.
const MAX_MILLIS: f64 = 8.64e15;

// -----------------------------------------------------------------------------
// Timestamp

/// A UTC instant with millisecond precision on the wire, or the invalid
/// timestamp produced by coercing input that names no instant.
///
/// The invalid timestamp prints as `Invalid Date`, converts to NaN and
/// serializes as null.
///
/// # Examples
///
/// ```
/// use vc_contract::value::Timestamp;
///
/// let ts = Timestamp::parse("2024-02-29 12:30:00").unwrap();
/// assert_eq!(ts.to_string(), "2024-02-29T12:30:00.000Z");
/// assert_eq!(Timestamp::from_millis(ts.millis().unwrap()), Some(ts));
///
/// let invalid = Timestamp::parse_lossy("not a date");
/// assert!(!invalid.is_valid());
/// assert_eq!(invalid.to_string(), "Invalid Date");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(Option<DateTime<Utc>>);

impl Timestamp {
    pub const INVALID: Self = Self(None);

    #[inline]
    pub const fn new(datetime: DateTime<Utc>) -> Self {
        Self(Some(datetime))
    }

    /// Builds a timestamp from epoch milliseconds.
    #[inline]
    pub fn from_millis(millis: i64) -> Option<Self> {
        Utc.timestamp_millis_opt(millis).single().map(Self::new)
    }

    /// Builds a timestamp from fractional epoch milliseconds, the fraction is truncated.
    ///
    /// Returns `None` for non-finite input and for instants beyond ±8.64e15 ms.
    pub fn from_millis_f64(millis: f64) -> Option<Self> {
        if !millis.is_finite() || millis.abs() > MAX_MILLIS {
            return None;
        }
        Self::from_millis(millis.trunc() as i64)
    }

    /// Reads RFC 3339 text, or `YYYY-MM-DD` optionally followed by a `T` or
    /// space separated `HH:MM:SS[.fff]`. Text without an offset is UTC.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();

        if let Ok(datetime) = DateTime::parse_from_rfc3339(text) {
            return Some(Self::new(datetime.with_timezone(&Utc)));
        }

        for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
            if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
                return Some(Self::new(naive.and_utc()));
            }
        }

        NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| Self::new(naive.and_utc()))
    }

    /// Like [`parse`](Self::parse), unreadable text gives [`INVALID`](Self::INVALID).
    #[inline]
    pub fn parse_lossy(text: &str) -> Self {
        Self::parse(text).unwrap_or(Self::INVALID)
    }

    /// Like [`from_millis_f64`](Self::from_millis_f64), out of range input gives
    /// [`INVALID`](Self::INVALID).
    #[inline]
    pub fn from_millis_lossy(millis: f64) -> Self {
        Self::from_millis_f64(millis).unwrap_or(Self::INVALID)
    }

    #[inline]
    pub const fn is_valid(&self) -> bool {
        self.0.is_some()
    }

    /// Epoch milliseconds, `None` for the invalid timestamp.
    #[inline]
    pub fn millis(&self) -> Option<i64> {
        self.0.as_ref().map(DateTime::timestamp_millis)
    }

    #[inline]
    pub const fn as_datetime(&self) -> Option<&DateTime<Utc>> {
        self.0.as_ref()
    }
}

impl From<DateTime<Utc>> for Timestamp {
    #[inline]
    fn from(value: DateTime<Utc>) -> Self {
        Self::new(value)
    }
}

impl TryFrom<Timestamp> for DateTime<Utc> {
    type Error = Timestamp;

    #[inline]
    fn try_from(value: Timestamp) -> Result<Self, Timestamp> {
        value.0.ok_or(value)
    }
}

/// RFC 3339 with millisecond precision, e.g. `2024-01-01T00:00:00.000Z`.
impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Some(datetime) => f.write_str(&datetime.to_rfc3339_opts(SecondsFormat::Millis, true)),
            None => f.write_str("Invalid Date"),
        }
    }
}

// -----------------------------------------------------------------------------
// Tests
