//! Calendar date used to partition journal entries.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// The day an entry belongs to.
///
/// Rendered as `yyyy-MM-dd`; parsing also accepts unpadded `yyyy-M-d`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DateKey(NaiveDate);

impl DateKey {
    /// Placeholder used when a screen is opened without any date.
    pub const SENTINEL: &'static str = "0000-01-01";

    #[must_use]
    pub const fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Build from a year, a 1-based month, and a day.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// Today's date in the local timezone.
    #[must_use]
    pub fn today() -> Self {
        Self(Local::now().date_naive())
    }

    /// The sentinel date `0000-01-01`.
    #[must_use]
    pub fn sentinel() -> Self {
        Self(NaiveDate::from_ymd_opt(0, 1, 1).unwrap_or(NaiveDate::MIN))
    }

    #[must_use]
    pub const fn date(&self) -> NaiveDate {
        self.0
    }

    /// Parse a date key, never failing.
    ///
    /// Blank input maps to the sentinel date; anything else that does not
    /// parse maps to `today`.
    #[must_use]
    pub fn parse_or(raw: Option<&str>, today: Self) -> Self {
        let Some(raw) = raw.map(str::trim).filter(|value| !value.is_empty()) else {
            return Self::sentinel();
        };
        raw.parse().unwrap_or_else(|error| {
            tracing::warn!("Unparsable date '{raw}', using {today}: {error}");
            today
        })
    }
}

impl FromStr for DateKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidInput(format!("invalid date '{s}' (expected yyyy-M-d)"));

        let mut parts = s.trim().splitn(3, '-');
        let (Some(year), Some(month), Some(day)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid());
        };

        let year = year.parse::<i32>().map_err(|_| invalid())?;
        let month = month.parse::<u32>().map_err(|_| invalid())?;
        let day = day.parse::<u32>().map_err(|_| invalid())?;

        Self::from_ymd(year, month, day).ok_or_else(invalid)
    }
}

impl TryFrom<String> for DateKey {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<DateKey> for String {
    fn from(value: DateKey) -> Self {
        value.to_string()
    }
}

impl From<NaiveDate> for DateKey {
    fn from(value: NaiveDate) -> Self {
        Self(value)
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}",
            self.0.year(),
            self.0.month(),
            self.0.day()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(year: i32, month: u32, day: u32) -> DateKey {
        DateKey::from_ymd(year, month, day).unwrap()
    }

    #[test]
    fn parses_padded_and_unpadded_forms() {
        assert_eq!("2024-03-05".parse::<DateKey>().unwrap(), key(2024, 3, 5));
        assert_eq!("2024-3-5".parse::<DateKey>().unwrap(), key(2024, 3, 5));
    }

    #[test]
    fn displays_zero_padded() {
        assert_eq!(key(2024, 3, 5).to_string(), "2024-03-05");
        assert_eq!(DateKey::sentinel().to_string(), DateKey::SENTINEL);
    }

    #[test]
    fn rejects_impossible_dates() {
        assert!("2023-02-29".parse::<DateKey>().is_err());
        assert!("2024-13-01".parse::<DateKey>().is_err());
        assert!("yesterday".parse::<DateKey>().is_err());
        assert!("2024-03".parse::<DateKey>().is_err());
    }

    #[test]
    fn parse_or_falls_back() {
        let today = key(2025, 6, 1);
        assert_eq!(DateKey::parse_or(Some("2024-2-29"), today), key(2024, 2, 29));
        assert_eq!(DateKey::parse_or(Some("garbage"), today), today);
        assert_eq!(DateKey::parse_or(Some("  "), today), DateKey::sentinel());
        assert_eq!(DateKey::parse_or(None, today), DateKey::sentinel());
    }

    #[test]
    fn serializes_as_string() {
        let json = serde_json::to_string(&key(2024, 1, 9)).unwrap();
        assert_eq!(json, "\"2024-01-09\"");
        let parsed: DateKey = serde_json::from_str("\"2024-1-9\"").unwrap();
        assert_eq!(parsed, key(2024, 1, 9));
    }
}
