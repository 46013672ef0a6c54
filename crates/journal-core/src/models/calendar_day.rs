//! Calendar cell and month models

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::DateKey;

/// One cell of a month grid.
///
/// `month` is 0-based (January = 0), matching [`YearMonth`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CalendarDay {
    pub day: u32,
    pub month: u32,
    pub year: i32,
    pub is_current_month: bool,
}

impl CalendarDay {
    #[must_use]
    pub const fn new(day: u32, month: u32, year: i32, is_current_month: bool) -> Self {
        Self {
            day,
            month,
            year,
            is_current_month,
        }
    }

    /// Identity used for list diffing.
    #[must_use]
    pub const fn key(&self) -> (i32, u32, u32) {
        (self.year, self.month, self.day)
    }

    /// The cell as a chrono date, if chrono can represent the year.
    #[must_use]
    pub fn date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month + 1, self.day)
    }

    /// The store partition key for entries written on this day.
    #[must_use]
    pub fn date_key(&self) -> Option<DateKey> {
        self.date().map(DateKey::new)
    }

    #[must_use]
    pub fn is_today(&self, today: NaiveDate) -> bool {
        self.year == today.year()
            && self.month == today.month0()
            && self.day == today.day()
    }
}

/// A year plus a 0-based month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    #[must_use]
    pub const fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    #[must_use]
    pub fn of(date: NaiveDate) -> Self {
        Self::new(date.year(), date.month0())
    }

    /// Shift by a signed number of months, carrying into the year.
    ///
    /// The year saturates at the `i32` bounds, which no `i32` offset from a
    /// chrono-representable date can reach.
    #[must_use]
    pub fn add_months(self, offset: i32) -> Self {
        let total = i64::from(self.year) * 12 + i64::from(self.month) + i64::from(offset);
        let year = total.div_euclid(12);
        let month = total.rem_euclid(12);
        Self {
            year: i32::try_from(year).unwrap_or(if year < 0 { i32::MIN } else { i32::MAX }),
            month: u32::try_from(month).unwrap_or(0),
        }
    }

    #[must_use]
    pub fn previous(self) -> Self {
        self.add_months(-1)
    }

    #[must_use]
    pub fn next(self) -> Self {
        self.add_months(1)
    }
}
