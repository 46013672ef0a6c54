//! Human-readable labels for calendar headers.

use chrono::{Datelike, Month};

use crate::models::DateKey;

/// English month name for a 0-based month.
#[must_use]
pub fn month_name(month0: u32) -> &'static str {
    month0
        .checked_add(1)
        .and_then(|month| u8::try_from(month).ok())
        .and_then(|month| Month::try_from(month).ok())
        .map_or("Unknown", |month| month.name())
}

/// Ordinal suffix for a day of the month: 1st, 2nd, 3rd, 4th, 11th, 22nd.
#[must_use]
pub const fn day_number_suffix(day: u32) -> &'static str {
    match day {
        11..=13 => "th",
        _ => match day % 10 {
            1 => "st",
            2 => "nd",
            3 => "rd",
            _ => "th",
        },
    }
}

/// Title for a day's entry list, e.g. "March 3rd, 2024".
///
/// Without a date the generic "Details" title is used; an unparsable date is
/// shown verbatim.
#[must_use]
pub fn day_header(date: Option<&str>) -> String {
    let Some(raw) = date else {
        return "Details".to_string();
    };

    match raw.parse::<DateKey>() {
        Ok(key) => {
            let date = key.date();
            let day = date.day();
            format!(
                "{} {day}{}, {}",
                month_name(date.month0()),
                day_number_suffix(day),
                date.year()
            )
        }
        Err(_) => raw.to_string(),
    }
}
