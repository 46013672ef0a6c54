//! Month grid construction for the calendar screen.
//!
//! A grid is always 7 columns wide and 5 or 6 rows tall. It starts with the
//! tail of the previous month so that the 1st lands on its weekday column
//! (Sunday first), continues with every day of the displayed month, and is
//! padded with the head of the next month.

mod format;
mod view;

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{CalendarDay, YearMonth};

pub use format::{day_header, day_number_suffix, month_name};
pub use view::CalendarView;

/// Days per grid row.
pub const DAYS_PER_WEEK: usize = 7;

/// A fully laid-out month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthGrid {
    /// Cells in chronological order, exactly `row_count * 7` of them.
    pub days: Vec<CalendarDay>,
    /// 5 or 6.
    pub row_count: usize,
    /// The month the grid is centred on.
    pub displayed: YearMonth,
}

impl MonthGrid {
    /// Iterate the grid one week at a time.
    pub fn rows(&self) -> impl Iterator<Item = &[CalendarDay]> {
        self.days.chunks(DAYS_PER_WEEK)
    }

    /// Number of previous-month cells before the 1st.
    #[must_use]
    pub fn leading_days(&self) -> usize {
        self.days
            .iter()
            .take_while(|day| !day.is_current_month)
            .count()
    }

    /// Cells that belong to the displayed month.
    pub fn current_month_days(&self) -> impl Iterator<Item = &CalendarDay> {
        self.days.iter().filter(|day| day.is_current_month)
    }
}

/// Build the grid for the month `month_offset` months away from `reference`.
///
/// Total over every `i32` offset; performs no I/O.
#[must_use]
pub fn build_month_grid(reference: NaiveDate, month_offset: i32) -> MonthGrid {
    let displayed = YearMonth::of(reference).add_months(month_offset);
    let previous = displayed.previous();
    let next = displayed.next();

    let first_weekday = first_weekday_index(displayed);
    let days_in_month = days_in_month(displayed);
    let days_in_previous = days_in_month_of(previous);

    let row_count: usize = if first_weekday + days_in_month > 35 {
        6
    } else {
        5
    };
    let cell_count = row_count * DAYS_PER_WEEK;

    let mut days = Vec::with_capacity(cell_count);

    days.extend(
        (days_in_previous - first_weekday + 1..=days_in_previous)
            .map(|day| CalendarDay::new(day, previous.month, previous.year, false)),
    );
    days.extend(
        (1..=days_in_month).map(|day| CalendarDay::new(day, displayed.month, displayed.year, true)),
    );

    let trailing = u32::try_from(cell_count - days.len()).unwrap_or(0);
    days.extend((1..=trailing).map(|day| CalendarDay::new(day, next.month, next.year, false)));

    tracing::trace!(
        year = displayed.year,
        month = displayed.month,
        row_count,
        "built month grid"
    );

    MonthGrid {
        days,
        row_count,
        displayed,
    }
}

/// Weekday of the 1st of the month, Sunday = 0.
#[must_use]
pub fn first_weekday_index(month: YearMonth) -> u32 {
    weekday_from_sunday(i64::from(month.year), month.month + 1, 1)
}

/// Number of days in the month, honouring Gregorian leap years.
#[must_use]
pub fn days_in_month(month: YearMonth) -> u32 {
    days_in_month_of(month)
}

#[must_use]
pub const fn is_leap_year(year: i64) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

const fn days_in_month_of(month: YearMonth) -> u32 {
    match month.month {
        1 => {
            if is_leap_year(month.year as i64) {
                29
            } else {
                28
            }
        }
        3 | 5 | 8 | 10 => 30,
        _ => 31,
    }
}

/// Sakamoto's weekday formula on the proleptic Gregorian calendar.
///
/// `month` is 1-based. Floor division keeps it valid for negative years,
/// which chrono cannot represent at the extremes.
fn weekday_from_sunday(year: i64, month: u32, day: u32) -> u32 {
    const OFFSETS: [i64; 12] = [0, 3, 2, 5, 0, 3, 5, 1, 4, 6, 2, 4];

    let year = if month < 3 { year - 1 } else { year };
    let index = (month as usize).saturating_sub(1).min(11);
    let sum = year + year.div_euclid(4) - year.div_euclid(100)
        + year.div_euclid(400)
        + OFFSETS[index]
        + i64::from(day);

    u32::try_from(sum.rem_euclid(7)).unwrap_or(0)
}
