//! Month navigation state for the calendar screen.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{build_month_grid, month_name, MonthGrid};
use crate::models::YearMonth;

/// Which month the calendar shows, as an offset from the current month.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarView {
    pub month_offset: i32,
}

impl CalendarView {
    #[must_use]
    pub const fn new(month_offset: i32) -> Self {
        Self { month_offset }
    }

    pub fn previous_month(&mut self) {
        self.month_offset = self.month_offset.saturating_sub(1);
    }

    pub fn next_month(&mut self) {
        self.month_offset = self.month_offset.saturating_add(1);
    }

    /// Jump back to the month containing today.
    pub fn reset(&mut self) {
        self.month_offset = 0;
    }

    #[must_use]
    pub fn displayed_month(&self, today: NaiveDate) -> YearMonth {
        YearMonth::of(today).add_months(self.month_offset)
    }

    #[must_use]
    pub fn grid(&self, today: NaiveDate) -> MonthGrid {
        build_month_grid(today, self.month_offset)
    }

    /// Header label such as "October 2026".
    #[must_use]
    pub fn title(&self, today: NaiveDate) -> String {
        let month = self.displayed_month(today);
        format!("{} {}", month_name(month.month), month.year)
    }
}
