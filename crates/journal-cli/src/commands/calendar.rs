use chrono::NaiveDate;
use journal_core::calendar::DAYS_PER_WEEK;
use journal_core::{CalendarView, DateKey, MonthGrid};

use crate::error::CliError;

const WEEKDAY_LABELS: [&str; DAYS_PER_WEEK] = ["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"];

pub fn run_calendar(month_offset: i32, reference: DateKey, as_json: bool) -> Result<(), CliError> {
    let today = reference.date();
    let view = CalendarView::new(month_offset);
    let grid = view.grid(today);

    if as_json {
        println!("{}", serde_json::to_string_pretty(&grid)?);
        return Ok(());
    }

    for line in render_calendar(&view.title(today), &grid, today) {
        println!("{line}");
    }
    Ok(())
}

/// Render a month as text: title, weekday labels, then one line per week.
///
/// Days outside the displayed month are dotted out and `today` is starred.
pub fn render_calendar(title: &str, grid: &MonthGrid, today: NaiveDate) -> Vec<String> {
    let width = DAYS_PER_WEEK * 4;
    let mut lines = vec![
        format!("{title:^width$}").trim_end().to_string(),
        WEEKDAY_LABELS
            .iter()
            .map(|label| format!("{label:>3} "))
            .collect::<String>()
            .trim_end()
            .to_string(),
    ];

    for row in grid.rows() {
        let line = row
            .iter()
            .map(|day| {
                if !day.is_current_month {
                    "  . ".to_string()
                } else if day.is_today(today) {
                    format!("{:>3}*", day.day)
                } else {
                    format!("{:>3} ", day.day)
                }
            })
            .collect::<String>();
        lines.push(line.trim_end().to_string());
    }

    lines
}
