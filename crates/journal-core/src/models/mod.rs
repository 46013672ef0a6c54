//! Data models for Journal

mod calendar_day;
mod date_key;
mod entry;

pub use calendar_day::{CalendarDay, YearMonth};
pub use date_key::DateKey;
pub use entry::{decode_quick_note, EntryId, FieldChanges, JournalEntry};
