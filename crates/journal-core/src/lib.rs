//! journal-core - Core library for the journal
//!
//! This crate contains the month calendar, the per-day entry list state
//! machine, and the entry stores shared by every journal interface.

pub mod calendar;
pub mod config;
pub mod controller;
pub mod error;
pub mod models;
pub mod state;
pub mod store;
mod util;

pub use calendar::{build_month_grid, CalendarView, MonthGrid};
pub use config::JournalConfig;
pub use controller::{EntryListController, EntryListHandle};
pub use error::{Error, Result};
pub use models::{CalendarDay, DateKey, EntryId, FieldChanges, JournalEntry, YearMonth};
pub use state::{reduce, BulkOperation, EntryAction, EntryListState, StoreCommand};
pub use store::{EntryStore, InMemoryEntryStore, SqliteEntryStore};
