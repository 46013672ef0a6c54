use chrono::NaiveDate;
use journal_core::{
    BulkOperation, DateKey, EntryListState, EntryStore, InMemoryEntryStore, JournalConfig,
    JournalEntry, SqliteEntryStore,
};
use pretty_assertions::assert_eq;

use crate::commands::add::add_entry;
use crate::commands::bulk::apply_bulk;
use crate::commands::calendar::render_calendar;
use crate::commands::common::{
    entry_preview, format_entry_lines, format_relative_time, format_timestamp, normalize_content,
    normalize_entry_identifier, resolve_date, resolve_db_path, resolve_entry, short_id,
};
use crate::commands::config::run_config_init;
use crate::commands::delete::delete_entry;
use crate::commands::edit::edit_entry;
use crate::commands::hide::toggle_hidden;
use crate::commands::list::list_entries;
use crate::commands::quick::add_quick_note;
use crate::error::CliError;

fn day(d: u32) -> DateKey {
    DateKey::from_ymd(2024, 8, d).unwrap()
}

#[test]
fn normalize_content_trims_and_rejects_empty() {
    assert_eq!(normalize_content("  hello  "), Some("hello".to_string()));
    assert_eq!(normalize_content(" \n\t "), None);
}

#[test]
fn normalize_content_keeps_multiline_text() {
    assert_eq!(
        normalize_content("line 1\nline 2\n"),
        Some("line 1\nline 2".to_string())
    );
}

#[test]
fn normalize_entry_identifier_rejects_blank() {
    assert!(matches!(
        normalize_entry_identifier("   "),
        Err(CliError::EmptyEntryId)
    ));
    assert_eq!(normalize_entry_identifier(" 0190ABC ").unwrap(), "0190abc");
}

#[test]
fn format_relative_time_units() {
    let now = 10_000_000;
    assert_eq!(format_relative_time(now - 30_000, now), "just now");
    assert_eq!(format_relative_time(now - 120_000, now), "2m ago");
    assert_eq!(format_relative_time(now - 2 * 60 * 60_000, now), "2h ago");
}

#[test]
fn format_timestamp_returns_utc_label() {
    assert_eq!(format_timestamp(0), "1970-01-01 00:00:00 UTC");
}

#[test]
fn entry_preview_truncates_with_ellipsis() {
    let entry = JournalEntry::new(day(1), "This is a very long sentence that should be shortened");
    assert_eq!(entry_preview(&entry, 20), "This is a very lo...");
    assert_eq!(entry_preview(&JournalEntry::new(day(1), ""), 20), "(empty)");
}

#[test]
fn format_entry_lines_marks_hidden_entries() {
    let visible = JournalEntry::new(day(1), "Shown");
    let mut hidden = JournalEntry::new(day(1), "Tucked away");
    hidden.hidden = true;

    let lines = format_entry_lines([&visible, &hidden]);
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with(&short_id(visible.id)));
    assert!(!lines[0].contains("(hidden)"));
    assert!(lines[1].ends_with("(hidden)"));
}

#[test]
fn resolve_entry_accepts_full_id_and_unique_prefix() {
    let entry = JournalEntry::new(day(2), "target");
    let state = EntryListState::with_entries(day(2), vec![entry.clone()]);

    assert_eq!(resolve_entry(&state, &entry.id.to_string()).unwrap(), &entry);
    let prefix = &entry.id.to_string()[..8];
    assert_eq!(resolve_entry(&state, prefix).unwrap(), &entry);
    assert!(matches!(
        resolve_entry(&state, "ffffffff-none"),
        Err(CliError::EntryNotFound(_))
    ));
}

#[test]
fn resolve_entry_reports_ambiguous_prefix() {
    let first = JournalEntry::new(day(2), "a");
    let second = JournalEntry::new(day(2), "b");
    let state = EntryListState::with_entries(day(2), vec![first, second]);

    // UUID v7 ids created together share their timestamp prefix.
    let error = resolve_entry(&state, "0").unwrap_err();
    assert!(matches!(error, CliError::AmbiguousEntryId(_)));
    assert!(error.to_string().contains("ambiguous"));
}

#[test]
fn resolve_date_falls_back() {
    assert_eq!(resolve_date(Some("2024-8-3")), day(3));
    assert_eq!(resolve_date(Some("")), DateKey::sentinel());
    assert_eq!(resolve_date(Some("soon")), DateKey::today());
    assert_eq!(resolve_date(None), DateKey::today());
}

#[test]
fn resolve_db_path_prefers_config() {
    let config = JournalConfig {
        database_path: Some("/tmp/journal-test.db".into()),
        ..JournalConfig::default()
    };
    assert_eq!(
        resolve_db_path(&config).unwrap(),
        std::path::PathBuf::from("/tmp/journal-test.db")
    );
}

#[test]
fn render_calendar_lays_out_weeks() {
    let today = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
    let grid = journal_core::build_month_grid(today, 0);
    let lines = render_calendar("March 2024", &grid, today);

    assert_eq!(lines.len(), 2 + grid.row_count);
    assert_eq!(lines[0].trim(), "March 2024");
    assert_eq!(lines[1], " Su  Mo  Tu  We  Th  Fr  Sa");
    // March 2024 starts on a Friday.
    assert_eq!(lines[2], "  .   .   .   .   .   1   2");
    assert!(lines[4].contains(" 15*"));
}

#[tokio::test(flavor = "current_thread")]
async fn add_edit_hide_delete_flow() {
    let store = InMemoryEntryStore::new();

    let empty = add_entry(&store, day(5), None).await.unwrap();
    assert_eq!(empty.text, "");
    let written = add_entry(&store, day(5), Some("Morning pages".to_string()))
        .await
        .unwrap();
    assert_eq!(store.get(written.id).await.unwrap().unwrap().text, "Morning pages");

    let prefix = written.id.to_string()[..30].to_string();
    let edited = edit_entry(&store, day(5), &prefix, "Evening pages".to_string())
        .await
        .unwrap();
    assert_eq!(edited.text, "Evening pages");

    let hidden = toggle_hidden(&store, day(5), &written.id.to_string()).await.unwrap();
    assert!(hidden.hidden);
    let stored_empty = store.get(empty.id).await.unwrap().unwrap();
    assert_eq!(
        list_entries(&store, day(5), false).await.unwrap(),
        vec![stored_empty]
    );
    assert_eq!(list_entries(&store, day(5), true).await.unwrap().len(), 2);

    let deleted = delete_entry(&store, day(5), &empty.id.to_string()).await.unwrap();
    assert_eq!(deleted, empty.id);
    assert_eq!(store.fetch(day(5)).await.unwrap().len(), 1);
}

#[tokio::test(flavor = "current_thread")]
async fn commands_only_see_the_requested_day() {
    let store = InMemoryEntryStore::new();
    let entry = add_entry(&store, day(6), Some("sixth".to_string())).await.unwrap();

    let result = delete_entry(&store, day(7), &entry.id.to_string()).await;
    assert!(matches!(result, Err(CliError::EntryNotFound(_))));
    assert_eq!(store.fetch(day(6)).await.unwrap().len(), 1);
}

#[tokio::test(flavor = "current_thread")]
async fn quick_note_lands_on_today() {
    let store = InMemoryEntryStore::new();
    let note = add_quick_note(&store, "buy milk".to_string()).await.unwrap();

    assert_eq!(note.date, DateKey::today());
    assert_eq!(store.fetch(DateKey::today()).await.unwrap(), vec![note]);
}

#[tokio::test(flavor = "current_thread")]
async fn bulk_hide_toggles_and_bulk_delete_removes() {
    let store = SqliteEntryStore::open_in_memory("cli-test").unwrap();
    let a = add_entry(&store, day(9), Some("a".to_string())).await.unwrap();
    let b = add_entry(&store, day(9), Some("b".to_string())).await.unwrap();
    let c = add_entry(&store, day(9), Some("c".to_string())).await.unwrap();
    toggle_hidden(&store, day(9), &b.id.to_string()).await.unwrap();

    // Duplicated ids are selected once.
    let ids = vec![a.id.to_string(), b.id.to_string(), a.id.to_string()];
    let affected = apply_bulk(&store, BulkOperation::Hide, day(9), &ids).await.unwrap();
    assert_eq!(affected, 2);
    assert!(store.get(a.id).await.unwrap().unwrap().hidden);
    assert!(!store.get(b.id).await.unwrap().unwrap().hidden);
    assert!(!store.get(c.id).await.unwrap().unwrap().hidden);

    let ids = vec![a.id.to_string(), c.id.to_string()];
    apply_bulk(&store, BulkOperation::Delete, day(9), &ids).await.unwrap();
    let remaining = store.fetch(day(9)).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, b.id);
}

#[test]
fn config_init_writes_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("journal").join("config.json");

    run_config_init(
        &path,
        Some("robin".to_string()),
        None,
        Some("journal=debug".to_string()),
    )
    .unwrap();

    let config = JournalConfig::load(&path).unwrap();
    assert_eq!(config.user_id, "robin");
    assert_eq!(config.log_filter.as_deref(), Some("journal=debug"));
    assert_eq!(config.database_path, None);
}
