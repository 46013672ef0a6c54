use std::collections::BTreeSet;
use std::env;
use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};

use chrono::Utc;
use journal_core::store::execute_all;
use journal_core::{
    DateKey, EntryAction, EntryId, EntryListState, EntryStore, JournalConfig, JournalEntry,
    SqliteEntryStore,
};
use serde::Serialize;

use crate::error::CliError;

const SHORT_ID_LEN: usize = 13;

#[derive(Debug, Serialize)]
pub struct EntryListItem {
    pub id: String,
    pub date: String,
    pub preview: String,
    pub text: String,
    pub hidden: bool,
    pub created_at: i64,
    pub updated_at: i64,
    pub relative_time: String,
}

/// Load one day's entries into a fresh list state.
pub async fn load_day<S: EntryStore>(store: &S, date: DateKey) -> Result<EntryListState, CliError> {
    let entries = store.fetch(date).await?;
    Ok(EntryListState::with_entries(date, entries))
}

/// Apply actions to `state` and write everything they produce to the store.
pub async fn apply_actions<S: EntryStore>(
    store: &S,
    state: &mut EntryListState,
    actions: Vec<EntryAction>,
) -> Result<(), CliError> {
    let mut commands = Vec::new();
    for action in actions {
        commands.extend(state.apply(action));
    }
    execute_all(store, commands).await?;
    Ok(())
}

/// Find an entry of the day by full ID or unique ID prefix.
pub fn resolve_entry<'a>(
    state: &'a EntryListState,
    entry_query: &str,
) -> Result<&'a JournalEntry, CliError> {
    let entry_query = normalize_entry_identifier(entry_query)?;

    if let Ok(id) = entry_query.parse::<EntryId>() {
        if let Some(entry) = state.entry(&id) {
            return Ok(entry);
        }
    }

    let matching = state
        .entries
        .iter()
        .filter(|entry| entry.id.as_str().starts_with(entry_query.as_str()))
        .collect::<Vec<_>>();

    match matching.as_slice() {
        [] => Err(CliError::EntryNotFound(entry_query)),
        [entry] => Ok(*entry),
        _ => {
            let options = matching
                .iter()
                .take(3)
                .map(|entry| short_id(entry.id))
                .collect::<Vec<_>>()
                .join(", ");

            Err(CliError::AmbiguousEntryId(format!(
                "ID prefix '{entry_query}' is ambiguous; matches: {options}"
            )))
        }
    }
}

/// Resolve several ID queries, dropping duplicates.
pub fn resolve_entries(
    state: &EntryListState,
    entry_queries: &[String],
) -> Result<BTreeSet<EntryId>, CliError> {
    entry_queries
        .iter()
        .map(|query| resolve_entry(state, query).map(|entry| entry.id))
        .collect()
}

pub fn short_id(id: EntryId) -> String {
    id.as_str().chars().take(SHORT_ID_LEN).collect()
}

pub fn format_entry_lines<'a>(entries: impl IntoIterator<Item = &'a JournalEntry>) -> Vec<String> {
    let now_ms = Utc::now().timestamp_millis();
    entries
        .into_iter()
        .map(|entry| {
            let short_id = short_id(entry.id);
            let preview = entry_preview(entry, 40);
            let relative_time = format_relative_time(entry.updated_at, now_ms);

            if entry.hidden {
                format!("{short_id:<13}  {preview:<40}  {relative_time:<10}  (hidden)")
            } else {
                format!("{short_id:<13}  {preview:<40}  {relative_time}")
            }
        })
        .collect()
}

pub fn entry_to_list_item(entry: &JournalEntry) -> EntryListItem {
    let now_ms = Utc::now().timestamp_millis();

    EntryListItem {
        id: entry.id.to_string(),
        date: entry.date.to_string(),
        preview: entry_preview(entry, 80),
        text: entry.text.clone(),
        hidden: entry.hidden,
        created_at: entry.created_at,
        updated_at: entry.updated_at,
        relative_time: format_relative_time(entry.updated_at, now_ms),
    }
}

pub fn entry_preview(entry: &JournalEntry, max_chars: usize) -> String {
    let first_line = entry.text.lines().next().unwrap_or("").trim();
    let collapsed = first_line.split_whitespace().collect::<Vec<_>>().join(" ");

    if collapsed.is_empty() {
        "(empty)".to_string()
    } else if collapsed.chars().count() <= max_chars {
        collapsed
    } else {
        let take_len = max_chars.saturating_sub(3);
        let mut truncated = collapsed.chars().take(take_len).collect::<String>();
        truncated.push_str("...");
        truncated
    }
}

pub fn format_timestamp(timestamp_ms: i64) -> String {
    chrono::DateTime::from_timestamp_millis(timestamp_ms).map_or_else(
        || timestamp_ms.to_string(),
        |date_time| date_time.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
    )
}

pub fn format_relative_time(timestamp_ms: i64, now_ms: i64) -> String {
    let diff = now_ms.saturating_sub(timestamp_ms);
    let minute = 60_000;
    let hour = 60 * minute;
    let day = 24 * hour;
    let week = 7 * day;
    let month = 30 * day;
    let year = 365 * day;

    if diff < minute {
        "just now".to_string()
    } else if diff < hour {
        format!("{}m ago", diff / minute)
    } else if diff < day {
        format!("{}h ago", diff / hour)
    } else if diff < week {
        format!("{}d ago", diff / day)
    } else if diff < month {
        format!("{}w ago", diff / week)
    } else if diff < year {
        format!("{}mo ago", diff / month)
    } else {
        format!("{}y ago", diff / year)
    }
}

/// Entry text from the arguments, falling back to piped stdin.
pub fn resolve_entry_text(text_parts: &[String]) -> Result<Option<String>, CliError> {
    if let Some(text) = normalize_content(&text_parts.join(" ")) {
        return Ok(Some(text));
    }
    read_piped_stdin()
}

pub fn normalize_content(content: &str) -> Option<String> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

pub fn normalize_entry_identifier(id: &str) -> Result<String, CliError> {
    let trimmed = id.trim();
    if trimmed.is_empty() {
        Err(CliError::EmptyEntryId)
    } else {
        Ok(trimmed.to_ascii_lowercase())
    }
}

pub fn read_piped_stdin() -> Result<Option<String>, CliError> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        return Ok(None);
    }

    let mut buffer = String::new();
    stdin.lock().read_to_string(&mut buffer)?;
    Ok(normalize_content(&buffer))
}

/// The day named by `--date`, or today.
///
/// A blank date means the sentinel day; an unparsable one means today.
pub fn resolve_date(raw: Option<&str>) -> DateKey {
    let today = DateKey::today();
    raw.map_or(today, |raw| DateKey::parse_or(Some(raw), today))
}

pub fn resolve_config_path(cli_config_path: Option<PathBuf>) -> Result<PathBuf, CliError> {
    cli_config_path
        .or_else(|| env::var_os("JOURNAL_CONFIG").map(PathBuf::from))
        .map_or_else(default_config_path, Ok)
}

pub fn default_config_path() -> Result<PathBuf, CliError> {
    dirs::config_dir()
        .map(|dir| dir.join("journal").join("config.json"))
        .ok_or_else(|| CliError::Config("could not resolve config directory".to_string()))
}

pub fn resolve_db_path(config: &JournalConfig) -> Result<PathBuf, CliError> {
    config.database_path.clone().map_or_else(default_db_path, Ok)
}

pub fn default_db_path() -> Result<PathBuf, CliError> {
    dirs::data_dir()
        .map(|dir| dir.join("journal").join("journal.db"))
        .ok_or_else(|| CliError::Config("could not resolve data directory".to_string()))
}

pub fn open_store(db_path: &Path, config: &JournalConfig) -> Result<SqliteEntryStore, CliError> {
    Ok(SqliteEntryStore::open(db_path, &config.user_id)?)
}
