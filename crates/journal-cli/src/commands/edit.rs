use journal_core::{DateKey, EntryAction, EntryStore, JournalEntry};

use crate::commands::common::{apply_actions, load_day, resolve_entry, resolve_entry_text};
use crate::error::CliError;

pub async fn run_edit<S: EntryStore>(
    store: &S,
    date: DateKey,
    id: &str,
    text_parts: &[String],
) -> Result<(), CliError> {
    let Some(text) = resolve_entry_text(text_parts)? else {
        return Err(CliError::EmptyEditedContent);
    };

    let entry = edit_entry(store, date, id, text).await?;
    println!("{}", entry.id);
    Ok(())
}

pub async fn edit_entry<S: EntryStore>(
    store: &S,
    date: DateKey,
    id: &str,
    text: String,
) -> Result<JournalEntry, CliError> {
    let mut state = load_day(store, date).await?;
    let entry = resolve_entry(&state, id)?.clone();

    if entry.text == text {
        return Ok(entry);
    }

    apply_actions(
        store,
        &mut state,
        vec![EntryAction::EditText { id: entry.id, text }],
    )
    .await?;

    state
        .entry(&entry.id)
        .cloned()
        .ok_or_else(|| CliError::EntryNotFound(entry.id.to_string()))
}
