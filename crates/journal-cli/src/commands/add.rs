use journal_core::{DateKey, EntryAction, EntryStore, JournalEntry};

use crate::commands::common::{apply_actions, load_day, resolve_entry_text};
use crate::error::CliError;

pub async fn run_add<S: EntryStore>(
    store: &S,
    date: DateKey,
    text_parts: &[String],
) -> Result<(), CliError> {
    let text = resolve_entry_text(text_parts)?;
    let entry = add_entry(store, date, text).await?;

    println!("{}", entry.id);
    Ok(())
}

/// Append an entry to `date`; without text the entry starts empty.
pub async fn add_entry<S: EntryStore>(
    store: &S,
    date: DateKey,
    text: Option<String>,
) -> Result<JournalEntry, CliError> {
    let mut state = load_day(store, date).await?;
    apply_actions(store, &mut state, vec![EntryAction::AddEntry]).await?;

    let Some(id) = state.focused_entry_id else {
        return Err(CliError::EntryNotFound(date.to_string()));
    };
    if let Some(text) = text {
        apply_actions(store, &mut state, vec![EntryAction::EditText { id, text }]).await?;
    }

    state
        .entry(&id)
        .cloned()
        .ok_or_else(|| CliError::EntryNotFound(id.to_string()))
}
