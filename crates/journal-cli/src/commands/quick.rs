use journal_core::models::decode_quick_note;
use journal_core::{DateKey, EntryAction, EntryStore, JournalEntry};

use crate::commands::common::{apply_actions, load_day, normalize_content};
use crate::error::CliError;

pub async fn run_quick<S: EntryStore>(
    store: &S,
    text_parts: &[String],
    url_encoded: bool,
) -> Result<(), CliError> {
    let raw = text_parts.join(" ");
    let text = if url_encoded {
        decode_quick_note(&raw)
    } else {
        raw
    };
    let text = normalize_content(&text).ok_or(CliError::EmptyContent)?;

    let entry = add_quick_note(store, text).await?;
    println!("{}  {}", entry.id, entry.date);
    Ok(())
}

/// Write a note to today's list, whatever day is being looked at.
pub async fn add_quick_note<S: EntryStore>(
    store: &S,
    text: String,
) -> Result<JournalEntry, CliError> {
    let mut state = load_day(store, DateKey::today()).await?;
    apply_actions(store, &mut state, vec![EntryAction::AddQuickNote(text)]).await?;

    state
        .focused_entry_id
        .and_then(|id| state.entry(&id).cloned())
        .ok_or(CliError::EmptyContent)
}
