use journal_core::{DateKey, EntryAction, EntryStore, JournalEntry};

use crate::commands::common::{apply_actions, load_day, resolve_entry};
use crate::error::CliError;

pub async fn run_hide<S: EntryStore>(store: &S, date: DateKey, id: &str) -> Result<(), CliError> {
    let entry = toggle_hidden(store, date, id).await?;
    let visibility = if entry.hidden { "hidden" } else { "visible" };

    println!("{}  {visibility}", entry.id);
    Ok(())
}

pub async fn toggle_hidden<S: EntryStore>(
    store: &S,
    date: DateKey,
    id: &str,
) -> Result<JournalEntry, CliError> {
    let mut state = load_day(store, date).await?;
    let entry_id = resolve_entry(&state, id)?.id;

    apply_actions(store, &mut state, vec![EntryAction::ToggleHidden(entry_id)]).await?;

    state
        .entry(&entry_id)
        .cloned()
        .ok_or_else(|| CliError::EntryNotFound(entry_id.to_string()))
}
