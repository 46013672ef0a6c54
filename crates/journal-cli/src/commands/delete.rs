use journal_core::{DateKey, EntryAction, EntryId, EntryStore};

use crate::commands::common::{apply_actions, load_day, resolve_entry};
use crate::error::CliError;

pub async fn run_delete<S: EntryStore>(store: &S, date: DateKey, id: &str) -> Result<(), CliError> {
    let deleted = delete_entry(store, date, id).await?;
    println!("{deleted}");
    Ok(())
}

pub async fn delete_entry<S: EntryStore>(
    store: &S,
    date: DateKey,
    id: &str,
) -> Result<EntryId, CliError> {
    let mut state = load_day(store, date).await?;
    let entry_id = resolve_entry(&state, id)?.id;

    apply_actions(store, &mut state, vec![EntryAction::DeleteEntry(entry_id)]).await?;
    Ok(entry_id)
}
