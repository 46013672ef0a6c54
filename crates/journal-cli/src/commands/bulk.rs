use journal_core::{BulkOperation, DateKey, EntryAction, EntryStore};

use crate::commands::common::{apply_actions, load_day, resolve_entries};
use crate::error::CliError;

pub async fn run_bulk<S: EntryStore>(
    store: &S,
    operation: BulkOperation,
    date: DateKey,
    ids: &[String],
) -> Result<(), CliError> {
    let affected = apply_bulk(store, operation, date, ids).await?;

    let verb = match operation {
        BulkOperation::Delete => "Deleted",
        BulkOperation::Hide => "Toggled visibility of",
        BulkOperation::Nothing => "Left",
    };
    println!("{verb} {affected} entries");
    Ok(())
}

/// Select every resolved entry and apply `operation` to the selection.
pub async fn apply_bulk<S: EntryStore>(
    store: &S,
    operation: BulkOperation,
    date: DateKey,
    ids: &[String],
) -> Result<usize, CliError> {
    let mut state = load_day(store, date).await?;
    let selected = resolve_entries(&state, ids)?;
    let affected = selected.len();

    let mut actions = vec![EntryAction::BeginBulkOp(operation)];
    actions.extend(selected.into_iter().map(EntryAction::ToggleSelect));
    actions.push(EntryAction::ApplyBulkOp);

    apply_actions(store, &mut state, actions).await?;
    Ok(affected)
}
