use journal_core::{EntryId, EntryStore};

use crate::commands::common::{entry_to_list_item, format_timestamp, normalize_entry_identifier};
use crate::error::CliError;

pub async fn run_show<S: EntryStore>(store: &S, id: &str, as_json: bool) -> Result<(), CliError> {
    let normalized_id = normalize_entry_identifier(id)?;
    let entry_id = normalized_id
        .parse::<EntryId>()
        .map_err(|_| CliError::EntryNotFound(normalized_id.clone()))?;
    let entry = store
        .get(entry_id)
        .await?
        .ok_or(CliError::EntryNotFound(normalized_id))?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&entry_to_list_item(&entry))?);
        return Ok(());
    }

    println!("id:       {}", entry.id);
    println!("date:     {}", entry.date);
    println!("created:  {}", format_timestamp(entry.created_at));
    println!("updated:  {}", format_timestamp(entry.updated_at));
    if entry.hidden {
        println!("hidden:   yes");
    }
    println!();
    println!("{}", entry.text);
    Ok(())
}
