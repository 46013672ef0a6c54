use journal_core::calendar::day_header;
use journal_core::{DateKey, EntryStore, JournalEntry};

use crate::commands::common::{entry_to_list_item, format_entry_lines, load_day, EntryListItem};
use crate::error::CliError;

pub async fn run_list<S: EntryStore>(
    store: &S,
    date: DateKey,
    include_hidden: bool,
    as_json: bool,
) -> Result<(), CliError> {
    let entries = list_entries(store, date, include_hidden).await?;

    if as_json {
        let json_items = entries
            .iter()
            .map(entry_to_list_item)
            .collect::<Vec<EntryListItem>>();
        println!("{}", serde_json::to_string_pretty(&json_items)?);
        return Ok(());
    }

    println!("{}", day_header(Some(&date.to_string())));
    if entries.is_empty() {
        println!("No entries");
    }
    for line in format_entry_lines(&entries) {
        println!("{line}");
    }

    Ok(())
}

pub async fn list_entries<S: EntryStore>(
    store: &S,
    date: DateKey,
    include_hidden: bool,
) -> Result<Vec<JournalEntry>, CliError> {
    let state = load_day(store, date).await?;
    if include_hidden {
        Ok(state.entries)
    } else {
        Ok(state.visible_entries().cloned().collect())
    }
}
