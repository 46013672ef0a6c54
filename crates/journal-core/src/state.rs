//! Entry list state for one day's screen.
//!
//! All transitions are synchronous and infallible. An action that references
//! an id which is no longer present is a silent no-op. Each transition
//! returns the [`StoreCommand`]s the caller should forward to the entry store;
//! the store's answer never feeds back into the transition itself.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::models::{DateKey, EntryId, FieldChanges, JournalEntry};
use crate::util::unix_millis_now;

/// Action staged while in select mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BulkOperation {
    #[default]
    Nothing,
    Delete,
    Hide,
}

/// Coarse screen mode derived from the state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListMode {
    Browsing,
    Selecting,
}

/// Every way the entry list can change.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EntryAction {
    AddEntry,
    AddQuickNote(String),
    EditText { id: EntryId, text: String },
    DeleteEntry(EntryId),
    ToggleHidden(EntryId),
    ToggleSelect(EntryId),
    BeginBulkOp(BulkOperation),
    ExitSelectMode,
    ApplyBulkOp,
    ClearFocus,
    /// A full snapshot from the store replaces the local list.
    ReplaceEntries(Vec<JournalEntry>),
    /// Switch the screen to another day.
    Observe(DateKey),
}

/// A write the entry store should perform.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreCommand {
    Create(JournalEntry),
    Update { id: EntryId, changes: FieldChanges },
    Delete(EntryId),
    BatchUpdate { ids: Vec<EntryId>, changes: FieldChanges },
    BatchDelete(Vec<EntryId>),
}

/// State of a day's entry list.
///
/// Invariants: `selected_ids` only holds ids present in `entries`, and is
/// empty whenever `in_select_mode` is false.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EntryListState {
    pub date: DateKey,
    pub entries: Vec<JournalEntry>,
    pub focused_entry_id: Option<EntryId>,
    pub in_select_mode: bool,
    pub selected_ids: BTreeSet<EntryId>,
    pub pending_bulk_op: BulkOperation,
}

impl EntryListState {
    #[must_use]
    pub const fn new(date: DateKey) -> Self {
        Self {
            date,
            entries: Vec::new(),
            focused_entry_id: None,
            in_select_mode: false,
            selected_ids: BTreeSet::new(),
            pending_bulk_op: BulkOperation::Nothing,
        }
    }

    #[must_use]
    pub const fn with_entries(date: DateKey, entries: Vec<JournalEntry>) -> Self {
        Self {
            date,
            entries,
            focused_entry_id: None,
            in_select_mode: false,
            selected_ids: BTreeSet::new(),
            pending_bulk_op: BulkOperation::Nothing,
        }
    }

    #[must_use]
    pub const fn mode(&self) -> ListMode {
        if self.in_select_mode {
            ListMode::Selecting
        } else {
            ListMode::Browsing
        }
    }

    #[must_use]
    pub fn entry(&self, id: &EntryId) -> Option<&JournalEntry> {
        self.entries.iter().find(|entry| entry.id == *id)
    }

    #[must_use]
    pub fn contains(&self, id: &EntryId) -> bool {
        self.entry(id).is_some()
    }

    /// Entries that are not hidden, in list order.
    pub fn visible_entries(&self) -> impl Iterator<Item = &JournalEntry> {
        self.entries.iter().filter(|entry| !entry.hidden)
    }

    #[must_use]
    pub fn is_selected(&self, id: &EntryId) -> bool {
        self.selected_ids.contains(id)
    }

    /// Apply one action and return the store writes it implies.
    pub fn apply(&mut self, action: EntryAction) -> Vec<StoreCommand> {
        tracing::debug!(date = %self.date, ?action, "entry list action");

        match action {
            EntryAction::AddEntry => self.add_entry(),
            EntryAction::AddQuickNote(text) => self.add_quick_note(text),
            EntryAction::EditText { id, text } => self.edit_text(&id, text),
            EntryAction::DeleteEntry(id) => self.delete_entry(&id),
            EntryAction::ToggleHidden(id) => self.toggle_hidden(&id),
            EntryAction::ToggleSelect(id) => {
                self.toggle_select(&id);
                Vec::new()
            }
            EntryAction::BeginBulkOp(operation) => {
                self.begin_bulk_op(operation);
                Vec::new()
            }
            EntryAction::ExitSelectMode => {
                self.exit_select_mode();
                Vec::new()
            }
            EntryAction::ApplyBulkOp => self.apply_bulk_op(),
            EntryAction::ClearFocus => {
                self.clear_focus();
                Vec::new()
            }
            EntryAction::ReplaceEntries(entries) => {
                self.replace_entries(entries);
                Vec::new()
            }
            EntryAction::Observe(date) => {
                self.observe(date);
                Vec::new()
            }
        }
    }

    /// Append an empty entry for the current day and focus it.
    pub fn add_entry(&mut self) -> Vec<StoreCommand> {
        self.push_focused(JournalEntry::new(self.date, String::new()))
    }

    /// Append a pre-filled entry dated today and focus it.
    pub fn add_quick_note(&mut self, text: impl Into<String>) -> Vec<StoreCommand> {
        self.push_focused(JournalEntry::new(DateKey::today(), text))
    }

    fn push_focused(&mut self, entry: JournalEntry) -> Vec<StoreCommand> {
        self.focused_entry_id = Some(entry.id);
        self.entries.push(entry.clone());
        vec![StoreCommand::Create(entry)]
    }

    /// Replace an entry's text and refresh its update timestamp.
    pub fn edit_text(&mut self, id: &EntryId, text: impl Into<String>) -> Vec<StoreCommand> {
        let Some(entry) = self.entries.iter_mut().find(|entry| entry.id == *id) else {
            return Vec::new();
        };

        let changes = FieldChanges::text(text, unix_millis_now().max(entry.updated_at));
        entry.apply_changes(&changes);
        vec![StoreCommand::Update { id: *id, changes }]
    }

    /// Remove one entry in place, keeping the order of the rest.
    pub fn delete_entry(&mut self, id: &EntryId) -> Vec<StoreCommand> {
        let Some(position) = self.entries.iter().position(|entry| entry.id == *id) else {
            return Vec::new();
        };

        self.entries.remove(position);
        self.selected_ids.remove(id);
        if self.focused_entry_id == Some(*id) {
            self.focused_entry_id = None;
        }
        vec![StoreCommand::Delete(*id)]
    }

    pub fn toggle_hidden(&mut self, id: &EntryId) -> Vec<StoreCommand> {
        let Some(entry) = self.entries.iter_mut().find(|entry| entry.id == *id) else {
            return Vec::new();
        };

        entry.hidden = !entry.hidden;
        vec![StoreCommand::Update {
            id: *id,
            changes: FieldChanges::hidden(entry.hidden),
        }]
    }

    /// Add or remove an id from the selection.
    ///
    /// Ignored outside select mode so that a browsing list never carries a
    /// selection.
    pub fn toggle_select(&mut self, id: &EntryId) {
        if !self.in_select_mode || !self.contains(id) {
            return;
        }
        if !self.selected_ids.remove(id) {
            self.selected_ids.insert(*id);
        }
    }

    /// Enter select mode staging `operation`. `Nothing` is ignored.
    pub fn begin_bulk_op(&mut self, operation: BulkOperation) {
        if operation == BulkOperation::Nothing {
            return;
        }
        self.pending_bulk_op = operation;
        self.in_select_mode = true;
    }

    /// Leave select mode without touching any entry.
    pub fn exit_select_mode(&mut self) {
        self.in_select_mode = false;
        self.selected_ids.clear();
        self.pending_bulk_op = BulkOperation::Nothing;
    }

    /// Run the staged operation on the selection, then return to browsing.
    ///
    /// Hide flips each selected entry's flag independently, so an already
    /// hidden entry becomes visible again.
    pub fn apply_bulk_op(&mut self) -> Vec<StoreCommand> {
        if !self.in_select_mode {
            return Vec::new();
        }

        let commands = match self.pending_bulk_op {
            BulkOperation::Delete => self.delete_selected(),
            BulkOperation::Hide => self.toggle_hidden_selected(),
            BulkOperation::Nothing => Vec::new(),
        };

        self.exit_select_mode();
        commands
    }

    fn delete_selected(&mut self) -> Vec<StoreCommand> {
        if self.selected_ids.is_empty() {
            return Vec::new();
        }

        let selected = &self.selected_ids;
        self.entries.retain(|entry| !selected.contains(&entry.id));
        if self
            .focused_entry_id
            .is_some_and(|id| self.selected_ids.contains(&id))
        {
            self.focused_entry_id = None;
        }

        vec![StoreCommand::BatchDelete(
            self.selected_ids.iter().copied().collect(),
        )]
    }

    fn toggle_hidden_selected(&mut self) -> Vec<StoreCommand> {
        let mut now_hidden = Vec::new();
        let mut now_visible = Vec::new();

        for entry in &mut self.entries {
            if !self.selected_ids.contains(&entry.id) {
                continue;
            }
            entry.hidden = !entry.hidden;
            if entry.hidden {
                now_hidden.push(entry.id);
            } else {
                now_visible.push(entry.id);
            }
        }

        [(now_hidden, true), (now_visible, false)]
            .into_iter()
            .filter(|(ids, _)| !ids.is_empty())
            .map(|(ids, hidden)| StoreCommand::BatchUpdate {
                ids,
                changes: FieldChanges::hidden(hidden),
            })
            .collect()
    }

    pub fn clear_focus(&mut self) {
        self.focused_entry_id = None;
    }

    /// Replace the list with a store snapshot, never merging.
    pub fn replace_entries(&mut self, entries: Vec<JournalEntry>) {
        self.entries = entries;
        let entries = &self.entries;
        self.selected_ids
            .retain(|id| entries.iter().any(|entry| entry.id == *id));
    }

    /// Switch to another day; its entries arrive with the next snapshot.
    pub fn observe(&mut self, date: DateKey) {
        self.date = date;
        self.entries.clear();
        self.exit_select_mode();
    }
}

/// Reducer form: consume a state and an action, return the next state.
#[must_use]
pub fn reduce(
    mut state: EntryListState,
    action: EntryAction,
) -> (EntryListState, Vec<StoreCommand>) {
    let commands = state.apply(action);
    (state, commands)
}
