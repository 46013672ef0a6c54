//! Background task that owns one entry list.
//!
//! The controller serializes user actions and store snapshots onto a single
//! [`EntryListState`], forwards the resulting writes to the store, and
//! publishes every new state on a watch channel.

use tokio::sync::{mpsc, watch};

use crate::error::{Error, Result};
use crate::models::{DateKey, JournalEntry};
use crate::state::{EntryAction, EntryListState};
use crate::store::{self, EntryStore, Subscription};

const COMMAND_BUFFER: usize = 32;

enum ControllerCommand {
    Dispatch(EntryAction),
    Shutdown,
}

enum Event {
    Command(Option<ControllerCommand>),
    Snapshot(Option<Vec<JournalEntry>>),
}

/// Cloneable handle to a running [`EntryListController`].
#[derive(Clone)]
pub struct EntryListHandle {
    commands: mpsc::Sender<ControllerCommand>,
    state: watch::Receiver<EntryListState>,
}

impl EntryListHandle {
    /// Queue an action for the controller.
    pub async fn dispatch(&self, action: EntryAction) -> Result<()> {
        self.commands
            .send(ControllerCommand::Dispatch(action))
            .await
            .map_err(|_| Error::ControllerClosed)
    }

    /// Switch to another day and follow its entries.
    pub async fn observe(&self, date: DateKey) -> Result<()> {
        self.dispatch(EntryAction::Observe(date)).await
    }

    /// Latest published state.
    #[must_use]
    pub fn state(&self) -> EntryListState {
        self.state.borrow().clone()
    }

    /// Receiver notified on every published state.
    #[must_use]
    pub fn watch(&self) -> watch::Receiver<EntryListState> {
        self.state.clone()
    }

    /// Ask the controller to stop after the actions already queued.
    pub async fn shutdown(&self) -> Result<()> {
        self.commands
            .send(ControllerCommand::Shutdown)
            .await
            .map_err(|_| Error::ControllerClosed)
    }

    /// Resolves once the controller task has stopped.
    pub async fn closed(&self) {
        self.commands.closed().await;
    }
}

pub struct EntryListController<S: EntryStore> {
    store: S,
    state: EntryListState,
    subscription: Option<Subscription<S>>,
    commands: mpsc::Receiver<ControllerCommand>,
    publisher: watch::Sender<EntryListState>,
}

impl<S: EntryStore> EntryListController<S> {
    /// Start a controller for `date` on the current tokio runtime.
    pub fn spawn(store: S, date: DateKey) -> EntryListHandle {
        let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
        let state = EntryListState::new(date);
        let (publisher, state_rx) = watch::channel(state.clone());

        let controller = Self {
            subscription: Some(store.subscribe(date)),
            store,
            state,
            commands: command_rx,
            publisher,
        };
        tokio::spawn(controller.run());

        EntryListHandle {
            commands: command_tx,
            state: state_rx,
        }
    }

    async fn run(mut self) {
        tracing::debug!("Entry list controller started for {}", self.state.date);

        loop {
            let event = tokio::select! {
                command = self.commands.recv() => Event::Command(command),
                snapshot = next_snapshot(&mut self.subscription) => Event::Snapshot(snapshot),
            };

            match event {
                Event::Command(Some(ControllerCommand::Dispatch(action))) => {
                    self.handle_action(action).await;
                }
                Event::Command(None | Some(ControllerCommand::Shutdown)) => break,
                Event::Snapshot(Some(entries)) => {
                    self.state.replace_entries(entries);
                    self.publish();
                }
                Event::Snapshot(None) => {
                    tracing::warn!("Entry store went away; no further snapshots");
                    self.subscription = None;
                }
            }
        }

        tracing::debug!("Entry list controller stopped for {}", self.state.date);
    }

    async fn handle_action(&mut self, action: EntryAction) {
        if let EntryAction::Observe(date) = &action {
            self.subscription = Some(self.store.subscribe(*date));
        }

        let commands = self.state.apply(action);
        self.publish();

        for command in commands {
            if let Err(error) = store::execute(&self.store, command).await {
                tracing::warn!("Store write for {} failed: {}", self.state.date, error);
            }
        }
    }

    fn publish(&self) {
        self.publisher.send_replace(self.state.clone());
    }
}

async fn next_snapshot<S: EntryStore>(
    subscription: &mut Option<Subscription<S>>,
) -> Option<Vec<JournalEntry>> {
    match subscription {
        Some(subscription) => subscription.next().await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::time::Duration;

    use tokio::time::timeout;

    use super::*;
    use crate::models::{EntryId, FieldChanges};
    use crate::state::BulkOperation;
    use crate::store::InMemoryEntryStore;

    fn day(d: u32) -> DateKey {
        DateKey::from_ymd(2025, 3, d).unwrap()
    }

    async fn wait_until(
        rx: &mut watch::Receiver<EntryListState>,
        predicate: impl FnMut(&EntryListState) -> bool,
    ) -> EntryListState {
        timeout(Duration::from_secs(2), rx.wait_for(predicate))
            .await
            .expect("state did not converge")
            .expect("controller stopped")
            .clone()
    }

    /// Store whose writes always fail.
    #[derive(Clone, Default)]
    struct OfflineStore {
        inner: InMemoryEntryStore,
    }

    impl EntryStore for OfflineStore {
        async fn fetch(&self, date: DateKey) -> Result<Vec<JournalEntry>> {
            self.inner.fetch(date).await
        }

        async fn get(&self, id: EntryId) -> Result<Option<JournalEntry>> {
            self.inner.get(id).await
        }

        async fn create(&self, _entry: JournalEntry) -> Result<()> {
            Err(Error::Database("offline".to_string()))
        }

        async fn update(&self, _id: EntryId, _changes: FieldChanges) -> Result<()> {
            Err(Error::Database("offline".to_string()))
        }

        async fn delete(&self, _id: EntryId) -> Result<()> {
            Err(Error::Database("offline".to_string()))
        }

        async fn batch_update(&self, _ids: Vec<EntryId>, _changes: FieldChanges) -> Result<()> {
            Err(Error::Database("offline".to_string()))
        }

        async fn batch_delete(&self, _ids: Vec<EntryId>) -> Result<()> {
            Err(Error::Database("offline".to_string()))
        }

        fn revisions(&self) -> watch::Receiver<u64> {
            self.inner.revisions()
        }
    }

    #[tokio::test]
    async fn initial_snapshot_is_published() {
        let store = InMemoryEntryStore::with_entries(vec![
            JournalEntry::new(day(1), "one"),
            JournalEntry::new(day(1), "two"),
            JournalEntry::new(day(2), "elsewhere"),
        ]);
        let handle = EntryListController::spawn(store, day(1));

        let mut rx = handle.watch();
        let state = wait_until(&mut rx, |state| !state.entries.is_empty()).await;
        assert_eq!(state.entries.len(), 2);
        assert_eq!(handle.state(), state);
    }

    #[tokio::test]
    async fn local_edits_converge_with_store() {
        let store = InMemoryEntryStore::new();
        let handle = EntryListController::spawn(store.clone(), day(4));
        let mut rx = handle.watch();

        handle.dispatch(EntryAction::AddEntry).await.unwrap();
        let state = wait_until(&mut rx, |state| state.focused_entry_id.is_some()).await;
        let id = state.focused_entry_id.unwrap();

        handle
            .dispatch(EntryAction::EditText {
                id,
                text: "hello".to_string(),
            })
            .await
            .unwrap();
        wait_until(&mut rx, |state| {
            state.entries.first().is_some_and(|entry| entry.text == "hello")
        })
        .await;

        let stored = timeout(Duration::from_secs(2), async {
            loop {
                let stored = store.fetch(day(4)).await.unwrap();
                if stored.first().is_some_and(|entry| entry.text == "hello") {
                    break stored;
                }
                tokio::task::yield_now().await;
            }
        })
        .await
        .unwrap();
        let state = wait_until(&mut rx, |state| state.entries == stored).await;
        assert_eq!(state.focused_entry_id, Some(id));
    }

    #[tokio::test]
    async fn observe_switches_day() {
        let store = InMemoryEntryStore::with_entries(vec![JournalEntry::new(day(8), "later")]);
        let handle = EntryListController::spawn(store, day(7));
        let mut rx = handle.watch();

        handle.observe(day(8)).await.unwrap();
        let state = wait_until(&mut rx, |state| {
            state.date == day(8) && !state.entries.is_empty()
        })
        .await;
        assert_eq!(state.entries[0].text, "later");
    }

    #[tokio::test]
    async fn failed_writes_keep_local_state() {
        let handle = EntryListController::spawn(OfflineStore::default(), day(9));
        let mut rx = handle.watch();
        // First publish is the initial (empty) snapshot.
        timeout(Duration::from_secs(2), rx.changed()).await.unwrap().unwrap();

        handle.dispatch(EntryAction::AddEntry).await.unwrap();
        let state = wait_until(&mut rx, |state| state.entries.len() == 1).await;
        let id = state.entries[0].id;

        handle.dispatch(EntryAction::ToggleHidden(id)).await.unwrap();
        let state = wait_until(&mut rx, |state| {
            state.entries.first().is_some_and(|entry| entry.hidden)
        })
        .await;
        assert_eq!(state.focused_entry_id, Some(id));
    }

    #[tokio::test]
    async fn store_deletion_prunes_selection() {
        let first = JournalEntry::new(day(11), "first");
        let second = JournalEntry::new(day(11), "second");
        let store = InMemoryEntryStore::with_entries(vec![first.clone(), second.clone()]);
        let handle = EntryListController::spawn(store.clone(), day(11));
        let mut rx = handle.watch();
        wait_until(&mut rx, |state| state.entries.len() == 2).await;

        handle
            .dispatch(EntryAction::BeginBulkOp(BulkOperation::Delete))
            .await
            .unwrap();
        handle.dispatch(EntryAction::ToggleSelect(first.id)).await.unwrap();
        handle.dispatch(EntryAction::ToggleSelect(second.id)).await.unwrap();
        wait_until(&mut rx, |state| state.selected_ids.len() == 2).await;

        store.delete(first.id).await.unwrap();
        let state = wait_until(&mut rx, |state| state.entries.len() == 1).await;

        assert!(state.in_select_mode);
        assert!(state.selected_ids.iter().all(|id| state.contains(id)));
        assert_eq!(state.selected_ids, BTreeSet::from([second.id]));
    }

    #[tokio::test]
    async fn shutdown_closes_handle() {
        let handle = EntryListController::spawn(InMemoryEntryStore::new(), day(10));
        handle.shutdown().await.unwrap();
        timeout(Duration::from_secs(2), handle.closed()).await.unwrap();

        assert!(matches!(
            handle.dispatch(EntryAction::AddEntry).await,
            Err(Error::ControllerClosed)
        ));
    }
}
