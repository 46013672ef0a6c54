//! Entry storage behind a document-store style interface.
//!
//! Stores are keyed by user and partitioned by [`DateKey`]. Writes are
//! fire-and-forget from the entry list's point of view; readers learn about
//! them through a [`Subscription`], which yields full snapshots of one day.

mod memory;
mod migrations;
mod sqlite;

use std::future::Future;

use tokio::sync::watch;

use crate::error::Result;
use crate::models::{DateKey, EntryId, FieldChanges, JournalEntry};
use crate::state::StoreCommand;

pub use memory::InMemoryEntryStore;
pub use sqlite::SqliteEntryStore;

/// Trait for journal entry storage operations
pub trait EntryStore: Clone + Send + Sync + 'static {
    /// List one day's entries ordered by creation time
    fn fetch(&self, date: DateKey) -> impl Future<Output = Result<Vec<JournalEntry>>> + Send;

    /// Get an entry by ID
    fn get(&self, id: EntryId) -> impl Future<Output = Result<Option<JournalEntry>>> + Send;

    /// Create an entry, replacing any stored entry with the same ID
    fn create(&self, entry: JournalEntry) -> impl Future<Output = Result<()>> + Send;

    /// Apply a partial update; fails with `NotFound` for unknown IDs
    fn update(&self, id: EntryId, changes: FieldChanges)
        -> impl Future<Output = Result<()>> + Send;

    /// Delete an entry; deleting an unknown ID succeeds
    fn delete(&self, id: EntryId) -> impl Future<Output = Result<()>> + Send;

    /// Apply the same partial update to several entries, skipping unknown IDs
    fn batch_update(
        &self,
        ids: Vec<EntryId>,
        changes: FieldChanges,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Delete several entries
    fn batch_delete(&self, ids: Vec<EntryId>) -> impl Future<Output = Result<()>> + Send;

    /// Revision counter bumped after every successful write
    fn revisions(&self) -> watch::Receiver<u64>;

    /// Follow one day's entries as a stream of full snapshots
    fn subscribe(&self, date: DateKey) -> Subscription<Self> {
        Subscription::new(self.clone(), date)
    }
}

/// Lazy, restartable sequence of full-list snapshots for one day.
///
/// The first call to [`Subscription::next`] yields the current snapshot;
/// later calls wait for the next write. `next` is cancel-safe, so it can be
/// polled from `tokio::select!`.
pub struct Subscription<S: EntryStore> {
    store: S,
    date: DateKey,
    revisions: watch::Receiver<u64>,
    stale: bool,
}

impl<S: EntryStore> Subscription<S> {
    pub fn new(store: S, date: DateKey) -> Self {
        let revisions = store.revisions();
        Self {
            store,
            date,
            revisions,
            stale: true,
        }
    }

    pub const fn date(&self) -> DateKey {
        self.date
    }

    /// Wait for the next snapshot.
    ///
    /// Returns `None` once the store has gone away. A failed fetch is logged
    /// and skipped; the subscription keeps waiting for the next write.
    pub async fn next(&mut self) -> Option<Vec<JournalEntry>> {
        loop {
            if !self.stale {
                self.revisions.changed().await.ok()?;
                self.stale = true;
            }

            match self.store.fetch(self.date).await {
                Ok(entries) => {
                    self.stale = false;
                    return Some(entries);
                }
                Err(error) => {
                    tracing::warn!("Snapshot fetch for {} failed: {}", self.date, error);
                    self.stale = false;
                }
            }
        }
    }
}

/// Perform one store write produced by the entry list.
pub async fn execute<S: EntryStore>(store: &S, command: StoreCommand) -> Result<()> {
    tracing::debug!(?command, "executing store command");

    match command {
        StoreCommand::Create(entry) => store.create(entry).await,
        StoreCommand::Update { id, changes } => store.update(id, changes).await,
        StoreCommand::Delete(id) => store.delete(id).await,
        StoreCommand::BatchUpdate { ids, changes } => store.batch_update(ids, changes).await,
        StoreCommand::BatchDelete(ids) => store.batch_delete(ids).await,
    }
}

/// Perform several writes in order, stopping at the first failure.
pub async fn execute_all<S: EntryStore>(store: &S, commands: Vec<StoreCommand>) -> Result<()> {
    for command in commands {
        execute(store, command).await?;
    }
    Ok(())
}
