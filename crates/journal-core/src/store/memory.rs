//! In-process entry store.

use std::sync::Arc;

use tokio::sync::{watch, Mutex};

use super::EntryStore;
use crate::error::{Error, Result};
use crate::models::{DateKey, EntryId, FieldChanges, JournalEntry};

/// Entry store kept entirely in memory, in insertion order.
///
/// Clones share the same documents.
#[derive(Clone)]
pub struct InMemoryEntryStore {
    entries: Arc<Mutex<Vec<JournalEntry>>>,
    revision: Arc<watch::Sender<u64>>,
}

impl InMemoryEntryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::with_entries(Vec::new())
    }

    /// Seed the store without going through individual creates.
    #[must_use]
    pub fn with_entries(entries: Vec<JournalEntry>) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            entries: Arc::new(Mutex::new(entries)),
            revision: Arc::new(revision),
        }
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }

    fn bump(&self) {
        self.revision.send_modify(|revision| *revision += 1);
    }
}

impl Default for InMemoryEntryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EntryStore for InMemoryEntryStore {
    async fn fetch(&self, date: DateKey) -> Result<Vec<JournalEntry>> {
        let mut entries = self
            .entries
            .lock()
            .await
            .iter()
            .filter(|entry| entry.date == date)
            .cloned()
            .collect::<Vec<_>>();
        entries.sort_by_key(|entry| entry.created_at);
        Ok(entries)
    }

    async fn get(&self, id: EntryId) -> Result<Option<JournalEntry>> {
        Ok(self
            .entries
            .lock()
            .await
            .iter()
            .find(|entry| entry.id == id)
            .cloned())
    }

    async fn create(&self, entry: JournalEntry) -> Result<()> {
        {
            let mut entries = self.entries.lock().await;
            match entries.iter_mut().find(|existing| existing.id == entry.id) {
                Some(existing) => *existing = entry,
                None => entries.push(entry),
            }
        }
        self.bump();
        Ok(())
    }

    async fn update(&self, id: EntryId, changes: FieldChanges) -> Result<()> {
        {
            let mut entries = self.entries.lock().await;
            let entry = entries
                .iter_mut()
                .find(|entry| entry.id == id)
                .ok_or_else(|| Error::NotFound(id.to_string()))?;
            entry.apply_changes(&changes);
        }
        self.bump();
        Ok(())
    }

    async fn delete(&self, id: EntryId) -> Result<()> {
        self.entries.lock().await.retain(|entry| entry.id != id);
        self.bump();
        Ok(())
    }

    async fn batch_update(&self, ids: Vec<EntryId>, changes: FieldChanges) -> Result<()> {
        {
            let mut entries = self.entries.lock().await;
            for entry in entries.iter_mut().filter(|entry| ids.contains(&entry.id)) {
                entry.apply_changes(&changes);
            }
        }
        self.bump();
        Ok(())
    }

    async fn batch_delete(&self, ids: Vec<EntryId>) -> Result<()> {
        self.entries
            .lock()
            .await
            .retain(|entry| !ids.contains(&entry.id));
        self.bump();
        Ok(())
    }

    fn revisions(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> DateKey {
        DateKey::from_ymd(2024, 7, d).unwrap()
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let store = InMemoryEntryStore::new();
        let entry = JournalEntry::new(day(1), "Hello");
        store.create(entry.clone()).await.unwrap();

        assert_eq!(store.get(entry.id).await.unwrap(), Some(entry));
        assert_eq!(store.get(EntryId::new()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_fetch_scopes_by_date_and_orders_by_creation() {
        let mut late = JournalEntry::new(day(1), "late");
        late.created_at = 200;
        let mut early = JournalEntry::new(day(1), "early");
        early.created_at = 100;
        let other_day = JournalEntry::new(day(2), "other");
        let store = InMemoryEntryStore::with_entries(vec![late, other_day, early]);

        let texts = store
            .fetch(day(1))
            .await
            .unwrap()
            .into_iter()
            .map(|entry| entry.text)
            .collect::<Vec<_>>();
        assert_eq!(texts, vec!["early", "late"]);
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let store = InMemoryEntryStore::new();
        let result = store.update(EntryId::new(), FieldChanges::hidden(true)).await;
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn test_batch_operations_skip_unknown_ids() {
        let a = JournalEntry::new(day(3), "a");
        let b = JournalEntry::new(day(3), "b");
        let store = InMemoryEntryStore::with_entries(vec![a.clone(), b.clone()]);

        store
            .batch_update(vec![a.id, EntryId::new()], FieldChanges::hidden(true))
            .await
            .unwrap();
        assert!(store.get(a.id).await.unwrap().unwrap().hidden);
        assert!(!store.get(b.id).await.unwrap().unwrap().hidden);

        store.batch_delete(vec![b.id, EntryId::new()]).await.unwrap();
        assert_eq!(store.len().await, 1);

        store.delete(a.id).await.unwrap();
        store.delete(a.id).await.unwrap();
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_writes_bump_revision() {
        let store = InMemoryEntryStore::new();
        let mut revisions = store.revisions();
        store.create(JournalEntry::new(day(4), "x")).await.unwrap();
        assert!(revisions.has_changed().unwrap());
        assert_eq!(*revisions.borrow_and_update(), 1);
    }
}
