//! `SQLite`-backed entry store

use std::path::Path;
use std::sync::{Arc, Mutex};

use rusqlite::types::Type;
use rusqlite::{params, Connection, Row};
use tokio::sync::watch;

use super::{migrations, EntryStore};
use crate::config::validate_user_id;
use crate::error::{Error, Result};
use crate::models::{DateKey, EntryId, FieldChanges, JournalEntry};

const ENTRY_COLUMNS: &str = "id, date, created_at, updated_at, text, hidden";

/// Entry store persisted in a single `SQLite` file, scoped to one user.
///
/// Clones share the connection and the revision counter. Queries run on
/// tokio's blocking pool so they never stall a runtime worker.
#[derive(Clone)]
pub struct SqliteEntryStore {
    conn: Arc<Mutex<Connection>>,
    user_id: Arc<str>,
    revision: Arc<watch::Sender<u64>>,
}

impl SqliteEntryStore {
    /// Open or create the database at `path`, creating parent directories
    pub fn open(path: impl AsRef<Path>, user_id: &str) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        tracing::info!("Opening entry store at {}", path.display());
        let conn = Connection::open(path)?;
        Self::from_connection(conn, user_id)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory(user_id: &str) -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?, user_id)
    }

    fn from_connection(mut conn: Connection, user_id: &str) -> Result<Self> {
        validate_user_id(user_id)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        migrations::run(&mut conn)?;

        let (revision, _) = watch::channel(0);
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            user_id: Arc::from(user_id),
            revision: Arc::new(revision),
        })
    }

    /// The same database seen as a different user
    pub fn for_user(&self, user_id: &str) -> Result<Self> {
        validate_user_id(user_id)?;
        Ok(Self {
            conn: Arc::clone(&self.conn),
            user_id: Arc::from(user_id),
            revision: Arc::clone(&self.revision),
        })
    }

    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Every entry of this user, oldest day first
    pub async fn list_all(&self) -> Result<Vec<JournalEntry>> {
        self.with_conn(|conn, user_id| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {ENTRY_COLUMNS} FROM entries
                 WHERE user_id = ?
                 ORDER BY date, created_at, rowid"
            ))?;
            let entries = stmt
                .query_map(params![user_id], parse_entry)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(entries)
        })
        .await
    }

    /// Run `f` against the connection on the blocking pool.
    async fn with_conn<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection, &str) -> Result<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        let user_id = Arc::clone(&self.user_id);

        tokio::task::spawn_blocking(move || {
            let mut conn = conn
                .lock()
                .map_err(|_| Error::Database("connection lock poisoned".to_string()))?;
            f(&mut conn, &user_id)
        })
        .await
        .map_err(|error| Error::Database(format!("store task failed: {error}")))?
    }

    fn bump(&self) {
        self.revision.send_modify(|revision| *revision += 1);
    }
}

fn parse_entry(row: &Row<'_>) -> rusqlite::Result<JournalEntry> {
    let id: String = row.get(0)?;
    let date: String = row.get(1)?;

    Ok(JournalEntry {
        id: id.parse().map_err(|error| {
            rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(error))
        })?,
        date: date.parse::<DateKey>().map_err(|error| {
            rusqlite::Error::FromSqlConversionFailure(1, Type::Text, Box::new(error))
        })?,
        created_at: row.get(2)?,
        updated_at: row.get(3)?,
        text: row.get(4)?,
        hidden: row.get(5)?,
    })
}

fn update_entry(
    conn: &Connection,
    user_id: &str,
    id: EntryId,
    changes: &FieldChanges,
) -> Result<usize> {
    let changed = conn.execute(
        "UPDATE entries
         SET text = COALESCE(?1, text),
             hidden = COALESCE(?2, hidden),
             updated_at = COALESCE(?3, updated_at)
         WHERE user_id = ?4 AND id = ?5",
        params![
            changes.text.as_deref(),
            changes.hidden,
            changes.updated_at,
            user_id,
            id.as_str()
        ],
    )?;
    Ok(changed)
}

impl EntryStore for SqliteEntryStore {
    async fn fetch(&self, date: DateKey) -> Result<Vec<JournalEntry>> {
        self.with_conn(move |conn, user_id| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {ENTRY_COLUMNS} FROM entries
                 WHERE user_id = ? AND date = ?
                 ORDER BY created_at, rowid"
            ))?;
            let entries = stmt
                .query_map(params![user_id, date.to_string()], parse_entry)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(entries)
        })
        .await
    }

    async fn get(&self, id: EntryId) -> Result<Option<JournalEntry>> {
        self.with_conn(move |conn, user_id| {
            let result = conn.query_row(
                &format!("SELECT {ENTRY_COLUMNS} FROM entries WHERE user_id = ? AND id = ?"),
                params![user_id, id.as_str()],
                parse_entry,
            );

            match result {
                Ok(entry) => Ok(Some(entry)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(error) => Err(error.into()),
            }
        })
        .await
    }

    async fn create(&self, entry: JournalEntry) -> Result<()> {
        self.with_conn(move |conn, user_id| {
            conn.execute(
                "INSERT INTO entries (id, user_id, date, text, hidden, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                 ON CONFLICT(user_id, id) DO UPDATE SET
                     date = excluded.date,
                     text = excluded.text,
                     hidden = excluded.hidden,
                     created_at = excluded.created_at,
                     updated_at = excluded.updated_at",
                params![
                    entry.id.as_str(),
                    user_id,
                    entry.date.to_string(),
                    entry.text,
                    entry.hidden,
                    entry.created_at,
                    entry.updated_at
                ],
            )?;
            Ok(())
        })
        .await?;
        self.bump();
        Ok(())
    }

    async fn update(&self, id: EntryId, changes: FieldChanges) -> Result<()> {
        let changed = self
            .with_conn(move |conn, user_id| update_entry(conn, user_id, id, &changes))
            .await?;
        if changed == 0 {
            return Err(Error::NotFound(id.to_string()));
        }
        self.bump();
        Ok(())
    }

    async fn delete(&self, id: EntryId) -> Result<()> {
        self.with_conn(move |conn, user_id| {
            conn.execute(
                "DELETE FROM entries WHERE user_id = ? AND id = ?",
                params![user_id, id.as_str()],
            )?;
            Ok(())
        })
        .await?;
        self.bump();
        Ok(())
    }

    async fn batch_update(&self, ids: Vec<EntryId>, changes: FieldChanges) -> Result<()> {
        self.with_conn(move |conn, user_id| {
            let tx = conn.transaction()?;
            for id in ids {
                update_entry(&tx, user_id, id, &changes)?;
            }
            tx.commit()?;
            Ok(())
        })
        .await?;
        self.bump();
        Ok(())
    }

    async fn batch_delete(&self, ids: Vec<EntryId>) -> Result<()> {
        self.with_conn(move |conn, user_id| {
            let tx = conn.transaction()?;
            for id in ids {
                tx.execute(
                    "DELETE FROM entries WHERE user_id = ? AND id = ?",
                    params![user_id, id.as_str()],
                )?;
            }
            tx.commit()?;
            Ok(())
        })
        .await?;
        self.bump();
        Ok(())
    }

    fn revisions(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }
}
