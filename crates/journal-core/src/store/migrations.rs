//! Schema migrations for the `SQLite` entry store

use rusqlite::{Connection, OptionalExtension};

use crate::error::Result;

/// Current schema version
pub const CURRENT_VERSION: i32 = 3;

/// Run all pending migrations
pub fn run(conn: &mut Connection) -> Result<()> {
    let version = get_version(conn)?;

    if version < 1 {
        migrate_v1(conn)?;
    }
    if version < 2 {
        migrate_v2(conn)?;
    }
    if version < 3 {
        migrate_v3(conn)?;
    }

    if version < CURRENT_VERSION {
        tracing::info!(
            "Migrated entry store schema from v{} to v{}",
            version,
            CURRENT_VERSION
        );
    }

    Ok(())
}

/// Get the current schema version
pub fn get_version(conn: &Connection) -> Result<i32> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
        [],
        |row| row.get(0),
    )?;

    if !exists {
        return Ok(0);
    }

    let version = conn
        .query_row("SELECT MAX(version) FROM schema_version", [], |row| {
            row.get::<_, Option<i32>>(0)
        })
        .optional()?
        .flatten()
        .unwrap_or(0);

    Ok(version)
}

/// Migration to version 1: entries table
fn migrate_v1(conn: &mut Connection) -> Result<()> {
    let tx = conn.transaction()?;
    tx.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        );
        CREATE TABLE IF NOT EXISTS entries (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL,
            date TEXT NOT NULL,
            text TEXT NOT NULL DEFAULT '',
            hidden INTEGER NOT NULL DEFAULT 0,
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL
        );
        INSERT INTO schema_version (version) VALUES (1);",
    )?;
    tx.commit()?;
    Ok(())
}

/// Migration to version 2: index for per-user, per-day listing
fn migrate_v2(conn: &mut Connection) -> Result<()> {
    let tx = conn.transaction()?;
    tx.execute_batch(
        "CREATE INDEX IF NOT EXISTS idx_entries_user_date
            ON entries(user_id, date, created_at);
        INSERT INTO schema_version (version) VALUES (2);",
    )?;
    tx.commit()?;
    Ok(())
}

/// Migration to version 3: entry ids are unique per user, not globally
fn migrate_v3(conn: &mut Connection) -> Result<()> {
    let tx = conn.transaction()?;
    tx.execute_batch(
        "CREATE TABLE entries_v3 (
            id TEXT NOT NULL,
            user_id TEXT NOT NULL,
            date TEXT NOT NULL,
            text TEXT NOT NULL DEFAULT '',
            hidden INTEGER NOT NULL DEFAULT 0,
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL,
            PRIMARY KEY (user_id, id)
        );
        INSERT INTO entries_v3 (id, user_id, date, text, hidden, created_at, updated_at)
            SELECT id, user_id, date, text, hidden, created_at, updated_at
            FROM entries ORDER BY rowid;
        DROP TABLE entries;
        ALTER TABLE entries_v3 RENAME TO entries;
        CREATE INDEX IF NOT EXISTS idx_entries_user_date
            ON entries(user_id, date, created_at);
        INSERT INTO schema_version (version) VALUES (3);",
    )?;
    tx.commit()?;
    Ok(())
}
