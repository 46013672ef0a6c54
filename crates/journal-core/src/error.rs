//! Error types for journal-core

use thiserror::Error;

/// Result type alias using journal-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in journal-core operations
///
/// The calendar and the entry list reducer never produce these; only the
/// store, configuration, and controller layers do.
#[derive(Error, Debug)]
pub enum Error {
    /// Database error
    #[error("Database error: {0}")]
    Database(String),

    /// `SQLite` error
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Entry not found
    #[error("Entry not found: {0}")]
    NotFound(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// The entry list controller task is no longer running
    #[error("Entry list controller has shut down")]
    ControllerClosed,
}
