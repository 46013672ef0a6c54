//! Journal configuration.
//!
//! A small JSON document shared by every front end. It names the user whose
//! entries are shown and, optionally, where the entry database lives.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::util::{compact_text, normalize_text_option};

/// User id used when nothing else is configured.
pub const DEFAULT_USER_ID: &str = "local";

/// Environment variable overriding [`JournalConfig::user_id`].
pub const USER_ENV: &str = "JOURNAL_USER";

/// Environment variable overriding [`JournalConfig::database_path`].
pub const DB_PATH_ENV: &str = "JOURNAL_DB_PATH";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct JournalConfig {
    #[serde(default = "default_user_id")]
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_path: Option<PathBuf>,
    /// `tracing` filter directive, e.g. `journal=debug`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_filter: Option<String>,
}

fn default_user_id() -> String {
    DEFAULT_USER_ID.to_string()
}

impl Default for JournalConfig {
    fn default() -> Self {
        Self {
            user_id: default_user_id(),
            database_path: None,
            log_filter: None,
        }
    }
}

impl JournalConfig {
    /// Parse and validate a config document.
    pub fn from_json(payload: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(payload).map_err(|error| {
            Error::Config(format!(
                "invalid config JSON: {}",
                compact_text(&error.to_string())
            ))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load the config file at `path`; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(payload) => {
                tracing::debug!("Loaded config from {}", path.display());
                Self::from_json(&payload)
            }
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(error) => Err(error.into()),
        }
    }

    /// Write the config file, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        self.validate()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let payload = serde_json::to_string_pretty(self)?;
        std::fs::write(path, payload)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        validate_user_id(&self.user_id)?;
        if self
            .database_path
            .as_ref()
            .is_some_and(|path| path.as_os_str().is_empty())
        {
            return Err(Error::Config("database_path must not be empty".to_string()));
        }
        Ok(())
    }

    /// Apply explicit overrides; blank values are ignored.
    #[must_use]
    pub fn with_overrides(
        mut self,
        user_id: Option<String>,
        database_path: Option<String>,
    ) -> Self {
        if let Some(user_id) = normalize_text_option(user_id) {
            self.user_id = user_id;
        }
        if let Some(path) = normalize_text_option(database_path) {
            self.database_path = Some(PathBuf::from(path));
        }
        self
    }

    /// Apply `JOURNAL_USER` and `JOURNAL_DB_PATH` from the environment.
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(std::env::var(USER_ENV).ok(), std::env::var(DB_PATH_ENV).ok())
    }
}

/// A user id partitions stored entries and must be a single path segment.
pub fn validate_user_id(user_id: &str) -> Result<()> {
    if user_id.trim().is_empty() {
        return Err(Error::Config("user_id must not be empty".to_string()));
    }
    if user_id.contains('/') {
        return Err(Error::Config(format!(
            "user_id '{user_id}' must not contain '/'"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_document_uses_defaults() {
        let config = JournalConfig::from_json("{}").unwrap();
        assert_eq!(config, JournalConfig::default());
        assert_eq!(config.user_id, "local");
    }

    #[test]
    fn parses_all_fields() {
        let config = JournalConfig::from_json(
            r#"{"user_id":"sam","database_path":"/tmp/j.db","log_filter":"journal=debug"}"#,
        )
        .unwrap();
        assert_eq!(
            config,
            JournalConfig {
                user_id: "sam".to_string(),
                database_path: Some(PathBuf::from("/tmp/j.db")),
                log_filter: Some("journal=debug".to_string()),
            }
        );
    }

    #[test]
    fn rejects_unknown_fields_and_bad_users() {
        assert!(JournalConfig::from_json(r#"{"theme":"dark"}"#).is_err());
        assert!(JournalConfig::from_json(r#"{"user_id":""}"#).is_err());
        assert!(JournalConfig::from_json(r#"{"user_id":"a/b"}"#).is_err());
        assert!(JournalConfig::from_json(r#"{"database_path":""}"#).is_err());
    }

    #[test]
    fn overrides_skip_blank_values() {
        let config = JournalConfig::default()
            .with_overrides(Some("  ".to_string()), Some(" /data/j.db ".to_string()));
        assert_eq!(config.user_id, "local");
        assert_eq!(config.database_path, Some(PathBuf::from("/data/j.db")));

        let config = config.with_overrides(Some("kim".to_string()), None);
        assert_eq!(config.user_id, "kim");
        assert_eq!(config.database_path, Some(PathBuf::from("/data/j.db")));
    }

    #[test]
    fn load_missing_file_is_default_and_save_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("journal").join("config.json");
        assert_eq!(JournalConfig::load(&path).unwrap(), JournalConfig::default());

        let config = JournalConfig::default().with_overrides(Some("pat".to_string()), None);
        config.save(&path).unwrap();
        assert_eq!(JournalConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn env_overrides_apply_user_and_database_path() {
        std::env::set_var(USER_ENV, "casey");
        std::env::set_var(DB_PATH_ENV, "/srv/journal.db");
        let config = JournalConfig::default().with_env_overrides();
        std::env::set_var(USER_ENV, "   ");
        std::env::remove_var(DB_PATH_ENV);
        let blank = JournalConfig::default().with_env_overrides();
        std::env::remove_var(USER_ENV);

        assert_eq!(config.user_id, "casey");
        assert_eq!(config.database_path, Some(PathBuf::from("/srv/journal.db")));
        assert_eq!(blank, JournalConfig::default());
    }
}
