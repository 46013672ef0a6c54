//! Journal entry model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::DateKey;
use crate::util::unix_millis_now;

/// A unique identifier for an entry, using UUID v7 (time-sortable)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntryId(Uuid);

impl EntryId {
    /// Create a new unique entry ID using UUID v7
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Get the string representation of this ID
    #[must_use]
    pub fn as_str(&self) -> String {
        self.0.to_string()
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EntryId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// A dated journal entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Unique identifier, assigned at creation
    pub id: EntryId,
    /// The day this entry belongs to
    pub date: DateKey,
    /// Creation timestamp (Unix ms)
    pub created_at: i64,
    /// Last text update timestamp (Unix ms)
    pub updated_at: i64,
    /// Plain text content
    pub text: String,
    /// Hidden entries stay stored but are left out of default listings
    pub hidden: bool,
}

impl JournalEntry {
    /// Create a new visible entry for `date` with the given text
    #[must_use]
    pub fn new(date: DateKey, text: impl Into<String>) -> Self {
        let now = unix_millis_now();
        Self {
            id: EntryId::new(),
            date,
            created_at: now,
            updated_at: now,
            text: text.into(),
            hidden: false,
        }
    }

    /// Get first line as title preview, truncated to `max_len` characters
    #[must_use]
    pub fn title_preview(&self, max_len: usize) -> String {
        self.text
            .lines()
            .next()
            .unwrap_or("")
            .chars()
            .take(max_len)
            .collect()
    }

    /// Check if entry text is empty (whitespace-only counts as empty)
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Apply a partial update in place
    pub fn apply_changes(&mut self, changes: &FieldChanges) {
        if let Some(text) = &changes.text {
            self.text.clone_from(text);
        }
        if let Some(hidden) = changes.hidden {
            self.hidden = hidden;
        }
        if let Some(updated_at) = changes.updated_at {
            self.updated_at = updated_at;
        }
    }
}

/// Partial field update sent to an entry store
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldChanges {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hidden: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<i64>,
}

impl FieldChanges {
    /// New text plus a refreshed update timestamp
    #[must_use]
    pub fn text(text: impl Into<String>, updated_at: i64) -> Self {
        Self {
            text: Some(text.into()),
            updated_at: Some(updated_at),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn hidden(hidden: bool) -> Self {
        Self {
            hidden: Some(hidden),
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.text.is_none() && self.hidden.is_none() && self.updated_at.is_none()
    }
}

/// Decode quick-note text that arrived URL-encoded.
///
/// Text that is not valid percent-encoding is returned unchanged.
#[must_use]
pub fn decode_quick_note(raw: &str) -> String {
    let plus_decoded = raw.replace('+', " ");
    urlencoding::decode(&plus_decoded).map_or_else(|_| raw.to_string(), |text| text.into_owned())
}
