//! Journal entry records and the JSON codec for the entry list.

use crate::ids::EntryId;
use crate::Result;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A single journal entry.
///
/// Entries only ever exist in plaintext inside an unlocked session; the
/// persisted form is the encrypted JSON array produced by
/// [`entries_to_json`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: EntryId,
    /// Calendar day the entry is filed under (not the creation instant).
    pub date: NaiveDate,
    pub title: Option<String>,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl JournalEntry {
    /// Creates a new entry dated `date` with a fresh time-ordered id.
    #[must_use]
    pub fn new(date: NaiveDate, title: Option<String>, body: String) -> Self {
        let now = Utc::now();
        Self {
            id: EntryId::new(),
            date,
            title,
            body,
            created_at: now,
            updated_at: now,
        }
    }

    /// Marks the entry as modified now.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Serializes the entry list to the JSON array form stored inside the
/// encrypted blob.
pub fn entries_to_json(entries: &[JournalEntry]) -> Result<String> {
    Ok(serde_json::to_string(entries)?)
}

/// Parses an entry list from decrypted JSON, leniently.
///
/// Damaged payloads never fail: text that is not JSON or not an array
/// yields an empty list, and array items that do not deserialize as
/// entries are skipped.
#[must_use]
pub fn entries_from_json(json: &str) -> Vec<JournalEntry> {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(json) else {
        return Vec::new();
    };
    let Some(items) = value.as_array() else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| serde_json::from_value(item.clone()).ok())
        .collect()
}

/// Sorts entries for display: newest day first, ties broken by creation
/// time (newest first).
pub fn sort_for_display(entries: &mut [JournalEntry]) {
    entries.sort_by(|a, b| {
        b.date
            .cmp(&a.date)
            .then_with(|| b.created_at.cmp(&a.created_at))
    });
}
