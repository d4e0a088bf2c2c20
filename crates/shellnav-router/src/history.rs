//! Session history
//!
//! Browser-style history stack: pushing truncates forward entries, back and
//! forward move the cursor and yield a popstate event carrying the state
//! stored with the entry (if any).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::path::CanonicalPath;

/// State attached to a pushed entry: the swapped-in fragment and its path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryState {
    pub html: String,
    pub href: CanonicalPath,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: String,
    /// Location path as shown in the address bar, e.g. `/pages/about.html`
    pub url: String,
    pub state: Option<HistoryState>,
    pub recorded_at: DateTime<Utc>,
}

impl HistoryEntry {
    fn new(url: String, state: Option<HistoryState>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            url,
            state,
            recorded_at: Utc::now(),
        }
    }
}

/// Fired when the cursor moves to another entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopStateEvent {
    pub state: Option<HistoryState>,
    /// Location path after the move
    pub location: String,
}

pub struct SessionHistory {
    entries: Vec<HistoryEntry>,
    cursor: usize,
}

impl SessionHistory {
    /// History with a single stateless entry for the initial location.
    pub fn new(initial_location: impl Into<String>) -> Self {
        Self {
            entries: vec![HistoryEntry::new(initial_location.into(), None)],
            cursor: 0,
        }
    }

    /// Push a new entry after the current one, dropping any forward entries.
    pub fn push_state(&mut self, state: HistoryState, url: impl Into<String>) {
        self.entries.truncate(self.cursor + 1);
        let entry = HistoryEntry::new(url.into(), Some(state));
        tracing::debug!(entry_id = %entry.id, url = %entry.url, "Pushed history entry");
        self.entries.push(entry);
        self.cursor = self.entries.len() - 1;
    }

    pub fn back(&mut self) -> Option<PopStateEvent> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        Some(self.pop_event())
    }

    pub fn forward(&mut self) -> Option<PopStateEvent> {
        if self.cursor + 1 >= self.entries.len() {
            return None;
        }
        self.cursor += 1;
        Some(self.pop_event())
    }

    pub fn current(&self) -> &HistoryEntry {
        &self.entries[self.cursor]
    }

    pub fn location(&self) -> &str {
        &self.current().url
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    fn pop_event(&self) -> PopStateEvent {
        let entry = self.current();
        PopStateEvent {
            state: entry.state.clone(),
            location: entry.url.clone(),
        }
    }
}
