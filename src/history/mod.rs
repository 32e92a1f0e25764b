//! Analysis history and aggregate stats
//!
//! - `History` - newest-first list capped to the most recent entries
//! - `AnalyticsStore` - history + stats behind one lock, persisted as JSON
//! - `paths` - where the JSON files live

pub mod paths;
mod store;

pub use store::{AnalyticsSnapshot, AnalyticsStore, Recorded, StoreError};

use crate::models::{HistoryEntry, ScoreResult};
use chrono::Utc;
use uuid::Uuid;

/// Default number of entries kept
pub const DEFAULT_HISTORY_LIMIT: usize = 20;

/// Newest-first analysis history, capped to `limit` entries
#[derive(Debug, Clone, PartialEq)]
pub struct History {
    entries: Vec<HistoryEntry>,
    limit: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::with_limit(DEFAULT_HISTORY_LIMIT)
    }
}

impl History {
    pub fn with_limit(limit: usize) -> Self {
        Self {
            entries: Vec::new(),
            limit: limit.max(1),
        }
    }

    /// Rebuild from stored entries, trimming to the limit
    pub fn from_entries(mut entries: Vec<HistoryEntry>, limit: usize) -> Self {
        let limit = limit.max(1);
        entries.truncate(limit);
        Self { entries, limit }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Insert a result at the front, dropping the oldest beyond the limit
    pub fn append(&mut self, result: ScoreResult) -> &HistoryEntry {
        let entry = HistoryEntry {
            id: Uuid::new_v4().to_string(),
            result,
            timestamp: Utc::now(),
        };
        self.entries.insert(0, entry);
        self.entries.truncate(self.limit);
        &self.entries[0]
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// All entries, newest first
    pub fn all(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// 1-indexed lookup (1 = newest)
    pub fn get(&self, index: usize) -> Option<&HistoryEntry> {
        index.checked_sub(1).and_then(|i| self.entries.get(i))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
