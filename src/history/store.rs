//! Persisted analytics store
//!
//! Holds the capped history and the aggregate stats behind a single lock so
//! that recording one analysis (prepend + trim + counter update) is one
//! atomic read-modify-write, even when two analyses finish at once.
//!
//! Several processes may share one data directory, so every mutation holds an
//! exclusive lock on `<data_dir>/.lock`, re-reads both files, applies the
//! change and writes both back through a uniquely named temp file and a
//! rename. A failed write never undoes the in-memory update and never fails
//! the analysis; it is logged and reported in [`Recorded`].

use super::paths::{history_path, lock_path, stats_path};
use super::History;
use crate::models::{HistoryEntry, ScoreResult, UserStats};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Errors from reading or writing the analytics files
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed data in {path}: {source}")]
    Serde {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Outcome of recording one analysis
#[derive(Debug)]
pub struct Recorded {
    pub entry: HistoryEntry,
    /// Set when the in-memory update could not be written to disk
    pub persist_error: Option<StoreError>,
}

impl Recorded {
    pub fn persisted(&self) -> bool {
        self.persist_error.is_none()
    }
}

/// Point-in-time copy of the store contents
#[derive(Debug, Clone)]
pub struct AnalyticsSnapshot {
    pub history: Vec<HistoryEntry>,
    pub stats: UserStats,
}

struct State {
    history: History,
    stats: UserStats,
}

/// History + stats with optional on-disk persistence
pub struct AnalyticsStore {
    data_dir: Option<PathBuf>,
    state: Mutex<State>,
}

impl AnalyticsStore {
    /// Load from `data_dir`, falling back to empty state for missing or unreadable files
    pub fn open(data_dir: impl Into<PathBuf>, history_limit: usize) -> Self {
        let data_dir = data_dir.into();

        let entries: Vec<HistoryEntry> = load_or_default(&history_path(&data_dir));
        let stats: UserStats = load_or_default(&stats_path(&data_dir));
        debug!(
            "Loaded {} history entries and {} total analyses from {}",
            entries.len(),
            stats.total_analyses,
            data_dir.display()
        );

        Self {
            data_dir: Some(data_dir),
            state: Mutex::new(State {
                history: History::from_entries(entries, history_limit),
                stats,
            }),
        }
    }

    /// A store that never touches disk
    pub fn in_memory(history_limit: usize) -> Self {
        Self {
            data_dir: None,
            state: Mutex::new(State {
                history: History::with_limit(history_limit),
                stats: UserStats::default(),
            }),
        }
    }

    pub fn data_dir(&self) -> Option<&Path> {
        self.data_dir.as_deref()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        // A panic while holding the lock cannot leave the state half-updated:
        // every mutation below completes before any fallible call.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Prepend to history, update the counters, then persist both
    pub fn record(&self, result: &ScoreResult) -> Recorded {
        let (entry, saved) = self.update(|state| {
            let entry = state.history.append(result.clone()).clone();
            state.stats.record(result);
            entry
        });

        let persist_error = saved.err();
        if let Some(e) = &persist_error {
            warn!("Analysis recorded in memory but not saved: {}", e);
        }
        Recorded {
            entry,
            persist_error,
        }
    }

    /// Empty the history (stats are kept) and persist
    pub fn clear_history(&self) -> Result<(), StoreError> {
        self.update(|state| state.history.clear()).1
    }

    pub fn snapshot(&self) -> AnalyticsSnapshot {
        let state = self.lock();
        AnalyticsSnapshot {
            history: state.history.all().to_vec(),
            stats: state.stats.clone(),
        }
    }

    pub fn history(&self) -> Vec<HistoryEntry> {
        self.lock().history.all().to_vec()
    }

    pub fn stats(&self) -> UserStats {
        self.lock().stats.clone()
    }

    /// Apply `change` as one read-modify-write of the on-disk state.
    ///
    /// When the directory cannot be locked the change is still applied to
    /// the in-memory copy and the error is returned alongside.
    fn update<R>(&self, change: impl FnOnce(&mut State) -> R) -> (R, Result<(), StoreError>) {
        let mut state = self.lock();
        let Some(dir) = &self.data_dir else {
            return (change(&mut state), Ok(()));
        };

        let dir_lock = match lock_dir(dir) {
            Ok(file) => file,
            Err(e) => return (change(&mut state), Err(e)),
        };

        // Another process may have written since we last looked
        state.history = History::from_entries(
            load_or_default(&history_path(dir)),
            state.history.limit(),
        );
        state.stats = load_or_default(&stats_path(dir));

        let out = change(&mut state);
        let saved = save(dir, &state);
        drop(dir_lock);
        (out, saved)
    }
}

/// Take the exclusive directory lock; released when the file is dropped
fn lock_dir(dir: &Path) -> Result<File, StoreError> {
    fs::create_dir_all(dir).map_err(|source| StoreError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    let path = lock_path(dir);
    let io_err = |source| StoreError::Io {
        path: path.clone(),
        source,
    };
    let file = OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(&path)
        .map_err(io_err)?;
    file.lock().map_err(io_err)?;
    Ok(file)
}

fn save(dir: &Path, state: &State) -> Result<(), StoreError> {
    write_json(&history_path(dir), state.history.all())?;
    write_json(&stats_path(dir), &state.stats)?;
    info!(
        "Saved {} history entries to {}",
        state.history.len(),
        dir.display()
    );
    Ok(())
}

fn load_or_default<T: DeserializeOwned + Default>(path: &Path) -> T {
    if !path.exists() {
        debug!("No data file at {}", path.display());
        return T::default();
    }
    match read_json(path) {
        Ok(value) => value,
        Err(e) => {
            warn!("Ignoring unreadable data file: {}", e);
            T::default()
        }
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, StoreError> {
    let file = File::open(path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| StoreError::Serde {
        path: path.to_path_buf(),
        source,
    })
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), StoreError> {
    let io_err = |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };

    // Write to temp file first, then rename (atomic on POSIX)
    let tmp_path = path.with_extension(format!("{}.tmp", Uuid::new_v4().simple()));
    let mut writer = BufWriter::new(File::create(&tmp_path).map_err(io_err)?);
    serde_json::to_writer_pretty(&mut writer, value).map_err(|source| StoreError::Serde {
        path: tmp_path.clone(),
        source,
    })?;
    writer.flush().map_err(io_err)?;
    fs::rename(&tmp_path, path).map_err(io_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine;
    use std::sync::Arc;

    fn result(text: &str) -> ScoreResult {
        engine::score(text).expect("non-blank")
    }

    #[test]
    fn test_record_updates_history_and_stats() {
        let store = AnalyticsStore::in_memory(20);
        let recorded = store.record(&result("Winner! Claim your lottery prize, send your password"));
        assert!(recorded.persisted());

        let snap = store.snapshot();
        assert_eq!(snap.history.len(), 1);
        assert_eq!(snap.history[0].id, recorded.entry.id);
        assert_eq!(snap.stats.total_analyses, 1);
        assert_eq!(snap.stats.phishing_detected, 1);
        assert_eq!(snap.stats.safe_emails, 0);
    }

    #[test]
    fn test_round_trip_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = AnalyticsStore::open(dir.path(), 20);
            store.record(&result("See you at lunch tomorrow"));
            store.record(&result("Urgent: verify now"));
        }

        let reopened = AnalyticsStore::open(dir.path(), 20);
        let snap = reopened.snapshot();
        assert_eq!(snap.history.len(), 2);
        assert_eq!(snap.history[0].result.email_preview, "Urgent: verify now");
        assert_eq!(snap.stats.total_analyses, 2);
        assert_eq!(snap.stats.safe_emails, 2);
        assert!(dir.path().join("history.json").exists());
        assert!(dir.path().join("stats.json").exists());
        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().is_some_and(|ext| ext == "tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_stores_sharing_a_dir_see_each_others_writes() {
        let dir = tempfile::tempdir().unwrap();
        let first = AnalyticsStore::open(dir.path(), 20);
        let second = AnalyticsStore::open(dir.path(), 20);

        first.record(&result("Lunch at noon?"));
        second.record(&result("Urgent: verify now"));
        first.record(&result("See you tomorrow"));

        let reopened = AnalyticsStore::open(dir.path(), 20);
        assert_eq!(reopened.history().len(), 3);
        assert_eq!(reopened.stats().total_analyses, 3);
        assert_eq!(first.history().len(), 3);
    }

    #[test]
    fn test_clear_from_one_store_keeps_counts_from_another() {
        let dir = tempfile::tempdir().unwrap();
        let first = AnalyticsStore::open(dir.path(), 20);
        let second = AnalyticsStore::open(dir.path(), 20);

        first.record(&result("hello"));
        second.record(&result("hello again"));
        first.clear_history().unwrap();

        let reopened = AnalyticsStore::open(dir.path(), 20);
        assert!(reopened.history().is_empty());
        assert_eq!(reopened.stats().total_analyses, 2);
    }

    #[test]
    fn test_concurrent_stores_on_one_dir_lose_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let handles: Vec<_> = (0..4)
            .map(|t| {
                let path = dir.path().to_path_buf();
                std::thread::spawn(move || {
                    for i in 0..5 {
                        // A fresh store per record, like separate CLI runs
                        let store = AnalyticsStore::open(&path, 50);
                        assert!(store.record(&result(&format!("thread {t} note {i}"))).persisted());
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let reopened = AnalyticsStore::open(dir.path(), 50);
        assert_eq!(reopened.history().len(), 20);
        assert_eq!(reopened.stats().total_analyses, 20);
    }

    #[test]
    fn test_reopen_with_smaller_limit_trims() {
        let dir = tempfile::tempdir().unwrap();
        let store = AnalyticsStore::open(dir.path(), 20);
        for i in 0..5 {
            store.record(&result(&format!("note {i}")));
        }
        let reopened = AnalyticsStore::open(dir.path(), 2);
        assert_eq!(reopened.history().len(), 2);
        assert_eq!(reopened.stats().total_analyses, 5);
    }

    #[test]
    fn test_corrupt_files_fall_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("history.json"), "{ not json").unwrap();
        fs::write(dir.path().join("stats.json"), r#"{"total_analyses": "many"}"#).unwrap();

        let store = AnalyticsStore::open(dir.path(), 20);
        assert!(store.history().is_empty());
        assert_eq!(store.stats(), UserStats::default());
    }

    #[test]
    fn test_persist_failure_keeps_memory_state() {
        let dir = tempfile::tempdir().unwrap();
        // A regular file where the data directory should be
        let blocked = dir.path().join("blocked");
        fs::write(&blocked, "x").unwrap();

        let store = AnalyticsStore::open(&blocked, 20);
        let recorded = store.record(&result("Lunch at noon?"));
        assert!(!recorded.persisted());
        assert_eq!(store.history().len(), 1);
        assert_eq!(store.stats().total_analyses, 1);
    }

    #[test]
    fn test_clear_history_keeps_stats() {
        let dir = tempfile::tempdir().unwrap();
        let store = AnalyticsStore::open(dir.path(), 20);
        store.record(&result("hello"));
        store.clear_history().unwrap();

        let reopened = AnalyticsStore::open(dir.path(), 20);
        assert!(reopened.history().is_empty());
        assert_eq!(reopened.stats().total_analyses, 1);
    }

    #[test]
    fn test_concurrent_records_are_not_lost() {
        let store = Arc::new(AnalyticsStore::in_memory(20));
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    store.record(&result(&format!("message {i}")));
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(store.history().len(), 8);
        assert_eq!(store.stats().total_analyses, 8);
    }
}
