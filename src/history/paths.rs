//! Data directory utilities - uses ~/.local/share/phishguard/ (platform data dir)

use std::path::{Path, PathBuf};

/// Environment variable that relocates the data directory
pub const DATA_DIR_ENV: &str = "PHISHGUARD_DATA_DIR";

/// File holding the capped analysis history
pub const HISTORY_FILE: &str = "history.json";

/// File holding the aggregate stats
pub const STATS_FILE: &str = "stats.json";

/// Held with an exclusive OS lock while the data files are rewritten
pub const LOCK_FILE: &str = ".lock";

/// Default data directory.
/// Uses ~/.local/share/phishguard on Linux, ~/Library/Application Support/phishguard on macOS,
/// %APPDATA%/phishguard on Windows.
pub fn default_data_dir() -> PathBuf {
    let base = dirs::data_dir().unwrap_or_else(|| {
        // Fallback to ~/.local/share
        dirs::home_dir()
            .map(|h| h.join(".local").join("share"))
            .unwrap_or_else(|| PathBuf::from("."))
    });

    base.join("phishguard")
}

/// Get the history file path inside a data directory.
pub fn history_path(data_dir: &Path) -> PathBuf {
    data_dir.join(HISTORY_FILE)
}

/// Get the stats file path inside a data directory.
pub fn stats_path(data_dir: &Path) -> PathBuf {
    data_dir.join(STATS_FILE)
}

/// Get the lock file path inside a data directory.
pub fn lock_path(data_dir: &Path) -> PathBuf {
    data_dir.join(LOCK_FILE)
}
