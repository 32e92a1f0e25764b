//! Configuration module for PhishGuard
//!
//! This module handles:
//! - User-level configuration (config.toml)
//! - Environment overrides for the data directory and history size

mod user_config;

pub use user_config::{
    EngineSection, HistorySection, OutputSection, UserConfig, CONFIG_PATH_ENV, HISTORY_LIMIT_ENV,
};
