//! Output reporters for PhishGuard results
//!
//! Single analysis reports:
//! - `text` - Plain report suitable for the terminal or the clipboard
//! - `markdown` - Document report with metrics, reasons and advice
//! - `json` - Machine-readable result plus preview and advice
//!
//! History exports:
//! - `csv` - One row per recorded analysis
//! - `json` - The stored entries as a JSON array

mod csv;
mod json;
mod markdown;
mod text;

use crate::models::{HistoryEntry, ScoreResult};
use anyhow::{anyhow, Result};
use std::str::FromStr;
use thiserror::Error;

/// Characters of the submitted email shown in document reports
pub const REPORT_PREVIEW_CHARS: usize = 300;

/// Supported single-result formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Text,
    Markdown,
    Json,
}

impl FromStr for ReportFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(ReportFormat::Text),
            "markdown" | "md" => Ok(ReportFormat::Markdown),
            "json" => Ok(ReportFormat::Json),
            _ => Err(anyhow!(
                "Unknown format '{}'. Valid formats: text, markdown, json",
                s
            )),
        }
    }
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportFormat::Text => write!(f, "text"),
            ReportFormat::Markdown => write!(f, "markdown"),
            ReportFormat::Json => write!(f, "json"),
        }
    }
}

/// Supported history export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryFormat {
    Csv,
    Json,
}

impl FromStr for HistoryFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(HistoryFormat::Csv),
            "json" => Ok(HistoryFormat::Json),
            _ => Err(anyhow!("Unknown export format '{}'. Valid formats: csv, json", s)),
        }
    }
}

impl std::fmt::Display for HistoryFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HistoryFormat::Csv => write!(f, "csv"),
            HistoryFormat::Json => write!(f, "json"),
        }
    }
}

/// Errors from exporting the history
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("History is empty; nothing to export")]
    NothingToExport,

    #[error("Failed to serialize history: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Rendering switches shared by the single-result reporters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportOptions {
    /// Drop icons from the text report
    pub no_emoji: bool,
    /// Append the per-rule point breakdown
    pub explain: bool,
}

/// Render one analysis in the given format.
///
/// `email_text` is the full submitted text; document formats show a longer
/// preview than the one stored on the result.
pub fn report(
    result: &ScoreResult,
    email_text: &str,
    format: ReportFormat,
    options: &ReportOptions,
) -> Result<String> {
    match format {
        ReportFormat::Text => Ok(text::render(result, options)),
        ReportFormat::Markdown => Ok(markdown::render(result, email_text, options)),
        ReportFormat::Json => json::render(result, email_text),
    }
}

/// Export recorded analyses, newest first
pub fn export_history(
    entries: &[HistoryEntry],
    format: HistoryFormat,
) -> Result<String, ExportError> {
    if entries.is_empty() {
        return Err(ExportError::NothingToExport);
    }
    match format {
        HistoryFormat::Csv => Ok(csv::render(entries)),
        HistoryFormat::Json => json::render_history(entries),
    }
}

/// First `max` characters of `text`, with an ellipsis when cut
pub(crate) fn preview(text: &str, max: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(max).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}
