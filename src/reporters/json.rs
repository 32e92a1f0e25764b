//! JSON reporter
//!
//! Single results are wrapped with the risk level, a longer preview of the
//! submitted text and the band's advice. History exports are the stored
//! entries as-is, so they can be read back with serde.

use super::{preview, ExportError, REPORT_PREVIEW_CHARS};
use crate::models::{HistoryEntry, RiskLevel, ScoreResult};
use crate::recommend::{recommend, Recommendation};
use anyhow::Result;
use serde::Serialize;

#[derive(Serialize)]
struct ResultExport<'a> {
    #[serde(flatten)]
    result: &'a ScoreResult,
    risk_level: RiskLevel,
    email_text: String,
    recommendation: Recommendation,
}

/// Render one result as pretty-printed JSON
pub fn render(result: &ScoreResult, email_text: &str) -> Result<String> {
    let export = ResultExport {
        result,
        risk_level: result.risk_level(),
        email_text: preview(email_text, REPORT_PREVIEW_CHARS),
        recommendation: recommend(result.score),
    };
    Ok(serde_json::to_string_pretty(&export)?)
}

/// Render history entries as a JSON array
pub fn render_history(entries: &[HistoryEntry]) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(entries)?)
}
