//! History, stats and export commands

use super::analyze::write_output;
use super::Session;
use crate::models::{HistoryEntry, RiskLevel};
use crate::reporters::{self, ExportError, HistoryFormat};
use anyhow::{bail, Result};
use console::style;
use std::path::Path;
use std::str::FromStr;

fn level_style(level: RiskLevel) -> console::StyledObject<String> {
    let text = format!("{:<10}", level.to_string());
    match level {
        RiskLevel::Safe => style(text).green(),
        RiskLevel::Suspicious => style(text).yellow(),
        RiskLevel::Phishing => style(text).red(),
    }
}

/// Single-line preview for listings
fn one_line(text: &str, max: usize) -> String {
    let flat: String = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() > max {
        let head: String = flat.chars().take(max).collect();
        format!("{head}...")
    } else {
        flat
    }
}

/// Run the history command (list or inspect)
pub fn list(session: &Session, show: Option<usize>, json: bool) -> Result<()> {
    let entries = session.store(true).history();

    if let Some(index) = show {
        let Some(entry) = index.checked_sub(1).and_then(|i| entries.get(i)) else {
            if entries.is_empty() {
                bail!("No analyses recorded yet. Run 'phishguard analyze' first.");
            }
            bail!(
                "Invalid history index {}. Valid range: 1-{}",
                index,
                entries.len()
            );
        };
        if json {
            println!("{}", serde_json::to_string_pretty(entry)?);
        } else {
            print_entry(index, entry);
        }
        return Ok(());
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!(
            "No analyses recorded yet. Run {}",
            style("phishguard analyze").cyan()
        );
        return Ok(());
    }

    println!("\nRecent analyses ({} of max {})\n", entries.len(), session.config.history_limit());
    for (i, entry) in entries.iter().enumerate() {
        let r = &entry.result;
        println!(
            "  {:>3}. {:>3}/100 {} {}  {}",
            i + 1,
            r.score,
            level_style(r.risk_level()),
            style(entry.timestamp.format("%Y-%m-%d %H:%M")).dim(),
            one_line(&r.email_preview, 50)
        );
    }
    println!(
        "\nShow details with {}",
        style("phishguard history --show N").cyan()
    );
    Ok(())
}

fn print_entry(index: usize, entry: &HistoryEntry) {
    let r = &entry.result;
    println!("\n#{}  {}", index, style(&entry.id).dim());
    println!("  Analyzed:   {}", entry.timestamp.format("%Y-%m-%d %H:%M:%S UTC"));
    println!("  Score:      {}/100 ({})", style(r.score).bold(), r.risk_level());
    println!("  Confidence: {}%", r.confidence);
    println!(
        "  Details:    keywords {}, url issues {}, sensitive {}, brand impersonation {}",
        r.details.keyword_matches,
        r.details.url_issues,
        r.details.sensitive_requests,
        if r.details.brand_impersonation { "yes" } else { "no" }
    );
    println!("  Reasons:");
    for reason in &r.reasons {
        println!("    - {}", reason);
    }
    println!("  Preview:    {}", one_line(&r.email_preview, 100));
}

/// Run the history --clear command
pub fn clear(session: &Session) -> Result<()> {
    let store = session.store(true);
    let count = store.history().len();
    store.clear_history()?;
    println!("✅ Cleared {} history entr{}", count, if count == 1 { "y" } else { "ies" });
    Ok(())
}

/// Run the stats command
pub fn stats(session: &Session, json: bool) -> Result<()> {
    let stats = session.store(true).stats();

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("\nPhishGuard Stats\n");
    println!("  Total analyses:     {}", style(stats.total_analyses).bold());
    println!("  Phishing detected:  {}", style(stats.phishing_detected).red());
    println!("  Suspicious:         {}", style(stats.suspicious()).yellow());
    println!("  Safe emails:        {}", style(stats.safe_emails).green());
    println!("  Accuracy:           {}%", stats.accuracy);

    let unlocked: Vec<_> = stats.achievements.iter().filter(|a| a.unlocked).collect();
    if !unlocked.is_empty() {
        println!("\n  Achievements:");
        for a in unlocked {
            println!("    {} {} - {}", a.icon, style(&a.title).bold(), a.description);
        }
    }
    Ok(())
}

/// Run the export command
pub fn export(session: &Session, format: &str, output: Option<&Path>) -> Result<()> {
    let format = HistoryFormat::from_str(format)?;
    let entries = session.store(true).history();

    let rendered = match reporters::export_history(&entries, format) {
        Ok(rendered) => rendered,
        Err(ExportError::NothingToExport) => {
            bail!("No analyses recorded yet; nothing to export. Run 'phishguard analyze' first.")
        }
        Err(e) => return Err(e.into()),
    };
    write_output(&rendered, output)
}
