//! Analyze, quick and urls commands

use super::input::Source;
use super::Session;
use crate::engine::{extract_urls, quick_score};
use crate::history::Recorded;
use crate::models::RiskLevel;
use crate::reporters::{self, ReportFormat, ReportOptions};
use anyhow::{Context, Result};
use console::style;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

pub struct AnalyzeArgs<'a> {
    pub source: Source,
    pub format: &'a str,
    pub output: Option<&'a Path>,
    pub save: bool,
    pub explain: bool,
    pub fail_on: Option<String>,
    pub no_emoji: bool,
}

/// Run the analyze command
pub fn run(session: &Session, args: AnalyzeArgs<'_>) -> Result<()> {
    let format = ReportFormat::from_str(args.format)?;
    let fail_on = args
        .fail_on
        .as_deref()
        .map(RiskLevel::from_str)
        .transpose()?;

    let text = args.source.read()?;
    let result = session.engine.score(&text)?;
    debug!(score = result.score, fired = result.signals.len(), "analysis complete");

    let options = ReportOptions {
        no_emoji: args.no_emoji,
        explain: args.explain,
    };
    let rendered = reporters::report(&result, &text, format, &options)?;
    write_output(&rendered, args.output)?;

    // Only a delivered report counts as an analysis
    if args.save {
        let recorded = session.store(true).record(&result);
        warn_if_unsaved(session, &recorded);
    }

    check_fail_threshold(fail_on, result.risk_level());
    Ok(())
}

/// Tell the user when a result stayed in memory only
pub(super) fn warn_if_unsaved(session: &Session, recorded: &Recorded) {
    if !recorded.persisted() {
        eprintln!(
            "{} Result not saved to {}",
            style("warning:").yellow(),
            session.data_dir.display()
        );
    }
}

/// Print to stdout or write to a file
pub(super) fn write_output(rendered: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, rendered)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("Report written to: {}", path.display());
        }
        None => print!("{}", rendered),
    }
    Ok(())
}

/// Exit with code 1 when the result is at or above the threshold
fn check_fail_threshold(fail_on: Option<RiskLevel>, level: RiskLevel) {
    if let Some(threshold) = fail_on {
        if level >= threshold {
            eprintln!("Failing due to --fail-on={} threshold", threshold);
            std::process::exit(1);
        }
    }
}

/// Run the quick command
pub fn quick(source: &Source) -> Result<()> {
    let text = source.read()?;
    let score = quick_score(&text);
    let level = RiskLevel::from_score(score);
    let label = match level {
        RiskLevel::Safe => style(level.to_string()).green(),
        RiskLevel::Suspicious => style(level.to_string()).yellow(),
        RiskLevel::Phishing => style(level.to_string()).red(),
    };
    println!("Quick score: {}/100 ({})", style(score).bold(), label);
    Ok(())
}

/// Run the urls command
pub fn urls(source: &Source, json: bool) -> Result<()> {
    let text = source.read()?;
    let links = extract_urls(&text);

    if json {
        println!("{}", serde_json::to_string_pretty(&links)?);
        return Ok(());
    }

    if links.is_empty() {
        println!("No links found.");
        return Ok(());
    }

    let suspicious = links.iter().filter(|l| l.is_suspicious()).count();
    println!(
        "{} link(s), {} suspicious\n",
        links.len(),
        style(suspicious).bold()
    );
    for link in &links {
        if link.is_suspicious() {
            let why: Vec<String> = link.flags.iter().map(|f| f.to_string()).collect();
            println!("  {} {}", style("[!!]").red(), link.url);
            println!("       {}", style(why.join(", ")).dim());
        } else {
            println!("  {} {}", style("[ok]").green(), link.url);
        }
    }
    Ok(())
}
