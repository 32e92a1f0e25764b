//! Compare command - score two emails side by side

use super::analyze::warn_if_unsaved;
use super::input::read_file;
use super::Session;
use crate::compare::{compare, Comparison};
use crate::models::ScoreResult;
use anyhow::Result;
use console::style;
use std::path::Path;

/// Run the compare command
pub fn run(session: &Session, a: &Path, b: &Path, format: &str, save: bool) -> Result<()> {
    let text_a = read_file(a)?;
    let text_b = read_file(b)?;
    let cmp = compare(&session.engine, &text_a, &text_b)?;

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&cmp)?);
    } else {
        print_comparison(&cmp, a, b);
    }

    if save {
        let store = session.store(true);
        for result in [&cmp.a, &cmp.b] {
            warn_if_unsaved(session, &store.record(result));
        }
    }
    Ok(())
}

fn print_side(name: &str, path: &Path, result: &ScoreResult) {
    println!(
        "{} {}  score {}/100  ({})",
        style(name).bold(),
        style(path.display()).dim(),
        style(result.score).bold(),
        result.risk_level()
    );
    for reason in &result.reasons {
        println!("    - {}", reason);
    }
}

fn signed(n: i64) -> String {
    if n > 0 {
        format!("+{n}")
    } else {
        n.to_string()
    }
}

fn print_comparison(cmp: &Comparison, a: &Path, b: &Path) {
    println!("\nPhishGuard Comparison\n");
    print_side("Email A", a, &cmp.a);
    println!();
    print_side("Email B", b, &cmp.b);
    println!();

    println!("  Score difference: {}", style(cmp.score_difference).bold());
    println!("  Safer:            {}", cmp.safer);
    println!(
        "  B vs A:           keywords {}  urls {}  sensitive {}",
        signed(cmp.deltas.keyword_matches),
        signed(cmp.deltas.url_issues),
        signed(cmp.deltas.sensitive_requests)
    );
    if cmp.high_risk {
        println!(
            "\n  {} At least one email is likely phishing",
            style("HIGH RISK").red().bold()
        );
    }
}
