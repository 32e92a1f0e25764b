//! Plain text reporter
//!
//! The same report a user would paste into a ticket: score, status,
//! confidence, numbered reasons and the recommended actions. No color codes,
//! so the output is stable whether or not stdout is a terminal.

use super::ReportOptions;
use crate::models::{RiskLevel, ScoreResult};
use crate::recommend::recommend;

/// Icon for a fired rule
fn rule_icon(rule: &str) -> &'static str {
    match rule {
        "urgency" => "⏰",
        "prize" => "🎁",
        "threat" => "⚠️",
        "action" => "👆",
        "ip-url" | "short-url" | "suspicious-tld" | "excessive-links" => "🔗",
        "brand-impersonation" => "🎭",
        "generic-greeting" => "👋",
        "sensitive-data" => "🔒",
        "scam-phrasing" => "💬",
        "attachment" => "📎",
        _ => "•",
    }
}

fn level_icon(level: RiskLevel) -> &'static str {
    match level {
        RiskLevel::Safe => "✅",
        RiskLevel::Suspicious => "⚠️",
        RiskLevel::Phishing => "🚨",
    }
}

/// Render a result as a plain text report
pub fn render(result: &ScoreResult, options: &ReportOptions) -> String {
    let level = result.risk_level();
    let icon = |s: &'static str| if options.no_emoji { "" } else { s };
    let spaced = |s: &'static str| {
        if options.no_emoji {
            String::new()
        } else {
            format!("{s} ")
        }
    };

    let mut out = String::new();
    out.push_str(&format!("{}Phishing Analysis Report\n", spaced("🛡️")));
    out.push_str(&format!("Score: {}/100\n", result.score));
    out.push_str(&format!("Status: {}{}\n", spaced(level_icon(level)), level));
    out.push_str(&format!("Confidence: {}%\n", result.confidence));

    out.push_str("\nDetection Reasons:\n");
    for (i, reason) in result.reasons.iter().enumerate() {
        // Reasons and signals line up one-to-one; the no-indicator line has no signal
        let marker = match result.signals.get(i) {
            Some(signal) => icon(rule_icon(&signal.rule)),
            None => icon("✅"),
        };
        if marker.is_empty() {
            out.push_str(&format!("{}. {}\n", i + 1, reason));
        } else {
            out.push_str(&format!("{}. {} {}\n", i + 1, marker, reason));
        }
    }

    if options.explain {
        out.push_str("\nScore Breakdown:\n");
        if result.signals.is_empty() {
            out.push_str("  (no rules fired)\n");
        }
        for signal in &result.signals {
            out.push_str(&format!(
                "  {:<20} +{:<3} ({} match{})\n",
                signal.rule,
                signal.points,
                signal.matches,
                if signal.matches == 1 { "" } else { "es" }
            ));
        }
        let raw = result.raw_score();
        if raw > u32::from(result.score) {
            out.push_str(&format!("  raw total {} clamped to {}\n", raw, result.score));
        } else {
            out.push_str(&format!("  total {}\n", raw));
        }
    }

    let advice = recommend(result.score);
    out.push_str(&format!("\nRecommended Actions ({}):\n", advice.title));
    for action in advice.actions {
        out.push_str(&format!("  - {}\n", action));
    }

    out
}
