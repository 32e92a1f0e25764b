//! Markdown document reporter

use super::{preview, ReportOptions, REPORT_PREVIEW_CHARS};
use crate::models::ScoreResult;
use crate::recommend::recommend;

fn yes_no(value: bool) -> &'static str {
    if value {
        "Yes"
    } else {
        "No"
    }
}

/// Render a result as a Markdown document
pub fn render(result: &ScoreResult, email_text: &str, options: &ReportOptions) -> String {
    let mut md = String::new();
    let d = &result.details;

    md.push_str("# Phishing Analysis Report\n\n");
    md.push_str(&format!(
        "*Generated: {}*\n\n",
        result.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    md.push_str(&format!("**Threat Score:** {}/100  \n", result.score));
    md.push_str(&format!("**Status:** {}\n\n", result.risk_level().label()));

    md.push_str("## Detection Metrics\n\n");
    md.push_str("| Metric | Value |\n");
    md.push_str("|--------|-------|\n");
    md.push_str(&format!("| Keyword Matches | {} |\n", d.keyword_matches));
    md.push_str(&format!("| URL Issues | {} |\n", d.url_issues));
    md.push_str(&format!("| Sensitive Requests | {} |\n", d.sensitive_requests));
    md.push_str(&format!(
        "| Brand Impersonation | {} |\n",
        yes_no(d.brand_impersonation)
    ));
    md.push_str(&format!("| Confidence | {}% |\n\n", result.confidence));

    md.push_str("## Detection Reasons\n\n");
    for (i, reason) in result.reasons.iter().enumerate() {
        md.push_str(&format!("{}. {}\n", i + 1, reason));
    }
    md.push('\n');

    if options.explain && !result.signals.is_empty() {
        md.push_str("## Score Breakdown\n\n");
        md.push_str("| Rule | Matches | Points |\n");
        md.push_str("|------|---------|--------|\n");
        for s in &result.signals {
            md.push_str(&format!("| `{}` | {} | {} |\n", s.rule, s.matches, s.points));
        }
        md.push('\n');
    }

    let advice = recommend(result.score);
    md.push_str(&format!("## Recommended Actions: {}\n\n", advice.title));
    for action in advice.actions {
        md.push_str(&format!("- {}\n", action));
    }
    md.push('\n');

    md.push_str("## Email Content Preview\n\n");
    for line in preview(email_text, REPORT_PREVIEW_CHARS).lines() {
        md.push_str(&format!("> {}\n", line));
    }

    md
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporters::tests::{phish_result, PHISH};

    #[test]
    fn test_markdown_sections() {
        let md = render(&phish_result(), PHISH, &ReportOptions::default());
        assert!(md.starts_with("# Phishing Analysis Report"));
        assert!(md.contains("**Threat Score:** 83/100"));
        assert!(md.contains("**Status:** PHISHING"));
        assert!(md.contains("| URL Issues | 1 |"));
        assert!(md.contains("| Brand Impersonation | Yes |"));
        assert!(md.contains("| Confidence | 91% |"));
        assert!(md.contains("3. Requests sensitive information: password - MAJOR RED FLAG"));
        assert!(md.contains("> Please confirm your PayPal password"));
        assert!(!md.contains("## Score Breakdown"));
    }

    #[test]
    fn test_markdown_preview_is_truncated() {
        let long = "a".repeat(REPORT_PREVIEW_CHARS + 50);
        let result = crate::engine::score(&long).unwrap();
        let md = render(&result, &long, &ReportOptions::default());
        let expected = format!("> {}...", "a".repeat(REPORT_PREVIEW_CHARS));
        assert!(md.contains(&expected));
    }

    #[test]
    fn test_markdown_explain_table() {
        let options = ReportOptions {
            explain: true,
            ..Default::default()
        };
        let md = render(&phish_result(), PHISH, &options);
        assert!(md.contains("| `ip-url` | 1 | 25 |"));
    }
}
