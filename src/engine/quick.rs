//! Live estimate shown while an email is still being typed or pasted

use regex::Regex;
use std::sync::OnceLock;

static QUICK_CHECKS: OnceLock<Vec<(Regex, u32)>> = OnceLock::new();

fn quick_checks() -> &'static [(Regex, u32)] {
    QUICK_CHECKS.get_or_init(|| {
        [
            (r"(?i)urgent|immediately|verify now", 20),
            (r"(?i)winner|prize|lottery", 25),
            (r"(?i)password|ssn|credit card", 30),
            (r"http://[0-9]+\.[0-9]+\.[0-9]+\.[0-9]+", 25),
        ]
        .into_iter()
        .map(|(p, w)| (Regex::new(p).expect("valid quick-score pattern"), w))
        .collect()
    })
}

/// Cheap four-check estimate of the full score, clamped to 100.
///
/// Blank text scores 0. This never replaces [`ScoringEngine::score`](super::ScoringEngine::score).
pub fn quick_score(text: &str) -> u8 {
    if text.trim().is_empty() {
        return 0;
    }
    let total: u32 = quick_checks()
        .iter()
        .filter(|(re, _)| re.is_match(text))
        .map(|(_, w)| w)
        .sum();
    total.min(100) as u8
}
