//! Security advice per risk band

use crate::models::RiskLevel;
use serde::Serialize;

/// Fixed advice for one risk band
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    pub level: RiskLevel,
    pub title: &'static str,
    pub actions: &'static [&'static str],
}

const SAFE_ACTIONS: &[&str] = &[
    "Still verify the sender's email address matches official communications",
    "Hover over any links before clicking to check destinations",
    "Be cautious of unexpected attachments",
    "Report suspicious emails to your IT department",
];

const SUSPICIOUS_ACTIONS: &[&str] = &[
    "Do not click any links or download attachments",
    "Verify sender identity through official channels",
    "Look for signs of spoofed email addresses",
    "Report to your security team if from work email",
    "Delete the email if you don't recognize the sender",
];

const PHISHING_ACTIONS: &[&str] = &[
    "DO NOT click any links or open attachments",
    "DO NOT provide any personal information",
    "DO NOT reply to this email",
    "Report this as phishing to your email provider",
    "Delete the email immediately",
    "Change passwords if you've already clicked links",
    "Enable two-factor authentication on affected accounts",
];

pub fn recommend(score: u8) -> Recommendation {
    let level = RiskLevel::from_score(score);
    let (title, actions) = match level {
        RiskLevel::Safe => ("Email Appears Safe", SAFE_ACTIONS),
        RiskLevel::Suspicious => ("Exercise Caution", SUSPICIOUS_ACTIONS),
        RiskLevel::Phishing => ("High Risk - Likely Phishing", PHISHING_ACTIONS),
    };
    Recommendation {
        level,
        title,
        actions,
    }
}
