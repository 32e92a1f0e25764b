//! Core data models for PhishGuard
//!
//! These models are shared by the scoring engine, the analytics store,
//! the reporters and the CLI.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Scores at or above this are reported as phishing
pub const PHISHING_THRESHOLD: u8 = 70;

/// Scores below this are reported as safe
pub const SAFE_THRESHOLD: u8 = 30;

/// Risk band derived from a score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Safe,
    Suspicious,
    Phishing,
}

impl RiskLevel {
    pub fn from_score(score: u8) -> Self {
        if score < SAFE_THRESHOLD {
            RiskLevel::Safe
        } else if score < PHISHING_THRESHOLD {
            RiskLevel::Suspicious
        } else {
            RiskLevel::Phishing
        }
    }

    /// Upper-case status label used by document exports
    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::Safe => "SAFE",
            RiskLevel::Suspicious => "SUSPICIOUS",
            RiskLevel::Phishing => "PHISHING",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskLevel::Safe => write!(f, "Safe"),
            RiskLevel::Suspicious => write!(f, "Suspicious"),
            RiskLevel::Phishing => write!(f, "Phishing"),
        }
    }
}

impl std::str::FromStr for RiskLevel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "safe" => Ok(RiskLevel::Safe),
            "suspicious" => Ok(RiskLevel::Suspicious),
            "phishing" => Ok(RiskLevel::Phishing),
            _ => Err(anyhow::anyhow!(
                "Unknown risk level '{}'. Valid levels: safe, suspicious, phishing",
                s
            )),
        }
    }
}

/// Which counter in [`ScoreDetails`] a rule feeds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetailBucket {
    Keyword,
    Url,
    Sensitive,
    Brand,
    None,
}

/// Structured breakdown of what the engine matched
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreDetails {
    /// Matched terms across urgency/prize/threat/action keywords
    pub keyword_matches: u32,
    /// IP URLs, shortener hits, suspicious TLD hits, plus 1 for excessive links
    pub url_issues: u32,
    /// Matched sensitive-information terms
    pub sensitive_requests: u32,
    /// A protected brand appeared without its official domain
    pub brand_impersonation: bool,
}

/// One fired rule and what it contributed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signal {
    /// Stable rule identifier (e.g. `urgency`, `ip-url`)
    pub rule: String,
    pub bucket: DetailBucket,
    /// Points added to the raw score
    pub points: u32,
    /// Matches counted by the rule
    pub matches: u32,
}

/// Output of one scoring invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    /// Risk score, 0-100
    pub score: u8,
    /// One human-readable line per fired rule, in rule order
    pub reasons: Vec<String>,
    pub details: ScoreDetails,
    #[serde(default)]
    pub signals: Vec<Signal>,
    /// Confidence percentage, 85 <= c < 100
    pub confidence: f64,
    pub timestamp: DateTime<Utc>,
    pub email_preview: String,
}

impl ScoreResult {
    pub fn risk_level(&self) -> RiskLevel {
        RiskLevel::from_score(self.score)
    }

    /// Sum of rule contributions before the 100 clamp
    pub fn raw_score(&self) -> u32 {
        self.signals.iter().map(|s| s.points).sum()
    }
}

/// A recorded analysis in the history list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: String,
    pub result: ScoreResult,
    pub timestamp: DateTime<Utc>,
}

/// An unlocked (or locked) badge stored alongside the stats
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Achievement {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub unlocked: bool,
    #[serde(default)]
    pub unlocked_at: Option<DateTime<Utc>>,
}

/// Aggregate counters over every recorded analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserStats {
    #[serde(default)]
    pub total_analyses: u64,
    #[serde(default)]
    pub phishing_detected: u64,
    #[serde(default)]
    pub safe_emails: u64,
    #[serde(default = "default_accuracy")]
    pub accuracy: f64,
    #[serde(default)]
    pub achievements: Vec<Achievement>,
}

fn default_accuracy() -> f64 {
    100.0
}

impl Default for UserStats {
    fn default() -> Self {
        Self {
            total_analyses: 0,
            phishing_detected: 0,
            safe_emails: 0,
            accuracy: default_accuracy(),
            achievements: Vec::new(),
        }
    }
}

impl UserStats {
    /// Count one analysis
    pub fn record(&mut self, result: &ScoreResult) {
        self.total_analyses += 1;
        match result.risk_level() {
            RiskLevel::Phishing => self.phishing_detected += 1,
            RiskLevel::Safe => self.safe_emails += 1,
            RiskLevel::Suspicious => {}
        }
    }

    /// Analyses that were neither safe nor phishing
    pub fn suspicious(&self) -> u64 {
        self.total_analyses
            .saturating_sub(self.phishing_detected + self.safe_emails)
    }
}
