//! Phishing scoring engine
//!
//! A pure function from email text to a [`ScoreResult`]: every row of the
//! rule table in [`rules`] is evaluated independently against the text and
//! the contributions are summed and clamped to 100.
//!
//! # Example
//!
//! ```
//! let result = phishguard::engine::score("URGENT: verify now or your account is locked")
//!     .expect("non-blank input");
//! assert_eq!(result.score, 36);
//! assert_eq!(result.details.keyword_matches, 3);
//! ```

mod quick;
pub mod rules;
mod urls;

pub use quick::quick_score;
pub use rules::{Hit, Matcher, Rule, Weight, RULES};
pub use urls::{extract_urls, UrlFlag, UrlInsight};

use crate::models::{DetailBucket, ScoreDetails, ScoreResult, Signal};
use chrono::Utc;
use rules::Input;
use thiserror::Error;
use tracing::debug;

/// Reason emitted when no rule fires
pub const NO_INDICATORS_REASON: &str = "no indicators detected";

/// Upper bound on the score
pub const MAX_SCORE: u32 = 100;

/// Default cap on input size (256 KiB)
pub const DEFAULT_MAX_INPUT_BYTES: usize = 256 * 1024;

/// Default number of characters kept in `email_preview`
pub const DEFAULT_PREVIEW_CHARS: usize = 100;

/// Errors returned before any rule is evaluated
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Email text is empty or whitespace-only; nothing to analyze")]
    BlankInput,

    #[error("Email text is {len} bytes; the limit is {max} bytes")]
    InputTooLarge { len: usize, max: usize },
}

/// Engine tunables
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    pub max_input_bytes: usize,
    pub preview_chars: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_input_bytes: DEFAULT_MAX_INPUT_BYTES,
            preview_chars: DEFAULT_PREVIEW_CHARS,
        }
    }
}

/// Stateless scorer over the canonical rule table
#[derive(Debug, Clone, Default)]
pub struct ScoringEngine {
    config: EngineConfig,
}

impl ScoringEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Reject input the engine must not run on
    pub fn validate(&self, text: &str) -> Result<(), EngineError> {
        if text.trim().is_empty() {
            return Err(EngineError::BlankInput);
        }
        if text.len() > self.config.max_input_bytes {
            return Err(EngineError::InputTooLarge {
                len: text.len(),
                max: self.config.max_input_bytes,
            });
        }
        Ok(())
    }

    /// Score one email body
    pub fn score(&self, text: &str) -> Result<ScoreResult, EngineError> {
        self.validate(text)?;

        let input = Input::new(text);
        let mut reasons = Vec::new();
        let mut signals = Vec::new();
        let mut details = ScoreDetails::default();

        for rule in RULES {
            let Some(hit) = rule.matcher.evaluate(&input) else {
                continue;
            };
            let points = rule.weight.points(hit.count);
            debug!(rule = rule.id, matches = hit.count, points, "rule fired");

            match rule.bucket {
                DetailBucket::Keyword => details.keyword_matches += hit.count,
                DetailBucket::Url => details.url_issues += hit.count,
                DetailBucket::Sensitive => details.sensitive_requests += hit.count,
                DetailBucket::Brand => details.brand_impersonation = true,
                DetailBucket::None => {}
            }

            reasons.push(rule.describe(&hit));
            signals.push(Signal {
                rule: rule.id.to_string(),
                bucket: rule.bucket,
                points,
                matches: hit.count,
            });
        }

        let raw: u32 = signals.iter().map(|s| s.points).sum();
        let score = raw.min(MAX_SCORE) as u8;

        if signals.is_empty() {
            reasons.push(NO_INDICATORS_REASON.to_string());
        }

        Ok(ScoreResult {
            score,
            reasons,
            details,
            confidence: confidence(signals.len()),
            signals,
            timestamp: Utc::now(),
            email_preview: text.chars().take(self.config.preview_chars).collect(),
        })
    }
}

/// Confidence grows with the number of independent rules that agree.
/// Always in `[85, 100)`.
fn confidence(fired: usize) -> f64 {
    85.0 + (fired * 2).min(14) as f64
}

/// Score with the default engine configuration
pub fn score(text: &str) -> Result<ScoreResult, EngineError> {
    ScoringEngine::default().score(text)
}
