//! Compare mode: score two emails side by side
//!
//! Both texts are validated before either is scored, then scored in
//! parallel. The comparison only reads the two results.

use crate::engine::{EngineError, ScoringEngine};
use crate::models::{ScoreResult, PHISHING_THRESHOLD};
use serde::Serialize;

/// Which of the two emails scored lower
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Safer {
    A,
    B,
    Equal,
}

impl std::fmt::Display for Safer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Safer::A => write!(f, "Email A"),
            Safer::B => write!(f, "Email B"),
            Safer::Equal => write!(f, "Neither (equal scores)"),
        }
    }
}

/// Per-bucket change going from A to B (positive = B has more)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BucketDeltas {
    pub keyword_matches: i64,
    pub url_issues: i64,
    pub sensitive_requests: i64,
}

/// Result of comparing two emails
#[derive(Debug, Clone, Serialize)]
pub struct Comparison {
    pub a: ScoreResult,
    pub b: ScoreResult,
    pub score_difference: u8,
    pub safer: Safer,
    pub deltas: BucketDeltas,
    /// At least one of the two is in the phishing band
    pub high_risk: bool,
}

impl Comparison {
    fn from_results(a: ScoreResult, b: ScoreResult) -> Self {
        let safer = match a.score.cmp(&b.score) {
            std::cmp::Ordering::Less => Safer::A,
            std::cmp::Ordering::Greater => Safer::B,
            std::cmp::Ordering::Equal => Safer::Equal,
        };
        let delta = |x: u32, y: u32| i64::from(y) - i64::from(x);
        let deltas = BucketDeltas {
            keyword_matches: delta(a.details.keyword_matches, b.details.keyword_matches),
            url_issues: delta(a.details.url_issues, b.details.url_issues),
            sensitive_requests: delta(a.details.sensitive_requests, b.details.sensitive_requests),
        };

        Self {
            score_difference: a.score.abs_diff(b.score),
            high_risk: a.score.max(b.score) >= PHISHING_THRESHOLD,
            safer,
            deltas,
            a,
            b,
        }
    }
}

/// Score `a` and `b` with the same engine and compare them.
///
/// Fails without scoring anything if either text is rejected.
pub fn compare(engine: &ScoringEngine, a: &str, b: &str) -> Result<Comparison, EngineError> {
    engine.validate(a)?;
    engine.validate(b)?;

    let (ra, rb) = rayon::join(|| engine.score(a), || engine.score(b));
    Ok(Comparison::from_results(ra?, rb?))
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLEAN: &str = "See you at lunch on Thursday";
    const PHISH: &str = "Please confirm your PayPal password at http://192.168.1.100/paypal-verify";

    #[test]
    fn test_compare_clean_against_phishing() {
        let engine = ScoringEngine::default();
        let cmp = compare(&engine, CLEAN, PHISH).unwrap();

        assert_eq!(cmp.a.score, 0);
        assert_eq!(cmp.b.score, 83);
        assert_eq!(cmp.score_difference, 83);
        assert_eq!(cmp.safer, Safer::A);
        assert!(cmp.high_risk);
        assert_eq!(
            cmp.deltas,
            BucketDeltas {
                keyword_matches: 0,
                url_issues: 1,
                sensitive_requests: 1,
            }
        );
    }

    #[test]
    fn test_compare_is_symmetric_in_difference() {
        let engine = ScoringEngine::default();
        let ab = compare(&engine, CLEAN, PHISH).unwrap();
        let ba = compare(&engine, PHISH, CLEAN).unwrap();
        assert_eq!(ab.score_difference, ba.score_difference);
        assert_eq!(ba.safer, Safer::B);
        assert_eq!(ba.deltas.url_issues, -1);
    }

    #[test]
    fn test_equal_scores() {
        let engine = ScoringEngine::default();
        let cmp = compare(&engine, "hello", "goodbye").unwrap();
        assert_eq!(cmp.safer, Safer::Equal);
        assert_eq!(cmp.score_difference, 0);
        assert!(!cmp.high_risk);
    }

    #[test]
    fn test_blank_side_is_rejected() {
        let engine = ScoringEngine::default();
        assert_eq!(
            compare(&engine, PHISH, "   ").unwrap_err(),
            EngineError::BlankInput
        );
        assert_eq!(compare(&engine, "", CLEAN).unwrap_err(), EngineError::BlankInput);
    }
}
