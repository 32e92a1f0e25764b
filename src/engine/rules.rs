//! Canonical rule table for the scoring engine
//!
//! Every rule is one row: an identifier, the detail bucket it feeds, how it
//! weighs its matches, how it matches, and how it describes itself. Rows are
//! evaluated in table order, which is also the order of the reasons in a
//! [`ScoreResult`](crate::models::ScoreResult).
//!
//! All patterns are compiled once and run on the `regex` crate's linear-time
//! engine. The two checks that need lookahead (brand qualifiers and named
//! salutations) match first and inspect the tail afterwards.

use crate::models::DetailBucket;
use memchr::memmem;
use regex::Regex;
use std::sync::OnceLock;

pub const URGENCY_TERMS: &[&str] = &[
    "urgent",
    "immediately",
    "action required",
    "verify now",
    "within 24 hours",
    "expires today",
    "suspended",
    "locked",
    "act now",
];

pub const PRIZE_TERMS: &[&str] = &[
    "winner",
    "prize",
    "congratulations",
    "lottery",
    "inheritance",
    "millions",
    "selected",
];

pub const THREAT_TERMS: &[&str] = &[
    "account suspended",
    "verify account",
    "unusual activity",
    "security alert",
    "confirm identity",
    "unauthorized access",
];

pub const ACTION_TERMS: &[&str] = &[
    "click here",
    "download now",
    "open attachment",
    "update payment",
    "confirm password",
];

pub const SUSPICIOUS_TLDS: &[&str] = &[".tk", ".ml", ".ga", ".cf", ".gq", ".xyz", ".top", ".club"];

/// Brands checked in order; scanning stops at the first impersonated one
pub const PROTECTED_BRANDS: &[&str] = &[
    "paypal",
    "amazon",
    "microsoft",
    "apple",
    "google",
    "netflix",
    "facebook",
    "instagram",
    "bank",
];

pub const SENSITIVE_TERMS: &[&str] = &[
    "password",
    "social security",
    "ssn",
    "credit card",
    "bank account",
    "pin",
    "cvv",
    "security code",
];

pub const SCAM_PHRASES: &[&str] = &[
    "kindly",
    "dear sir/madam",
    "beneficiary",
    "urgent matter",
    "confirm your identity",
];

/// More `http(s)://` occurrences than this counts as a link flood
pub const EXCESSIVE_LINK_THRESHOLD: usize = 5;

static IP_URL: OnceLock<Regex> = OnceLock::new();
static SHORTENER: OnceLock<Regex> = OnceLock::new();
static LINK: OnceLock<Regex> = OnceLock::new();
static ATTACHMENT: OnceLock<Regex> = OnceLock::new();
static GENERIC_SALUTATION: OnceLock<Regex> = OnceLock::new();
static NAMED_TAIL: OnceLock<Regex> = OnceLock::new();
static IMPERSONAL_GREETINGS: OnceLock<Vec<Regex>> = OnceLock::new();

fn ip_url() -> &'static Regex {
    IP_URL.get_or_init(|| {
        Regex::new(r"https?://[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}")
            .expect("valid IP URL pattern")
    })
}

fn shortener() -> &'static Regex {
    SHORTENER.get_or_init(|| {
        Regex::new(r"(?i)(bit\.ly|tinyurl|goo\.gl|ow\.ly|t\.co)").expect("valid shortener pattern")
    })
}

pub(crate) fn link() -> &'static Regex {
    LINK.get_or_init(|| Regex::new(r"https?://").expect("valid link pattern"))
}

fn attachment() -> &'static Regex {
    ATTACHMENT.get_or_init(|| {
        Regex::new(r"(?i)attach|download|file|document|pdf|exe|zip")
            .expect("valid attachment pattern")
    })
}

fn generic_salutation() -> &'static Regex {
    GENERIC_SALUTATION.get_or_init(|| {
        Regex::new(r"(?i)dear (customer|user|member|sir|madam|friend)")
            .expect("valid salutation pattern")
    })
}

/// A salutation followed by a word is addressed to someone by name
fn named_tail() -> &'static Regex {
    NAMED_TAIL.get_or_init(|| Regex::new(r"^\s+[A-Za-z0-9_]").expect("valid tail pattern"))
}

fn impersonal_greetings() -> &'static [Regex] {
    IMPERSONAL_GREETINGS.get_or_init(|| {
        [r"(?i)kindly\s+", r"(?i)urgent\s+attention", r"(?i)dear\s+valued"]
            .iter()
            .map(|p| Regex::new(p).expect("valid greeting pattern"))
            .collect()
    })
}

/// How a rule turns its matches into points
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Weight {
    /// `n` points per match
    PerMatch(u32),
    /// `n` points once, however many matches
    Flat(u32),
}

impl Weight {
    pub fn points(&self, matches: u32) -> u32 {
        match *self {
            Weight::PerMatch(n) => n * matches,
            Weight::Flat(n) => n,
        }
    }
}

/// How a rule searches the input
#[derive(Debug, Clone, Copy)]
pub enum Matcher {
    /// Distinct terms contained in the lowercased text
    Terms(&'static [&'static str]),
    /// Every non-overlapping match of a pattern in the raw text
    Pattern(fn() -> &'static Regex),
    /// First brand mentioned without its official `.com` domain
    Brand(&'static [&'static str]),
    /// Link count above a threshold; contributes a single match
    LinkFlood(usize),
    /// Impersonal salutations ("dear customer", "kindly", ...)
    Greeting,
}

/// What a matcher found
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hit {
    /// Number of matches fed into the detail bucket
    pub count: u32,
    /// Matched terms or measured values, used in the reason line
    pub evidence: Vec<String>,
}

/// Text prepared once per invocation
pub struct Input<'a> {
    pub raw: &'a str,
    pub lower: String,
}

impl<'a> Input<'a> {
    pub fn new(raw: &'a str) -> Self {
        Self {
            raw,
            lower: raw.to_lowercase(),
        }
    }

    fn contains(&self, needle: &str) -> bool {
        memmem::find(self.lower.as_bytes(), needle.as_bytes()).is_some()
    }
}

impl Matcher {
    pub fn evaluate(&self, input: &Input<'_>) -> Option<Hit> {
        match self {
            Matcher::Terms(terms) => {
                let found: Vec<String> = terms
                    .iter()
                    .filter(|t| input.contains(t))
                    .map(|t| t.to_string())
                    .collect();
                (!found.is_empty()).then(|| Hit {
                    count: found.len() as u32,
                    evidence: found,
                })
            }
            Matcher::Pattern(pattern) => {
                let found: Vec<String> = pattern()
                    .find_iter(input.raw)
                    .map(|m| m.as_str().to_string())
                    .collect();
                (!found.is_empty()).then(|| Hit {
                    count: found.len() as u32,
                    evidence: found,
                })
            }
            Matcher::Brand(brands) => impersonated_brand(input, brands).map(|brand| Hit {
                count: 1,
                evidence: vec![brand.to_string()],
            }),
            Matcher::LinkFlood(threshold) => {
                let links = link().find_iter(input.raw).count();
                (links > *threshold).then(|| Hit {
                    count: 1,
                    evidence: vec![links.to_string()],
                })
            }
            Matcher::Greeting => {
                let mut found = Vec::new();
                if let Some(m) = generic_salutation()
                    .find_iter(input.raw)
                    .find(|m| !named_tail().is_match(&input.raw[m.end()..]))
                {
                    found.push(m.as_str().to_string());
                }
                found.extend(
                    impersonal_greetings()
                        .iter()
                        .filter_map(|re| re.find(input.raw))
                        .map(|m| m.as_str().trim_end().to_string()),
                );
                (!found.is_empty()).then(|| Hit {
                    count: found.len() as u32,
                    evidence: found,
                })
            }
        }
    }
}

fn impersonated_brand(input: &Input<'_>, brands: &[&'static str]) -> Option<&'static str> {
    let haystack = input.lower.as_bytes();
    brands.iter().copied().find(|brand| {
        if input.contains(&format!("{brand}.com")) {
            return false;
        }
        memmem::find_iter(haystack, brand.as_bytes()).any(|pos| {
            let tail = &haystack[pos + brand.len()..];
            !(tail.starts_with(b".com") || tail.starts_with(b"@"))
        })
    })
}

/// One row of the rule table
#[derive(Clone, Copy)]
pub struct Rule {
    pub id: &'static str,
    pub bucket: DetailBucket,
    pub weight: Weight,
    pub matcher: Matcher,
    describe: fn(&Hit) -> String,
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule")
            .field("id", &self.id)
            .field("bucket", &self.bucket)
            .field("weight", &self.weight)
            .field("matcher", &self.matcher)
            .finish_non_exhaustive()
    }
}

impl Rule {
    pub fn describe(&self, hit: &Hit) -> String {
        (self.describe)(hit)
    }
}

fn quoted(hit: &Hit) -> String {
    format!("\"{}\"", hit.evidence.join("\", \""))
}

fn first(hit: &Hit) -> &str {
    hit.evidence.first().map(String::as_str).unwrap_or_default()
}

/// The canonical rule table, in evaluation order
pub const RULES: &[Rule] = &[
    Rule {
        id: "urgency",
        bucket: DetailBucket::Keyword,
        weight: Weight::PerMatch(12),
        matcher: Matcher::Terms(URGENCY_TERMS),
        describe: |hit| format!("Creates false urgency: {}", quoted(hit)),
    },
    Rule {
        id: "prize",
        bucket: DetailBucket::Keyword,
        weight: Weight::PerMatch(18),
        matcher: Matcher::Terms(PRIZE_TERMS),
        describe: |hit| format!("Suspicious prize claims: {}", quoted(hit)),
    },
    Rule {
        id: "threat",
        bucket: DetailBucket::Keyword,
        weight: Weight::PerMatch(20),
        matcher: Matcher::Terms(THREAT_TERMS),
        describe: |hit| format!("Threatening language: {}", quoted(hit)),
    },
    Rule {
        id: "action",
        bucket: DetailBucket::Keyword,
        weight: Weight::PerMatch(15),
        matcher: Matcher::Terms(ACTION_TERMS),
        describe: |hit| format!("Suspicious call-to-action: {}", quoted(hit)),
    },
    Rule {
        id: "ip-url",
        bucket: DetailBucket::Url,
        weight: Weight::Flat(25),
        matcher: Matcher::Pattern(ip_url),
        describe: |hit| {
            format!(
                "IP-based URLs detected ({} found) - legitimate sites use domain names",
                hit.count
            )
        },
    },
    Rule {
        id: "short-url",
        bucket: DetailBucket::Url,
        weight: Weight::Flat(15),
        matcher: Matcher::Pattern(shortener),
        describe: |hit| {
            format!(
                "Shortened URLs detected ({} found) - could hide malicious destinations",
                hit.count
            )
        },
    },
    Rule {
        id: "suspicious-tld",
        bucket: DetailBucket::Url,
        weight: Weight::Flat(22),
        matcher: Matcher::Terms(SUSPICIOUS_TLDS),
        describe: |hit| {
            format!(
                "Free/suspicious domain extensions: {}",
                hit.evidence.join(", ")
            )
        },
    },
    Rule {
        id: "brand-impersonation",
        bucket: DetailBucket::Brand,
        weight: Weight::Flat(28),
        matcher: Matcher::Brand(PROTECTED_BRANDS),
        describe: |hit| {
            format!(
                "Possible brand impersonation: \"{}\" without official domain",
                first(hit)
            )
        },
    },
    Rule {
        id: "excessive-links",
        bucket: DetailBucket::Url,
        weight: Weight::Flat(10),
        matcher: Matcher::LinkFlood(EXCESSIVE_LINK_THRESHOLD),
        describe: |hit| {
            format!(
                "Excessive links detected ({} links) - unusual for legitimate emails",
                first(hit)
            )
        },
    },
    Rule {
        id: "generic-greeting",
        bucket: DetailBucket::None,
        weight: Weight::Flat(10),
        matcher: Matcher::Greeting,
        describe: |_| {
            "Generic/impersonal greetings detected - legitimate companies use your name"
                .to_string()
        },
    },
    Rule {
        id: "sensitive-data",
        bucket: DetailBucket::Sensitive,
        weight: Weight::Flat(30),
        matcher: Matcher::Terms(SENSITIVE_TERMS),
        describe: |hit| {
            format!(
                "Requests sensitive information: {} - MAJOR RED FLAG",
                hit.evidence.join(", ")
            )
        },
    },
    Rule {
        id: "scam-phrasing",
        bucket: DetailBucket::None,
        weight: Weight::Flat(8),
        matcher: Matcher::Terms(SCAM_PHRASES),
        describe: |_| "Suspicious phrasing patterns commonly used in scams".to_string(),
    },
    Rule {
        id: "attachment",
        bucket: DetailBucket::None,
        weight: Weight::Flat(12),
        matcher: Matcher::Pattern(attachment),
        describe: |_| "Mentions attachments/downloads - verify source before opening".to_string(),
    },
];

/// Look up a rule by identifier
pub fn rule(id: &str) -> Option<&'static Rule> {
    RULES.iter().find(|r| r.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(id: &str, text: &str) -> Option<Hit> {
        rule(id).expect("known rule").matcher.evaluate(&Input::new(text))
    }

    #[test]
    fn test_rule_ids_unique() {
        let mut ids: Vec<_> = RULES.iter().map(|r| r.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), RULES.len());
    }

    #[test]
    fn test_weight_points() {
        assert_eq!(Weight::PerMatch(12).points(3), 36);
        assert_eq!(Weight::Flat(25).points(4), 25);
    }

    #[test]
    fn test_terms_are_distinct_and_case_insensitive() {
        let h = hit("urgency", "URGENT! This is urgent. Verify Now.").unwrap();
        assert_eq!(h.count, 2);
        assert_eq!(h.evidence, vec!["urgent", "verify now"]);
    }

    #[test]
    fn test_ip_url_counts_every_occurrence() {
        let h = hit("ip-url", "see http://10.0.0.1/a and https://192.168.1.100/b").unwrap();
        assert_eq!(h.count, 2);
        assert!(hit("ip-url", "HTTP://10.0.0.1/").is_none());
    }

    #[test]
    fn test_shortener_case_insensitive() {
        let h = hit("short-url", "go to BIT.LY/x or tinyurl.com/y").unwrap();
        assert_eq!(h.count, 2);
    }

    #[test]
    fn test_brand_without_domain_is_flagged() {
        let h = hit("brand-impersonation", "Your PayPal account").unwrap();
        assert_eq!(h.evidence, vec!["paypal"]);
    }

    #[test]
    fn test_brand_with_official_domain_is_not_flagged() {
        assert!(hit("brand-impersonation", "Visit paypal.com for help with PayPal").is_none());
        assert!(hit("brand-impersonation", "mail support at paypal@example.org").is_none());
    }

    #[test]
    fn test_brand_scan_stops_at_first_match() {
        let h = hit("brand-impersonation", "netflix and amazon and google").unwrap();
        assert_eq!(h.count, 1);
        assert_eq!(h.evidence, vec!["amazon"]);
    }

    #[test]
    fn test_link_flood_threshold() {
        let five = "http://a.io ".repeat(5);
        assert!(hit("excessive-links", &five).is_none());
        let six = "http://a.io ".repeat(6);
        let h = hit("excessive-links", &six).unwrap();
        assert_eq!(h.count, 1);
        assert_eq!(h.evidence, vec!["6"]);
    }

    #[test]
    fn test_generic_salutation_without_name() {
        assert!(hit("generic-greeting", "Dear Customer,\nplease read").is_some());
        assert!(hit("generic-greeting", "Dear customer").is_some());
    }

    #[test]
    fn test_salutation_followed_by_name_is_personal() {
        assert!(hit("generic-greeting", "Dear member Alice, welcome").is_none());
    }

    #[test]
    fn test_other_impersonal_greetings() {
        let h = hit("generic-greeting", "Kindly respond. Dear valued client").unwrap();
        assert_eq!(h.count, 2);
    }

    #[test]
    fn test_attachment_mentions() {
        assert!(hit("attachment", "see the attached PDF").is_some());
        assert!(hit("attachment", "see you soon").is_none());
    }

    #[test]
    fn test_describe_lists_evidence() {
        let r = rule("urgency").unwrap();
        let h = r.matcher.evaluate(&Input::new("urgent, act now")).unwrap();
        assert_eq!(r.describe(&h), "Creates false urgency: \"urgent\", \"act now\"");
    }
}
