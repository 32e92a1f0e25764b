//! URL extraction with per-link suspicion flags

use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

static URL: OnceLock<Regex> = OnceLock::new();
static IP_HOST: OnceLock<Regex> = OnceLock::new();
static FREE_TLD: OnceLock<Regex> = OnceLock::new();
static SHORTENER_HOST: OnceLock<Regex> = OnceLock::new();

fn url() -> &'static Regex {
    URL.get_or_init(|| Regex::new(r"https?://\S+").expect("valid URL pattern"))
}

fn ip_host() -> &'static Regex {
    IP_HOST.get_or_init(|| {
        Regex::new(r"[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}").expect("valid IP pattern")
    })
}

fn free_tld() -> &'static Regex {
    FREE_TLD.get_or_init(|| Regex::new(r"\.(tk|ml|ga|cf|gq)/").expect("valid TLD pattern"))
}

fn shortener_host() -> &'static Regex {
    SHORTENER_HOST
        .get_or_init(|| Regex::new(r"bit\.ly|tinyurl|goo\.gl").expect("valid shortener pattern"))
}

/// Why a link looks suspicious
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UrlFlag {
    IpAddress,
    FreeTld,
    Shortener,
}

impl std::fmt::Display for UrlFlag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UrlFlag::IpAddress => write!(f, "IP address instead of a domain"),
            UrlFlag::FreeTld => write!(f, "free top-level domain"),
            UrlFlag::Shortener => write!(f, "link shortener"),
        }
    }
}

/// A link found in the email body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UrlInsight {
    pub url: String,
    pub flags: Vec<UrlFlag>,
}

impl UrlInsight {
    pub fn is_suspicious(&self) -> bool {
        !self.flags.is_empty()
    }
}

/// Every `http(s)://` link in order of appearance
pub fn extract_urls(text: &str) -> Vec<UrlInsight> {
    url()
        .find_iter(text)
        .map(|m| {
            let link = m.as_str();
            let flags = [
                (ip_host(), UrlFlag::IpAddress),
                (free_tld(), UrlFlag::FreeTld),
                (shortener_host(), UrlFlag::Shortener),
            ]
            .into_iter()
            .filter(|(re, _)| re.is_match(link))
            .map(|(_, flag)| flag)
            .collect();
            UrlInsight {
                url: link.to_string(),
                flags,
            }
        })
        .collect()
}
