//! CSV history export (RFC 4180 quoting)

use crate::models::HistoryEntry;

const HEADER: &[&str] = &[
    "id",
    "timestamp",
    "score",
    "status",
    "confidence",
    "keyword_matches",
    "url_issues",
    "sensitive_requests",
    "brand_impersonation",
    "reasons",
    "email_preview",
];

/// Quote a field when it holds a delimiter, a quote or a line break
fn field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn row(entry: &HistoryEntry) -> String {
    let r = &entry.result;
    let cells = [
        entry.id.clone(),
        entry.timestamp.to_rfc3339(),
        r.score.to_string(),
        r.risk_level().label().to_string(),
        r.confidence.to_string(),
        r.details.keyword_matches.to_string(),
        r.details.url_issues.to_string(),
        r.details.sensitive_requests.to_string(),
        r.details.brand_impersonation.to_string(),
        r.reasons.join("; "),
        r.email_preview.clone(),
    ];
    cells.iter().map(|c| field(c)).collect::<Vec<_>>().join(",")
}

/// Header plus one CRLF-terminated row per entry
pub fn render(entries: &[HistoryEntry]) -> String {
    let mut out = HEADER.join(",");
    out.push_str("\r\n");
    for entry in entries {
        out.push_str(&row(entry));
        out.push_str("\r\n");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporters::tests::{entries, PHISH};

    #[test]
    fn test_field_quoting() {
        assert_eq!(field("plain"), "plain");
        assert_eq!(field("a,b"), "\"a,b\"");
        assert_eq!(field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(field("two\nlines"), "\"two\nlines\"");
    }

    #[test]
    fn test_csv_header_and_rows() {
        let list = entries(&["See you soon", PHISH]);
        let csv = render(&list);
        let lines: Vec<&str> = csv.split("\r\n").collect();

        assert_eq!(lines[0], HEADER.join(","));
        // Two rows plus the trailing empty split
        assert_eq!(lines.len(), 4);
        assert!(lines[1].contains(",83,PHISHING,91,0,1,1,true,"));
        assert!(lines[2].contains(",0,SAFE,85,0,0,0,false,no indicators detected,See you soon"));
    }

    #[test]
    fn test_reason_with_quotes_is_escaped() {
        let list = entries(&["urgent, act now"]);
        let csv = render(&list);
        assert!(csv.contains("\"Creates false urgency: \"\"urgent\"\", \"\"act now\"\"\""));
    }
}
