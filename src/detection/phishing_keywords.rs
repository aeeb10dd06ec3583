use super::{Anomaly, Severity};
use crate::email::EmailRecord;
use lazy_static::lazy_static;
use regex::Regex;

pub const PHISHING_KEYWORDS: [&str; 8] = [
    "urgent",
    "action required",
    "account blocked",
    "click here",
    "verify",
    "confirm",
    "password",
    "winner",
];

/// Distinct keywords needed before the rule fires.
pub const MIN_KEYWORD_MATCHES: usize = 2;

lazy_static! {
    static ref KEYWORD_PATTERNS: Vec<(&'static str, Regex)> = PHISHING_KEYWORDS
        .iter()
        .map(|keyword| {
            let pattern = format!(r"(?i)\b{}\b", regex::escape(keyword));
            (*keyword, Regex::new(&pattern).unwrap())
        })
        .collect();
}

/// Keywords present as whole words in subject or body, in list order.
pub fn matched_keywords(subject: &str, body: &str) -> Vec<&'static str> {
    let text = format!("{} {}", subject.to_lowercase(), body.to_lowercase());

    KEYWORD_PATTERNS
        .iter()
        .filter(|(_, regex)| regex.is_match(&text))
        .map(|(keyword, _)| *keyword)
        .collect()
}

/// A single finding listing every matched keyword, or nothing when fewer
/// than two matched.
pub fn check_keywords(record: &EmailRecord, anomalies: &mut Vec<Anomaly>) {
    let found = matched_keywords(&record.subject, &record.body);

    if found.len() >= MIN_KEYWORD_MATCHES {
        anomalies.push(Anomaly::new(
            Severity::High,
            format!("phishing keywords: {}", found.join(", ")),
        ));
    }
}
