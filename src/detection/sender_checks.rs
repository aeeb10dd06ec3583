use super::{Anomaly, Severity};
use crate::email::EmailRecord;
use lazy_static::lazy_static;
use regex::Regex;

const MAX_DOMAIN_HYPHENS: usize = 2;
const MAX_DOMAIN_DIGITS: usize = 3;

lazy_static! {
    static ref DOMAIN_REGEX: Regex = Regex::new(r"@([\w.-]+)").unwrap();
}

/// Lower-cased domain following the first `@` of an address or header value.
pub fn extract_sender_domain(sender: &str) -> Option<String> {
    DOMAIN_REGEX
        .captures(sender)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_lowercase())
}

/// Machine-generated look: too many hyphens or digits.
pub fn is_suspicious_domain(domain: &str) -> bool {
    let hyphens = domain.chars().filter(|c| *c == '-').count();
    // Any script's decimal digits; letter-like numerals (Nl) are excluded
    let digits = domain
        .chars()
        .filter(|c| c.is_numeric() && !c.is_alphabetic())
        .count();
    hyphens > MAX_DOMAIN_HYPHENS || digits > MAX_DOMAIN_DIGITS
}

pub fn check_sender_domain(record: &EmailRecord, anomalies: &mut Vec<Anomaly>) {
    let Some(domain) = extract_sender_domain(&record.sender) else {
        return;
    };

    if is_suspicious_domain(&domain) {
        anomalies.push(Anomaly::new(
            Severity::Medium,
            format!("suspicious domain: {}", domain),
        ));
    }
}

/// Replies routed somewhere other than the visible sender. Exact comparison
/// of the raw header values.
pub fn check_reply_to(record: &EmailRecord, anomalies: &mut Vec<Anomaly>) {
    if !record.reply_to.is_empty() && record.reply_to != record.sender {
        anomalies.push(Anomaly::new(
            Severity::High,
            format!("differing Reply-To: {}", record.reply_to),
        ));
    }
}
