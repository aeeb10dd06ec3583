use super::{Anomaly, Severity};
use crate::email::EmailRecord;
use lazy_static::lazy_static;
use regex::Regex;

pub const SHORTENER_DOMAINS: [&str; 4] = ["bit.ly", "tinyurl", "t.co", "goo.gl"];

lazy_static! {
    static ref URL_REGEX: Regex = Regex::new(r#"(?i)https?://[^\s<>"]+"#).unwrap();
    static ref SHORTENER_REGEX: Regex = Regex::new(&format!(
        "(?i)({})",
        SHORTENER_DOMAINS
            .iter()
            .map(|domain| regex::escape(domain))
            .collect::<Vec<_>>()
            .join("|")
    ))
    .unwrap();
    // Shape only, octets are not range checked
    static ref IPV4_REGEX: Regex = Regex::new(r"\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3}").unwrap();
}

/// Every http(s) URL in the text, in order of appearance.
pub fn extract_urls(text: &str) -> Vec<&str> {
    URL_REGEX.find_iter(text).map(|m| m.as_str()).collect()
}

pub fn is_shortened_url(url: &str) -> bool {
    SHORTENER_REGEX.is_match(url)
}

pub fn has_ip_address(url: &str) -> bool {
    IPV4_REGEX.is_match(url)
}

/// Each URL is classified on its own and may produce both findings.
pub fn check_links(record: &EmailRecord, anomalies: &mut Vec<Anomaly>) {
    for url in extract_urls(&record.body) {
        if is_shortened_url(url) {
            anomalies.push(Anomaly::new(
                Severity::Medium,
                format!("shortened URL: {}", url),
            ));
        }

        if has_ip_address(url) {
            anomalies.push(Anomaly::new(
                Severity::High,
                format!("URL with IP address: {}", url),
            ));
        }
    }
}
