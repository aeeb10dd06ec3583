pub mod phishing_keywords;
pub mod sender_checks;
pub mod suspicious_links;

use crate::email::EmailRecord;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }
}

/// Lenient label conversion: anything unrecognized is treated as `Low`.
impl From<&str> for Severity {
    fn from(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "high" => Severity::High,
            "medium" => Severity::Medium,
            _ => Severity::Low,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Anomaly {
    pub severity: Severity,
    pub description: String,
}

impl Anomaly {
    pub fn new(severity: Severity, description: String) -> Self {
        Self {
            severity,
            description,
        }
    }
}

/// A single check over the record. Rules only read the record and append
/// their findings; they never see each other's output.
pub struct Rule {
    pub name: &'static str,
    pub check: fn(&EmailRecord, &mut Vec<Anomaly>),
}

pub struct DetectionEngine {
    rules: Vec<Rule>,
}

impl Default for DetectionEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl DetectionEngine {
    pub fn new() -> Self {
        Self {
            rules: vec![
                Rule {
                    name: "sender_domain",
                    check: sender_checks::check_sender_domain,
                },
                Rule {
                    name: "reply_to_mismatch",
                    check: sender_checks::check_reply_to,
                },
                Rule {
                    name: "suspicious_links",
                    check: suspicious_links::check_links,
                },
                Rule {
                    name: "phishing_keywords",
                    check: phishing_keywords::check_keywords,
                },
            ],
        }
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|rule| rule.name).collect()
    }

    /// Run every rule in order. Findings keep rule order, then match order
    /// within a rule.
    pub fn detect(&self, record: &EmailRecord) -> Vec<Anomaly> {
        let mut anomalies = Vec::new();

        for rule in &self.rules {
            let before = anomalies.len();
            (rule.check)(record, &mut anomalies);

            for anomaly in &anomalies[before..] {
                log::debug!(
                    "Rule {} fired: [{}] {}",
                    rule.name,
                    anomaly.severity,
                    anomaly.description
                );
            }
        }

        anomalies
    }
}

/// Run the default rule set over one record.
pub fn detect(record: &EmailRecord) -> Vec<Anomaly> {
    DetectionEngine::new().detect(record)
}
