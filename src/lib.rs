pub mod config;
pub mod detection;
pub mod email;
pub mod report;
pub mod scoring;

pub use config::Config;
pub use detection::{detect, Anomaly, DetectionEngine, Severity};
pub use email::{parse_email, parse_email_file, EmailRecord};
pub use report::{export_report, ReportFormat};
pub use scoring::{score, RiskAssessment, RiskTier};

use serde::{Deserialize, Serialize};

/// Findings and verdict for one message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Analysis {
    pub anomalies: Vec<Anomaly>,
    pub assessment: RiskAssessment,
}

/// Detect then score a single record.
pub fn analyze(record: &EmailRecord) -> Analysis {
    let anomalies = detect(record);
    let assessment = score(&anomalies);
    Analysis {
        anomalies,
        assessment,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(sender: &str, reply_to: &str, subject: &str, body: &str) -> EmailRecord {
        EmailRecord {
            sender: sender.to_string(),
            reply_to: reply_to.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_suspicious_sender_domain_scenario() {
        let analysis = analyze(&record("service@my-bank-12345.com", "", "", ""));
        assert_eq!(analysis.anomalies.len(), 1);
        assert_eq!(analysis.anomalies[0].severity, Severity::Medium);
        assert_eq!(
            analysis.anomalies[0].description,
            "suspicious domain: my-bank-12345.com"
        );
        assert_eq!(analysis.assessment.score, 25);
        assert_eq!(analysis.assessment.tier, RiskTier::Low);
        assert_eq!(analysis.assessment.anomaly_count, 1);
    }

    #[test]
    fn test_reply_to_and_ip_url_scenario() {
        let analysis = analyze(&record(
            "a@b.com",
            "c@d.com",
            "",
            "Sign in: http://192.168.1.5/login",
        ));
        assert_eq!(analysis.anomalies.len(), 2);
        assert!(analysis
            .anomalies
            .iter()
            .all(|a| a.severity == Severity::High));
        assert_eq!(analysis.assessment.score, 80);
        assert_eq!(analysis.assessment.tier, RiskTier::Critical);
    }

    #[test]
    fn test_keyword_scenario() {
        let analysis = analyze(&record(
            "Inconnu",
            "",
            "Urgent",
            "Please confirm your password now",
        ));
        assert_eq!(analysis.anomalies.len(), 1);
        assert_eq!(
            analysis.anomalies[0].description,
            "phishing keywords: urgent, confirm, password"
        );
        assert_eq!(analysis.assessment.score, 40);
        assert_eq!(analysis.assessment.tier, RiskTier::Medium);
    }

    #[test]
    fn test_shortened_url_scenario() {
        let analysis = analyze(&record("", "", "", "Details at http://bit.ly/xyz"));
        assert_eq!(analysis.anomalies.len(), 1);
        assert_eq!(analysis.anomalies[0].severity, Severity::Medium);
        assert_eq!(analysis.assessment.score, 25);
        assert_eq!(analysis.assessment.tier, RiskTier::Low);
    }

    #[test]
    fn test_parsed_message_end_to_end() {
        let raw = "From: PayPal Security <alert@secure-paypal-login-8842.com>\r\n\
                   To: you@example.com\r\n\
                   Reply-To: refunds@mailbox.example\r\n\
                   Subject: Action required: account blocked\r\n\
                   \r\n\
                   <html><body><p>Click here: \
                   <a href=\"http://203.0.113.7/verify\">http://203.0.113.7/verify</a>\
                   </p></body></html>\r\n";

        let record = parse_email(raw);
        let analysis = analyze(&record);
        let descriptions: Vec<&str> = analysis
            .anomalies
            .iter()
            .map(|a| a.description.as_str())
            .collect();

        assert_eq!(
            descriptions,
            vec![
                "suspicious domain: secure-paypal-login-8842.com",
                "differing Reply-To: refunds@mailbox.example",
                "URL with IP address: http://203.0.113.7/verify",
                "phishing keywords: action required, account blocked, click here, verify",
            ]
        );
        assert_eq!(analysis.assessment.score, 100);
        assert_eq!(analysis.assessment.tier, RiskTier::Critical);
        assert_eq!(analysis.assessment.anomaly_count, 4);
    }

    #[test]
    fn test_clean_message() {
        let raw = "From: Alice <alice@example.com>\nTo: bob@example.com\nSubject: Lunch\n\n\
                   See you at noon, menu at https://example.org/menu";
        let analysis = analyze(&parse_email(raw));
        assert!(analysis.anomalies.is_empty());
        assert_eq!(analysis.assessment.score, 0);
        assert_eq!(analysis.assessment.tier, RiskTier::Minimal);
    }
}
