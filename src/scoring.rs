use crate::detection::{Anomaly, Severity};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const MAX_SCORE: u32 = 100;

const MEDIUM_TIER_FLOOR: u8 = 30;
const CRITICAL_TIER_FLOOR: u8 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    Minimal,
    Low,
    Medium,
    Critical,
}

impl RiskTier {
    pub fn from_score(score: u8) -> Self {
        match score {
            0 => RiskTier::Minimal,
            s if s < MEDIUM_TIER_FLOOR => RiskTier::Low,
            s if s < CRITICAL_TIER_FLOOR => RiskTier::Medium,
            _ => RiskTier::Critical,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTier::Minimal => "minimal",
            RiskTier::Low => "low",
            RiskTier::Medium => "medium",
            RiskTier::Critical => "critical",
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub score: u8,
    pub tier: RiskTier,
    pub anomaly_count: usize,
}

pub fn severity_points(severity: Severity) -> u32 {
    match severity {
        Severity::Low => 10,
        Severity::Medium => 25,
        Severity::High => 40,
    }
}

/// Sum of severity points, capped at 100, bucketed into a tier.
pub fn score(anomalies: &[Anomaly]) -> RiskAssessment {
    let raw = anomalies
        .iter()
        .fold(0u32, |total, anomaly| {
            total.saturating_add(severity_points(anomaly.severity))
        });
    let score = raw.min(MAX_SCORE) as u8;
    let tier = RiskTier::from_score(score);

    log::debug!(
        "Scored {} anomalies: raw {} -> {} ({})",
        anomalies.len(),
        raw,
        score,
        tier
    );

    RiskAssessment {
        score,
        tier,
        anomaly_count: anomalies.len(),
    }
}
