use crate::detection::Anomaly;
use crate::email::EmailRecord;
use crate::scoring::RiskAssessment;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

const RULE_WIDTH: usize = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for ReportFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(ReportFormat::Text),
            "json" => Ok(ReportFormat::Json),
            other => anyhow::bail!("unknown report format '{}' (expected text or json)", other),
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportFormat::Text => f.write_str("text"),
            ReportFormat::Json => f.write_str("json"),
        }
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    email: &'a EmailRecord,
    anomalies: &'a [Anomaly],
    assessment: &'a RiskAssessment,
}

pub fn render_text<W: Write>(
    out: &mut W,
    record: &EmailRecord,
    anomalies: &[Anomaly],
    assessment: &RiskAssessment,
) -> std::io::Result<()> {
    let heavy = "=".repeat(RULE_WIDTH);
    let light = "-".repeat(RULE_WIDTH);

    writeln!(out, "{}", heavy)?;
    writeln!(out, "EMAIL ANALYSIS REPORT")?;
    writeln!(out, "{}", heavy)?;
    writeln!(out)?;

    writeln!(out, "INFORMATION")?;
    writeln!(out, "{}", light)?;
    writeln!(out, "From    : {}", record.sender)?;
    writeln!(out, "To      : {}", record.recipient)?;
    writeln!(out, "Subject : {}", record.subject)?;
    writeln!(out)?;

    writeln!(out, "ASSESSMENT")?;
    writeln!(out, "{}", light)?;
    writeln!(out, "Score   : {}/100", assessment.score)?;
    writeln!(out, "Tier    : {}", assessment.tier.as_str().to_uppercase())?;
    writeln!(out)?;

    writeln!(out, "ANOMALIES ({})", anomalies.len())?;
    writeln!(out, "{}", light)?;
    if anomalies.is_empty() {
        writeln!(out, "No anomalies detected.")?;
    } else {
        for (i, anomaly) in anomalies.iter().enumerate() {
            writeln!(out, "{}. [{}] {}", i + 1, anomaly.severity, anomaly.description)?;
        }
    }

    writeln!(out)?;
    writeln!(out, "{}", heavy)?;
    Ok(())
}

pub fn render_json<W: Write>(
    out: &mut W,
    record: &EmailRecord,
    anomalies: &[Anomaly],
    assessment: &RiskAssessment,
) -> anyhow::Result<()> {
    let report = JsonReport {
        email: record,
        anomalies,
        assessment,
    };
    serde_json::to_writer_pretty(&mut *out, &report)?;
    writeln!(out)?;
    Ok(())
}

pub fn render<W: Write>(
    out: &mut W,
    format: ReportFormat,
    record: &EmailRecord,
    anomalies: &[Anomaly],
    assessment: &RiskAssessment,
) -> anyhow::Result<()> {
    match format {
        ReportFormat::Text => render_text(out, record, anomalies, assessment)?,
        ReportFormat::Json => render_json(out, record, anomalies, assessment)?,
    }
    Ok(())
}

/// Write the report to `path`, replacing any existing file.
pub fn export_report<P: AsRef<Path>>(
    path: P,
    format: ReportFormat,
    record: &EmailRecord,
    anomalies: &[Anomaly],
    assessment: &RiskAssessment,
) -> anyhow::Result<PathBuf> {
    let path = path.as_ref();
    let file = File::create(path)
        .with_context(|| format!("failed to create report file {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    render(&mut writer, format, record, anomalies, assessment)
        .with_context(|| format!("failed to write report to {}", path.display()))?;
    writer
        .flush()
        .with_context(|| format!("failed to write report to {}", path.display()))?;

    log::debug!("Wrote {} report to {}", format, path.display());
    Ok(path.to_path_buf())
}
