use anyhow::Context;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Placeholder for a missing From/To header.
pub const UNKNOWN_ADDRESS: &str = "Inconnu";

lazy_static! {
    static ref SCRIPT_STYLE_REGEX: Regex =
        Regex::new(r"(?is)<(script|style)\b[^>]*>.*?</(script|style)\s*>").unwrap();
    static ref COMMENT_REGEX: Regex = Regex::new(r"(?s)<!--.*?-->").unwrap();
    static ref TAG_REGEX: Regex = Regex::new(r"<[^>]*>").unwrap();
    static ref NUMERIC_ENTITY_REGEX: Regex =
        Regex::new(r"&#([xX][0-9a-fA-F]{1,6}|\d{1,7});").unwrap();
    static ref WHITESPACE_REGEX: Regex = Regex::new(r"\s+").unwrap();
}

/// The fields of one message that the detection rules look at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailRecord {
    pub sender: String,
    pub recipient: String,
    pub subject: String,
    pub date: String,
    pub reply_to: String,
    pub body: String,
}

impl Default for EmailRecord {
    fn default() -> Self {
        Self {
            sender: UNKNOWN_ADDRESS.to_string(),
            recipient: UNKNOWN_ADDRESS.to_string(),
            subject: String::new(),
            date: String::new(),
            reply_to: String::new(),
            body: String::new(),
        }
    }
}

/// Read and parse an `.eml` file. Invalid UTF-8 is replaced, not rejected.
pub fn parse_email_file<P: AsRef<Path>>(path: P) -> anyhow::Result<EmailRecord> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)
        .with_context(|| format!("failed to read email file {}", path.display()))?;
    let content = String::from_utf8_lossy(&bytes);
    log::debug!("Read {} bytes from {}", bytes.len(), path.display());
    Ok(parse_email(&content))
}

/// Split raw message text into an [`EmailRecord`].
///
/// Only the header block (up to the first empty line) is searched for
/// headers. Folded header lines are joined with a single space and the last
/// occurrence of a repeated header wins. Bodies that look like HTML are
/// reduced to plain text.
pub fn parse_email(raw: &str) -> EmailRecord {
    let content = raw.replace("\r\n", "\n");
    let mut record = EmailRecord::default();

    let (header_block, body) = match content.split_once("\n\n") {
        Some((headers, body)) => (headers, body),
        None => (content.as_str(), ""),
    };

    let mut headers: Vec<(String, String)> = Vec::new();
    for line in header_block.lines() {
        if line.starts_with(' ') || line.starts_with('\t') {
            if let Some((_, value)) = headers.last_mut() {
                value.push(' ');
                value.push_str(line.trim());
            }
            continue;
        }

        if let Some((key, value)) = line.split_once(':') {
            headers.push((key.trim().to_lowercase(), value.trim().to_string()));
        }
    }

    for (key, value) in headers {
        if value.is_empty() {
            continue;
        }
        match key.as_str() {
            "from" => record.sender = value,
            "to" => record.recipient = value,
            "subject" => record.subject = value,
            "date" => record.date = value,
            "reply-to" => record.reply_to = value,
            _ => {}
        }
    }

    let body = body.trim();
    let lowered = body.to_lowercase();
    record.body = if lowered.contains("<html") || lowered.contains("<body") {
        log::debug!("HTML body detected, reducing to text");
        html_to_text(body)
    } else {
        body.to_string()
    };

    record
}

/// Strip markup from an HTML fragment, leaving space-separated text.
pub fn html_to_text(html: &str) -> String {
    let text = SCRIPT_STYLE_REGEX.replace_all(html, " ");
    let text = COMMENT_REGEX.replace_all(&text, " ");
    let text = TAG_REGEX.replace_all(&text, " ");
    let text = decode_html_entities(&text);
    WHITESPACE_REGEX.replace_all(&text, " ").trim().to_string()
}

fn decode_html_entities(text: &str) -> String {
    let decoded = NUMERIC_ENTITY_REGEX.replace_all(text, |caps: &regex::Captures| {
        let reference = &caps[1];
        let code = match reference.strip_prefix(|c| c == 'x' || c == 'X') {
            Some(hex) => u32::from_str_radix(hex, 16).ok(),
            None => reference.parse::<u32>().ok(),
        };
        code.and_then(char::from_u32)
            .map(|c| c.to_string())
            .unwrap_or_else(|| caps[0].to_string())
    });

    let entities = [
        ("&nbsp;", " "),
        ("&lt;", "<"),
        ("&gt;", ">"),
        ("&quot;", "\""),
        ("&apos;", "'"),
    ];

    let mut result = decoded.into_owned();
    for (entity, replacement) in &entities {
        result = result.replace(entity, replacement);
    }
    // Last, so "&amp;lt;" stays "&lt;"
    result.replace("&amp;", "&")
}
