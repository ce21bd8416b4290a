//! Report Parser
//!
//! Reads the JSON of a Lighthouse / PageSpeed Insights run (schema v8 to v10)
//! and keeps only the performance score and the five tracked audits. Every
//! other audit in the document is ignored.

use chrono::Local;
use serde_json::Value;
use std::path::Path;

use crate::classifier::MetricKind;
use crate::error::{ReportError, ResultExt};
use crate::score::score_from_fraction;
use crate::types::{CoreWebVitals, LighthouseResult};
use crate::NOT_AVAILABLE;

/// Category holding the performance score
pub const PERFORMANCE_CATEGORY: &str = "performance";

/// Local time format stamped on parsed results
pub const TIMESTAMP_FORMAT: &str = "%H:%M:%S";

/// Parse a pasted report, stamping it with the current local time
pub fn parse_report(raw: &str) -> Result<LighthouseResult, ReportError> {
    if raw.trim().is_empty() {
        return Err(ReportError::Empty);
    }
    let timestamp = Local::now().format(TIMESTAMP_FORMAT).to_string();
    parse_report_at(raw, timestamp)
}

/// Read and parse a saved report file
pub fn read_report(path: impl AsRef<Path>) -> crate::Result<LighthouseResult> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read report {}", path.display()))?;
    Ok(parse_report(&raw)?)
}

/// Parse a pasted report with a caller-supplied timestamp
pub fn parse_report_at(
    raw: &str,
    timestamp: impl Into<String>,
) -> Result<LighthouseResult, ReportError> {
    if raw.trim().is_empty() {
        return Err(ReportError::Empty);
    }

    let document: Value =
        serde_json::from_str(raw).map_err(|e| ReportError::InvalidFormat(e.to_string()))?;

    if document.is_null() {
        return Err(ReportError::InvalidFormat(
            "report document is null".to_string(),
        ));
    }

    let audits = document.get("audits");
    let metrics = CoreWebVitals {
        fcp: display_value(audits, MetricKind::Fcp),
        lcp: display_value(audits, MetricKind::Lcp),
        tbt: display_value(audits, MetricKind::Tbt),
        cls: display_value(audits, MetricKind::Cls),
        si: display_value(audits, MetricKind::Si),
    };

    let score = performance_score(&document);
    tracing::debug!(score, "Parsed Lighthouse report");

    Ok(LighthouseResult {
        score,
        metrics,
        timestamp: timestamp.into(),
    })
}

/// `categories.performance.score` scaled to 0..=100; 0 when absent or null
fn performance_score(document: &Value) -> u8 {
    document
        .get("categories")
        .and_then(|c| c.get(PERFORMANCE_CATEGORY))
        .and_then(|p| p.get("score"))
        .and_then(Value::as_f64)
        .map(score_from_fraction)
        .unwrap_or(0)
}

fn display_value(audits: Option<&Value>, kind: MetricKind) -> String {
    audits
        .and_then(|a| a.get(kind.audit_id()))
        .and_then(|audit| audit.get("displayValue"))
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .unwrap_or(NOT_AVAILABLE)
        .to_string()
}
