//! Metric Classifier
//!
//! Maps a metric's display string to one of three status buckets. Only LCP,
//! CLS and TBT carry thresholds; every other metric is reported `good`.
//!
//! | kind | good | needs-improvement | poor |
//! |---|---|---|---|
//! | LCP (s) | < 2.5 | 2.5 ..< 4.0 | >= 4.0 |
//! | CLS | < 0.1 | 0.1 ..< 0.25 | >= 0.25 |
//! | TBT (ms) | < 200 | 200 ..< 600 | >= 600 |
//!
//! `"N/A"` is always `good`. A value that yields no number once the units are
//! stripped is `poor`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::NOT_AVAILABLE;

/// Three-level status bucket for a single metric
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MetricStatus {
    /// Nothing to flag
    Good,
    /// Between the good and poor thresholds
    NeedsImprovement,
    /// At or past the poor threshold
    Poor,
}

impl MetricStatus {
    /// Wire label
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricStatus::Good => "good",
            MetricStatus::NeedsImprovement => "needs-improvement",
            MetricStatus::Poor => "poor",
        }
    }
}

impl fmt::Display for MetricStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metric a display value belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricKind {
    /// First Contentful Paint
    Fcp,
    /// Largest Contentful Paint, seconds
    Lcp,
    /// Total Blocking Time, milliseconds
    Tbt,
    /// Cumulative Layout Shift, unitless
    Cls,
    /// Speed Index
    Si,
}

impl MetricKind {
    /// Every kind, in report order
    pub const ALL: [MetricKind; 5] = [
        MetricKind::Fcp,
        MetricKind::Lcp,
        MetricKind::Tbt,
        MetricKind::Cls,
        MetricKind::Si,
    ];

    /// Short uppercase label used by the interface
    pub fn label(&self) -> &'static str {
        match self {
            MetricKind::Fcp => "FCP",
            MetricKind::Lcp => "LCP",
            MetricKind::Tbt => "TBT",
            MetricKind::Cls => "CLS",
            MetricKind::Si => "SI",
        }
    }

    /// Lighthouse audit identifier carrying this metric
    pub fn audit_id(&self) -> &'static str {
        match self {
            MetricKind::Fcp => "first-contentful-paint",
            MetricKind::Lcp => "largest-contentful-paint",
            MetricKind::Tbt => "total-blocking-time",
            MetricKind::Cls => "cumulative-layout-shift",
            MetricKind::Si => "speed-index",
        }
    }

    fn thresholds(&self) -> Option<Thresholds> {
        match self {
            MetricKind::Lcp => Some(Thresholds::new(2.5, 4.0)),
            MetricKind::Cls => Some(Thresholds::new(0.1, 0.25)),
            MetricKind::Tbt => Some(Thresholds::new(200.0, 600.0)),
            MetricKind::Fcp | MetricKind::Si => None,
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label().to_ascii_lowercase())
    }
}

impl FromStr for MetricKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MetricKind::ALL
            .into_iter()
            .find(|k| k.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown metric kind '{}'", s))
    }
}

/// `good` below the first bound, `poor` from the second
#[derive(Debug, Clone, Copy)]
struct Thresholds {
    good_below: f64,
    poor_from: f64,
}

impl Thresholds {
    const fn new(good_below: f64, poor_from: f64) -> Self {
        Self {
            good_below,
            poor_from,
        }
    }

    fn bucket(&self, value: f64) -> MetricStatus {
        if value < self.good_below {
            MetricStatus::Good
        } else if value < self.poor_from {
            MetricStatus::NeedsImprovement
        } else {
            MetricStatus::Poor
        }
    }
}

/// Classify a display value such as `"2.4 s"` or `"1,230 ms"`
pub fn classify(display_value: &str, kind: MetricKind) -> MetricStatus {
    if display_value == NOT_AVAILABLE {
        return MetricStatus::Good;
    }

    let Some(thresholds) = kind.thresholds() else {
        return MetricStatus::Good;
    };

    match parse_display_number(display_value) {
        Some(value) => thresholds.bucket(value),
        // Unparseable values fail safe.
        None => MetricStatus::Poor,
    }
}

/// Keep only ASCII digits and `.`, then parse what is left
///
/// Returns `None` when nothing numeric remains or the remainder is not a
/// single decimal number (e.g. `"1.2.3"`).
pub fn parse_display_number(display_value: &str) -> Option<f64> {
    let numeric: String = display_value
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    numeric.parse::<f64>().ok().filter(|v| v.is_finite())
}
