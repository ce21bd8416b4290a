//! Before/after comparison of the estimated score and a parsed report

use serde::{Deserialize, Serialize};

use crate::classifier::{classify, MetricKind, MetricStatus};
use crate::score::ScoreBand;
use crate::types::{LighthouseResult, SpeedAuditPlan};

/// "Before" score used when no plan estimate is available
pub const DEFAULT_BEFORE_SCORE: u8 = 45;

/// One labelled metric as shown on the comparison panel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricReading {
    /// Which metric
    pub kind: MetricKind,
    /// Short label, e.g. `"LCP"`
    pub label: String,
    /// Display string taken from the report
    pub value: String,
    /// Status bucket
    pub status: MetricStatus,
}

impl MetricReading {
    fn new(kind: MetricKind, value: &str) -> Self {
        Self {
            kind,
            label: kind.label().to_string(),
            value: value.to_string(),
            status: classify(value, kind),
        }
    }
}

impl LighthouseResult {
    /// Colour-coded readings in panel order: LCP, TBT, CLS, SI
    pub fn readings(&self) -> Vec<MetricReading> {
        vec![
            MetricReading::new(MetricKind::Lcp, &self.metrics.lcp),
            MetricReading::new(MetricKind::Tbt, &self.metrics.tbt),
            MetricReading::new(MetricKind::Cls, &self.metrics.cls),
            MetricReading::new(MetricKind::Si, &self.metrics.si),
        ]
    }

    /// FCP reading; informational only
    pub fn first_paint(&self) -> MetricReading {
        MetricReading::new(MetricKind::Fcp, &self.metrics.fcp)
    }

    /// Band of the report's score
    pub fn band(&self) -> ScoreBand {
        ScoreBand::of(self.score)
    }
}

impl SpeedAuditPlan {
    /// Band of the estimated score
    pub fn band(&self) -> ScoreBand {
        ScoreBand::of(self.estimated_current_score)
    }
}

/// Estimated score against a measured one
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreComparison {
    /// Estimated score before optimization
    pub before: u8,
    /// Band of `before`
    pub before_band: ScoreBand,
    /// Measured score of the latest run
    pub after: u8,
    /// Band of `after`
    pub after_band: ScoreBand,
    /// `after - before`
    pub delta: i16,
    /// Readings of the latest run
    pub readings: Vec<MetricReading>,
    /// When the latest run was parsed
    pub timestamp: String,
}

impl ScoreComparison {
    /// Compare a parsed report against an optional plan estimate
    pub fn new(plan: Option<&SpeedAuditPlan>, result: &LighthouseResult) -> Self {
        let before = plan
            .map(|p| p.estimated_current_score)
            .unwrap_or(DEFAULT_BEFORE_SCORE);
        Self::against(before, result)
    }

    /// Compare a parsed report against an explicit "before" score
    pub fn against(before: u8, result: &LighthouseResult) -> Self {
        Self {
            before,
            before_band: ScoreBand::of(before),
            after: result.score,
            after_band: result.band(),
            delta: i16::from(result.score) - i16::from(before),
            readings: result.readings(),
            timestamp: result.timestamp.clone(),
        }
    }

    /// Whether the measured score beats the estimate
    pub fn improved(&self) -> bool {
        self.delta > 0
    }
}
