//! SpeedPlan Core - site speed optimization plans and Lighthouse verification
//!
//! SpeedPlan Core holds the data contract between the plan generator and the
//! user interface, plus the deterministic pieces that turn a pasted
//! Lighthouse report into something the interface can colour-code.
//!
//! # Architecture
//!
//! Components, leaf first:
//!
//! 1. **Metric Classifier** (`classifier`): display string + metric kind to a status bucket
//! 2. **Report Parser** (`report`): Lighthouse JSON to a normalized [`LighthouseResult`]
//! 3. **Plan contract** (`plan`): request input, response decoding and the [`PlanSource`] capability
//! 4. **UI Shell** (`shell`): the single tagged state value driving the interface
//!
//! # Quick Start
//!
//! ```
//! use speedplan_core::classifier::{classify, MetricKind, MetricStatus};
//! use speedplan_core::report::parse_report_at;
//!
//! let raw = r#"{
//!     "categories": { "performance": { "score": 0.87 } },
//!     "audits": { "largest-contentful-paint": { "displayValue": "2.7 s" } }
//! }"#;
//!
//! let result = parse_report_at(raw, "10:42:00").unwrap();
//! assert_eq!(result.score, 87);
//! assert_eq!(result.metrics.tbt, "N/A");
//! assert_eq!(
//!     classify(&result.metrics.lcp, MetricKind::Lcp),
//!     MetricStatus::NeedsImprovement
//! );
//! ```

#![deny(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    clippy::all
)]

pub mod classifier;
pub mod comparison;
pub mod error;
pub mod plan;
pub mod report;
pub mod score;
pub mod shell;
pub mod types;

pub use classifier::{classify, MetricKind, MetricStatus};
pub use comparison::{MetricReading, ScoreComparison};
pub use error::{PlanError, ReportError, Result, ShellError, SpeedPlanError};
pub use plan::{decode_plan, PlanRequest, PlanSource};
pub use report::{parse_report, parse_report_at, read_report};
pub use score::ScoreBand;
pub use shell::{AnalysisState, ComparisonState, Shell, ShellView, Tab};
pub use types::{
    Category, CoreWebVitals, Difficulty, Impact, LighthouseResult, OptimizationTask,
    SpeedAuditPlan,
};

/// Version of SpeedPlan Core
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Placeholder shown for any metric the report does not carry
pub const NOT_AVAILABLE: &str = "N/A";
