//! Data model shared by the plan generator, the report parser and the interface

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How hard a task is to carry out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    /// A few clicks in a settings page
    Easy,
    /// Needs some care or a plugin swap
    Medium,
    /// Developer or host involvement
    Hard,
}

impl Difficulty {
    /// Every accepted value, in schema order
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Wire label
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

/// Where a task is carried out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Install or configure a plugin
    Plugin,
    /// Hosting panel or server level
    Hosting,
    /// Theme or custom code
    Code,
    /// WordPress or Elementor settings
    Configuration,
}

impl Category {
    /// Every accepted value, in schema order
    pub const ALL: [Category; 4] = [
        Category::Plugin,
        Category::Hosting,
        Category::Code,
        Category::Configuration,
    ];

    /// Wire label
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Plugin => "Plugin",
            Category::Hosting => "Hosting",
            Category::Code => "Code",
            Category::Configuration => "Configuration",
        }
    }
}

/// Expected effect of a task on the performance score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Impact {
    /// Large score movement
    High,
    /// Noticeable score movement
    Medium,
    /// Marginal gain
    Low,
}

impl Impact {
    /// Every accepted value, in schema order
    pub const ALL: [Impact; 3] = [Impact::High, Impact::Medium, Impact::Low];

    /// Wire label
    pub fn as_str(&self) -> &'static str {
        match self {
            Impact::High => "High",
            Impact::Medium => "Medium",
            Impact::Low => "Low",
        }
    }
}

/// Value outside one of the closed label sets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownLabel(pub String);

impl fmt::Display for UnknownLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown label '{}'", self.0)
    }
}

impl std::error::Error for UnknownLabel {}

macro_rules! label_impls {
    ($($ty:ty),*) => {
        $(
            impl FromStr for $ty {
                type Err = UnknownLabel;

                fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                    <$ty>::ALL
                        .into_iter()
                        .find(|v| v.as_str() == s)
                        .ok_or_else(|| UnknownLabel(s.to_string()))
                }
            }

            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.as_str())
                }
            }
        )*
    };
}

label_impls!(Difficulty, Category, Impact);

/// One step of an optimization plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationTask {
    /// Short imperative title
    pub title: String,

    /// Effort required
    pub difficulty: Difficulty,

    /// Area of the stack touched
    pub category: Category,

    /// Expected score effect
    pub impact: Impact,

    /// Step-by-step instructions
    pub instructions: String,

    /// Plugins or tools involved, in the order given
    pub tools: Vec<String>,
}

/// Structured optimization checklist for one site
///
/// Produced once per successful analysis and replaced wholesale, never
/// edited field by field. Task order is display order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeedAuditPlan {
    /// Site the plan was requested for (always the caller's input)
    pub site_url: String,

    /// Estimated current performance score, 0..=100
    pub estimated_current_score: u8,

    /// Strategic summary of the bottlenecks
    pub summary: String,

    /// Ordered tasks
    pub tasks: Vec<OptimizationTask>,
}

/// Core Web Vitals as display strings, e.g. `"2.4 s"` or `"N/A"`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreWebVitals {
    /// First Contentful Paint
    pub fcp: String,
    /// Largest Contentful Paint
    pub lcp: String,
    /// Total Blocking Time
    pub tbt: String,
    /// Cumulative Layout Shift
    pub cls: String,
    /// Speed Index
    pub si: String,
}

/// Normalized view of a parsed Lighthouse report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LighthouseResult {
    /// Performance score, 0..=100
    pub score: u8,

    /// Tracked metrics
    pub metrics: CoreWebVitals,

    /// Local wall-clock time the report was parsed
    pub timestamp: String,
}
