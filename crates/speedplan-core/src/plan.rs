//! Plan contract
//!
//! What the interface sends to a plan generator ([`PlanRequest`]), how the
//! generator's JSON text becomes a [`SpeedAuditPlan`] ([`decode_plan`]), and
//! the injected capability that performs the call ([`PlanSource`]).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::str::FromStr;

use crate::error::PlanError;
use crate::score::normalize_score;
use crate::types::{Category, Difficulty, Impact, OptimizationTask, SpeedAuditPlan};

/// Substituted when the hosting field is blank
pub const DEFAULT_HOSTING: &str = "Unknown/Generic Shared Hosting";

/// Substituted when the notes field is blank
pub const DEFAULT_NOTES: &str = "Standard Elementor setup";

/// User input for one analysis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanRequest {
    /// Absolute URL of the site, as entered
    pub site_url: String,
    /// Hosting provider, free text
    pub hosting: String,
    /// Additional context, free text
    pub notes: String,
}

impl PlanRequest {
    /// Build a request, rejecting anything that is not an absolute URL
    pub fn new(
        site_url: impl Into<String>,
        hosting: impl Into<String>,
        notes: impl Into<String>,
    ) -> Result<Self, PlanError> {
        let site_url = site_url.into().trim().to_string();

        url::Url::parse(&site_url).map_err(|e| PlanError::InvalidUrl {
            url: site_url.clone(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            site_url,
            hosting: hosting.into(),
            notes: notes.into(),
        })
    }

    /// Hosting text, or the generic fallback when blank
    pub fn hosting_or_default(&self) -> &str {
        non_blank(&self.hosting).unwrap_or(DEFAULT_HOSTING)
    }

    /// Notes text, or the generic fallback when blank
    pub fn notes_or_default(&self) -> &str {
        non_blank(&self.notes).unwrap_or(DEFAULT_NOTES)
    }
}

fn non_blank(s: &str) -> Option<&str> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}

/// Capability that turns a [`PlanRequest`] into a plan
///
/// Implementations make at most one attempt per call and never return a
/// partial plan.
#[async_trait]
pub trait PlanSource: Send + Sync + Debug {
    /// Request a plan for the given site
    async fn request_plan(&self, request: &PlanRequest) -> Result<SpeedAuditPlan, PlanError>;
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPlan {
    estimated_current_score: f64,
    summary: String,
    tasks: Vec<RawTask>,
}

#[derive(Debug, Deserialize)]
struct RawTask {
    title: String,
    difficulty: String,
    category: String,
    impact: String,
    instructions: String,
    tools: Vec<String>,
}

/// Decode the generator's response text into a plan for `site_url`
///
/// `site_url` always comes from the caller; any URL echoed back in the
/// response is ignored. Closed-set fields are checked here rather than
/// trusted.
pub fn decode_plan(site_url: &str, text: &str) -> Result<SpeedAuditPlan, PlanError> {
    if text.trim().is_empty() {
        return Err(PlanError::EmptyResponse);
    }

    let raw: RawPlan =
        serde_json::from_str(text).map_err(|e| PlanError::Decode(e.to_string()))?;

    let tasks = raw
        .tasks
        .into_iter()
        .enumerate()
        .map(|(i, task)| task.validate(i))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(SpeedAuditPlan {
        site_url: site_url.to_string(),
        estimated_current_score: normalize_score(raw.estimated_current_score),
        summary: raw.summary,
        tasks,
    })
}

impl RawTask {
    fn validate(self, index: usize) -> Result<OptimizationTask, PlanError> {
        Ok(OptimizationTask {
            difficulty: closed::<Difficulty>(index, "difficulty", &self.difficulty)?,
            category: closed::<Category>(index, "category", &self.category)?,
            impact: closed::<Impact>(index, "impact", &self.impact)?,
            title: self.title,
            instructions: self.instructions,
            tools: self.tools,
        })
    }
}

fn closed<T: FromStr>(index: usize, field: &str, value: &str) -> Result<T, PlanError> {
    value.parse::<T>().map_err(|_| PlanError::Malformed {
        field: format!("tasks[{}].{}", index, field),
        value: value.to_string(),
    })
}
