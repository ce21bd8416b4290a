//! UI Shell state
//!
//! The interface owns exactly one [`Shell`]. Its primary state is a single
//! tagged value:
//!
//! ```text
//! Idle ──begin──▶ Loading ──complete──▶ Success(plan)
//!  ▲                                  └─▶ Failed(message)
//!  └────────────── reset ◀──────────────────┘
//! ```
//!
//! The comparison panel is a separate sub-state (`NoReport` / `ReportParsed`)
//! that never touches the primary state.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::comparison::ScoreComparison;
use crate::error::{PlanError, ReportError, ShellError};
use crate::plan::{PlanRequest, PlanSource};
use crate::report::parse_report;
use crate::score::ScoreBand;
use crate::types::{LighthouseResult, SpeedAuditPlan};

/// Primary analysis state
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AnalysisState {
    /// No plan yet
    Idle,
    /// A plan request is in flight
    Loading {
        /// The submitted input
        request: PlanRequest,
    },
    /// The latest request produced a plan
    Success {
        /// The plan on screen
        plan: SpeedAuditPlan,
    },
    /// The latest request failed
    Failed {
        /// Message shown to the user
        message: String,
    },
}

impl AnalysisState {
    /// Short name of the variant, for logs
    pub fn name(&self) -> &'static str {
        match self {
            AnalysisState::Idle => "idle",
            AnalysisState::Loading { .. } => "loading",
            AnalysisState::Success { .. } => "success",
            AnalysisState::Failed { .. } => "failed",
        }
    }

    /// Whether a request is running
    pub fn is_loading(&self) -> bool {
        matches!(self, AnalysisState::Loading { .. })
    }

    /// The loaded plan, if any
    pub fn plan(&self) -> Option<&SpeedAuditPlan> {
        match self {
            AnalysisState::Success { plan } => Some(plan),
            _ => None,
        }
    }
}

/// Comparison panel state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ComparisonState {
    /// Waiting for a report, possibly showing the last input error
    NoReport {
        /// Field-level message from the last failed submission
        error: Option<String>,
    },
    /// A report has been parsed
    ReportParsed {
        /// The parsed report
        result: LighthouseResult,
    },
}

impl Default for ComparisonState {
    fn default() -> Self {
        ComparisonState::NoReport { error: None }
    }
}

/// Dashboard tab
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tab {
    /// Task checklist
    #[default]
    Plan,
    /// Result verification
    Compare,
}

/// The interface's whole state
#[derive(Debug, Clone)]
pub struct Shell {
    analysis: AnalysisState,
    comparison: ComparisonState,
    tab: Tab,
    expanded: BTreeSet<usize>,
}

impl Default for Shell {
    fn default() -> Self {
        Self::new()
    }
}

impl Shell {
    /// Fresh shell in `Idle`
    pub fn new() -> Self {
        Self {
            analysis: AnalysisState::Idle,
            comparison: ComparisonState::default(),
            tab: Tab::Plan,
            expanded: BTreeSet::new(),
        }
    }

    /// Primary state
    pub fn analysis(&self) -> &AnalysisState {
        &self.analysis
    }

    /// Comparison sub-state
    pub fn comparison_state(&self) -> &ComparisonState {
        &self.comparison
    }

    /// Active tab
    pub fn tab(&self) -> Tab {
        self.tab
    }

    /// Whether the task card at `index` is expanded
    pub fn is_expanded(&self, index: usize) -> bool {
        self.expanded.contains(&index)
    }

    /// Move to `Loading`
    ///
    /// Allowed from `Idle` and `Failed`; a failed state's message is dropped.
    pub fn begin_analysis(&mut self, request: PlanRequest) -> Result<PlanRequest, ShellError> {
        match self.analysis {
            AnalysisState::Loading { .. } => return Err(ShellError::AnalysisInFlight),
            AnalysisState::Success { .. } => return Err(ShellError::PlanAlreadyLoaded),
            AnalysisState::Idle | AnalysisState::Failed { .. } => {}
        }

        tracing::info!(site_url = %request.site_url, "Analysis started");
        self.analysis = AnalysisState::Loading {
            request: request.clone(),
        };
        Ok(request)
    }

    /// Leave `Loading` with the outcome of the plan request
    pub fn complete_analysis(
        &mut self,
        outcome: Result<SpeedAuditPlan, PlanError>,
    ) -> Result<&AnalysisState, ShellError> {
        if !self.analysis.is_loading() {
            return Err(ShellError::NoAnalysisInFlight);
        }

        self.analysis = match outcome {
            Ok(plan) => {
                tracing::info!(
                    site_url = %plan.site_url,
                    tasks = plan.tasks.len(),
                    "Analysis succeeded"
                );
                self.tab = Tab::Plan;
                self.expanded.clear();
                AnalysisState::Success { plan }
            }
            Err(e) => {
                tracing::error!("Plan generation failed: {}", e);
                AnalysisState::Failed {
                    message: e.user_message().to_string(),
                }
            }
        };

        Ok(&self.analysis)
    }

    /// Return to `Idle`, discarding the plan, any error and the dashboard state
    pub fn reset(&mut self) -> Result<(), ShellError> {
        if self.analysis.is_loading() {
            return Err(ShellError::AnalysisInFlight);
        }

        self.analysis = AnalysisState::Idle;
        self.comparison = ComparisonState::default();
        self.tab = Tab::Plan;
        self.expanded.clear();
        Ok(())
    }

    /// Parse a pasted report into the comparison panel
    ///
    /// On failure the panel keeps waiting and shows the field-level message.
    pub fn submit_report(&mut self, raw: &str) -> Result<LighthouseResult, ReportError> {
        match parse_report(raw) {
            Ok(result) => {
                self.comparison = ComparisonState::ReportParsed {
                    result: result.clone(),
                };
                Ok(result)
            }
            Err(e) => {
                tracing::warn!("Report rejected: {}", e);
                self.comparison = ComparisonState::NoReport {
                    error: Some(e.user_message().to_string()),
                };
                Err(e)
            }
        }
    }

    /// Clear the comparison panel
    pub fn reset_report(&mut self) {
        self.comparison = ComparisonState::default();
    }

    /// Switch dashboard tab
    pub fn select_tab(&mut self, tab: Tab) {
        self.tab = tab;
    }

    /// Expand or collapse a task card; returns the new expanded flag
    pub fn toggle_task(&mut self, index: usize) -> Result<bool, ShellError> {
        let task_count = self.analysis.plan().map_or(0, |p| p.tasks.len());
        if index >= task_count {
            return Err(ShellError::NoSuchTask(index));
        }

        if self.expanded.remove(&index) {
            Ok(false)
        } else {
            self.expanded.insert(index);
            Ok(true)
        }
    }

    /// Comparison of the parsed report against the plan estimate
    pub fn comparison(&self) -> Option<ScoreComparison> {
        match &self.comparison {
            ComparisonState::ReportParsed { result } => {
                Some(ScoreComparison::new(self.analysis.plan(), result))
            }
            ComparisonState::NoReport { .. } => None,
        }
    }

    /// Serializable snapshot for the interface
    pub fn view(&self) -> ShellView {
        ShellView {
            analysis: self.analysis.clone(),
            plan_band: self.analysis.plan().map(|p| p.band()),
            tab: self.tab,
            expanded: self.expanded.iter().copied().collect(),
            report: self.comparison.clone(),
            comparison: self.comparison(),
            can_submit: matches!(
                self.analysis,
                AnalysisState::Idle | AnalysisState::Failed { .. }
            ),
        }
    }
}

/// Everything the interface renders, in one value
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShellView {
    /// Primary state
    pub analysis: AnalysisState,
    /// Band of the plan's estimated score
    pub plan_band: Option<ScoreBand>,
    /// Active tab
    pub tab: Tab,
    /// Expanded task indices, ascending
    pub expanded: Vec<usize>,
    /// Comparison sub-state
    pub report: ComparisonState,
    /// Derived comparison when a report is parsed
    pub comparison: Option<ScoreComparison>,
    /// Whether the input form accepts a submission
    pub can_submit: bool,
}

/// Run one full analysis against a shared shell
///
/// The lock is released while the plan source is awaited so the rest of the
/// interface stays readable. Returns the terminal state. If the returned
/// future is dropped mid-request the shell still leaves `Loading`, landing
/// in `Failed`.
pub async fn run_analysis(
    shell: &RwLock<Shell>,
    source: &dyn PlanSource,
    request: PlanRequest,
) -> Result<AnalysisState, ShellError> {
    let request = {
        let mut guard = shell.write();
        guard.begin_analysis(request)?
    };

    let mut in_flight = InFlight {
        shell,
        settled: false,
    };
    let outcome = source.request_plan(&request).await;
    in_flight.settled = true;

    let mut shell = shell.write();
    let state = shell.complete_analysis(outcome)?;
    Ok(state.clone())
}

/// Fails the analysis if dropped before the plan source answers
struct InFlight<'a> {
    shell: &'a RwLock<Shell>,
    settled: bool,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }

        let mut shell = self.shell.write();
        if shell.analysis.is_loading() {
            tracing::warn!("Analysis dropped while the plan request was in flight");
            let _ = shell.complete_analysis(Err(PlanError::Abandoned));
        }
    }
}
