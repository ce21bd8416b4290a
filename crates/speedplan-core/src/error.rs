//! Error types for SpeedPlan Core
//!
//! Two failure classes reach the user. Analysis failures collapse into one
//! generic message no matter what went wrong underneath, while report input
//! failures keep the distinction between "nothing pasted" and "not JSON".
//! We use `thiserror` for the Display/Error implementations.

use thiserror::Error;

/// Result type alias for SpeedPlan operations
pub type Result<T> = std::result::Result<T, SpeedPlanError>;

/// Message shown for every analysis failure
pub const ANALYSIS_FAILED_MESSAGE: &str =
    "Failed to generate the optimization plan. Please try again.";

/// Message shown when the report field is blank
pub const REPORT_EMPTY_MESSAGE: &str = "Please paste the JSON content.";

/// Message shown when the report field is not JSON
pub const REPORT_INVALID_MESSAGE: &str =
    "Invalid JSON format. Please copy the entire JSON from PageSpeed Insights or Lighthouse.";

/// Main error type for SpeedPlan operations
#[derive(Error, Debug)]
pub enum SpeedPlanError {
    /// Plan request errors
    #[error("Plan error: {0}")]
    Plan(#[from] PlanError),

    /// Report input errors
    #[error("Report error: {0}")]
    Report(#[from] ReportError),

    /// UI state transition errors
    #[error("Shell error: {0}")]
    Shell(#[from] ShellError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        /// What was being attempted
        context: String,
        /// Underlying failure
        source: Box<SpeedPlanError>,
    },
}

/// Errors raised while requesting or decoding an optimization plan
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlanError {
    /// The site URL is not an absolute URL
    #[error("Invalid site URL '{url}': {reason}")]
    InvalidUrl {
        /// The rejected input
        url: String,
        /// Parser explanation
        reason: String,
    },

    /// Network or service failure
    #[error("Plan request failed: {0}")]
    Request(String),

    /// The service answered without any text
    #[error("No response from the generative service")]
    EmptyResponse,

    /// The response text is not JSON of the expected shape
    #[error("Could not decode plan response: {0}")]
    Decode(String),

    /// A closed-set field carries a value outside its set
    #[error("Malformed plan: {field} has unexpected value '{value}'")]
    Malformed {
        /// Path of the offending field, e.g. `tasks[2].difficulty`
        field: String,
        /// The value received
        value: String,
    },

    /// The caller stopped waiting before the request finished
    #[error("Plan request abandoned before completion")]
    Abandoned,
}

impl PlanError {
    /// The single message the interface shows for any analysis failure
    pub fn user_message(&self) -> &'static str {
        ANALYSIS_FAILED_MESSAGE
    }
}

/// Errors raised while reading a pasted Lighthouse report
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReportError {
    /// Nothing (or only whitespace) was pasted
    #[error("Report text is empty")]
    Empty,

    /// The pasted text is not a usable JSON document
    #[error("Report is not valid JSON: {0}")]
    InvalidFormat(String),
}

impl ReportError {
    /// Field-level message for the comparison panel
    pub fn user_message(&self) -> &'static str {
        match self {
            ReportError::Empty => REPORT_EMPTY_MESSAGE,
            ReportError::InvalidFormat(_) => REPORT_INVALID_MESSAGE,
        }
    }
}

/// Rejected UI state transitions
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellError {
    /// A plan request is already running
    #[error("An analysis is already in progress")]
    AnalysisInFlight,

    /// A plan is on screen; reset before analyzing another site
    #[error("A plan is already loaded; reset before starting a new analysis")]
    PlanAlreadyLoaded,

    /// A completion arrived while no request was running
    #[error("No analysis is in progress")]
    NoAnalysisInFlight,

    /// Task index outside the loaded plan
    #[error("No task at index {0}")]
    NoSuchTask(usize),
}

impl SpeedPlanError {
    /// Add context to an error
    pub fn context(self, context: impl Into<String>) -> Self {
        Self::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }
}

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to a Result
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add lazy context to a Result
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<SpeedPlanError>,
{
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.into().context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.into().context(f()))
    }
}
