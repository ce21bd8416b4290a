//! E2E tests for the UI Shell
//!
//! Drives full analysis cycles through `run_analysis` against stub plan
//! sources; nothing here reaches a network.

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use std::time::Duration;

use speedplan_core::plan::{DEFAULT_HOSTING, DEFAULT_NOTES};
use speedplan_core::shell::run_analysis;
use speedplan_core::{
    decode_plan, AnalysisState, PlanError, PlanRequest, PlanSource, Shell, ShellError,
    SpeedAuditPlan,
};

/// Records every request it sees and answers with canned response text
#[derive(Debug)]
struct ScriptedSource {
    response: String,
    seen: Mutex<Vec<(String, String, String)>>,
}

impl ScriptedSource {
    fn new(response: &str) -> Self {
        Self {
            response: response.to_string(),
            seen: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<(String, String, String)> {
        self.seen.lock().clone()
    }
}

#[async_trait]
impl PlanSource for ScriptedSource {
    async fn request_plan(&self, request: &PlanRequest) -> Result<SpeedAuditPlan, PlanError> {
        self.seen.lock().push((
            request.site_url.clone(),
            request.hosting_or_default().to_string(),
            request.notes_or_default().to_string(),
        ));
        decode_plan(&request.site_url, &self.response)
    }
}

#[derive(Debug)]
struct DownSource;

#[async_trait]
impl PlanSource for DownSource {
    async fn request_plan(&self, _request: &PlanRequest) -> Result<SpeedAuditPlan, PlanError> {
        Err(PlanError::Request("503 Service Unavailable".to_string()))
    }
}

/// Looks at the shared shell from inside the request, then answers
#[derive(Debug)]
struct ObservingSource {
    shell: Arc<RwLock<Shell>>,
    observed: Mutex<Vec<(&'static str, bool)>>,
}

#[async_trait]
impl PlanSource for ObservingSource {
    async fn request_plan(&self, request: &PlanRequest) -> Result<SpeedAuditPlan, PlanError> {
        let view = self.shell.read().view();
        self.observed
            .lock()
            .push((view.analysis.name(), view.can_submit));
        decode_plan(&request.site_url, RESPONSE)
    }
}

/// Never answers within a test's lifetime
#[derive(Debug)]
struct StalledSource;

#[async_trait]
impl PlanSource for StalledSource {
    async fn request_plan(&self, _request: &PlanRequest) -> Result<SpeedAuditPlan, PlanError> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Err(PlanError::Request("timed out".to_string()))
    }
}

const RESPONSE: &str = r#"{
    "siteUrl": "https://somewhere-else.test",
    "estimatedCurrentScore": 42,
    "summary": "Unused Elementor widgets and no object cache.",
    "tasks": [
        {
            "title": "Upgrade to PHP 8.2",
            "difficulty": "Easy",
            "category": "Hosting",
            "impact": "High",
            "instructions": "Switch the PHP version in the hosting panel.",
            "tools": []
        }
    ]
}"#;

#[tokio::test]
async fn test_submission_uses_fallbacks_and_one_request() {
    let shell = RwLock::new(Shell::new());
    let source = ScriptedSource::new(RESPONSE);
    let request = PlanRequest::new("https://example.com", "", "").unwrap();

    let state = run_analysis(&shell, &source, request).await.unwrap();

    assert_eq!(
        source.calls(),
        vec![(
            "https://example.com".to_string(),
            DEFAULT_HOSTING.to_string(),
            DEFAULT_NOTES.to_string()
        )]
    );
    assert_eq!(state.name(), "success");
    assert_eq!(shell.read().analysis(), &state);
}

#[tokio::test]
async fn test_site_url_is_never_taken_from_response() {
    let shell = RwLock::new(Shell::new());
    let source = ScriptedSource::new(RESPONSE);
    let request = PlanRequest::new("https://a.test", "SiteGround", "").unwrap();

    let state = run_analysis(&shell, &source, request).await.unwrap();

    let plan = state.plan().expect("plan loaded");
    assert_eq!(plan.site_url, "https://a.test");
    assert_eq!(plan.tasks[0].title, "Upgrade to PHP 8.2");
}

#[tokio::test]
async fn test_failure_lands_in_failed_state() {
    let shell = RwLock::new(Shell::new());
    let request = PlanRequest::new("https://example.com", "", "").unwrap();

    let state = run_analysis(&shell, &DownSource, request.clone())
        .await
        .unwrap();
    assert!(matches!(state, AnalysisState::Failed { .. }));

    // Recoverable: the same submission can be retried
    let source = ScriptedSource::new(RESPONSE);
    let state = run_analysis(&shell, &source, request).await.unwrap();
    assert_eq!(state.name(), "success");
}

#[tokio::test]
async fn test_malformed_plan_is_an_analysis_failure() {
    let shell = RwLock::new(Shell::new());
    let source = ScriptedSource::new(&RESPONSE.replace("\"High\"", "\"Massive\""));
    let request = PlanRequest::new("https://example.com", "", "").unwrap();

    let state = run_analysis(&shell, &source, request).await.unwrap();

    assert!(matches!(state, AnalysisState::Failed { .. }));
    assert!(shell.read().analysis().plan().is_none());
}

#[tokio::test]
async fn test_second_submission_rejected_while_loading() {
    let shell = Arc::new(RwLock::new(Shell::new()));
    let request = PlanRequest::new("https://example.com", "", "").unwrap();

    shell.write().begin_analysis(request.clone()).unwrap();

    let source = ScriptedSource::new(RESPONSE);
    let err = run_analysis(&shell, &source, request).await.unwrap_err();

    assert_eq!(err, ShellError::AnalysisInFlight);
    assert!(source.calls().is_empty());
}

#[tokio::test]
async fn test_loading_is_visible_while_request_runs() {
    let shell = Arc::new(RwLock::new(Shell::new()));
    let source = ObservingSource {
        shell: shell.clone(),
        observed: Mutex::new(Vec::new()),
    };
    let request = PlanRequest::new("https://example.com", "", "").unwrap();

    let state = run_analysis(&shell, &source, request.clone()).await.unwrap();

    assert_eq!(*source.observed.lock(), vec![("loading", false)]);
    assert_eq!(state.name(), "success");
    assert!(!shell.read().view().can_submit);

    // One submission, one terminal transition
    let err = run_analysis(&shell, &source, request).await.unwrap_err();
    assert_eq!(err, ShellError::PlanAlreadyLoaded);
    assert_eq!(source.observed.lock().len(), 1);
    assert_eq!(shell.read().analysis(), &state);
}

#[tokio::test]
async fn test_dropped_analysis_does_not_stay_loading() {
    let shell = RwLock::new(Shell::new());
    let request = PlanRequest::new("https://example.com", "", "").unwrap();

    let cut_short = tokio::time::timeout(
        Duration::from_millis(50),
        run_analysis(&shell, &StalledSource, request.clone()),
    )
    .await;
    assert!(cut_short.is_err());

    {
        let shell = shell.read();
        assert!(matches!(shell.analysis(), AnalysisState::Failed { .. }));
        assert!(shell.view().can_submit);
    }

    // The next submission goes through
    let source = ScriptedSource::new(RESPONSE);
    let state = run_analysis(&shell, &source, request).await.unwrap();
    assert_eq!(state.name(), "success");
    assert_eq!(source.calls().len(), 1);

    shell.write().reset().unwrap();
}
