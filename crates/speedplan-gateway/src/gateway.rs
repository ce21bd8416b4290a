//! Main Gateway implementation
//!
//! HTTP host for the UI Shell. One [`Shell`] per gateway; it is the only
//! process-wide state and is replaced transition by transition under a lock
//! that is never held across the plan request.

use axum::{
    extract::{Path, State},
    response::{Html, IntoResponse},
    routing::{get, post},
    Json, Router,
};
use parking_lot::RwLock;
use serde::Deserialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use speedplan_agent::GeminiPlanSource;
use speedplan_core::shell::run_analysis;
use speedplan_core::{AnalysisState, PlanRequest, PlanSource, Shell, ShellView, Tab};

use crate::config::GatewayConfig;
use crate::{GatewayError, Result};

/// Gateway state shared across handlers
#[derive(Clone)]
pub struct GatewayState {
    /// Configuration the gateway was started with
    pub config: GatewayConfig,
    /// The single interface state
    pub shell: Arc<RwLock<Shell>>,
    /// Where plans come from
    pub plan_source: Arc<dyn PlanSource>,
}

impl GatewayState {
    /// Fresh state with an idle shell
    pub fn new(config: GatewayConfig, plan_source: Arc<dyn PlanSource>) -> Self {
        Self {
            config,
            shell: Arc::new(RwLock::new(Shell::new())),
            plan_source,
        }
    }

    fn view(&self) -> ShellView {
        self.shell.read().view()
    }
}

/// Body of `POST /api/analyze`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeBody {
    /// Site to analyze
    pub site_url: String,
    /// Hosting provider, may be blank
    #[serde(default)]
    pub hosting: String,
    /// Extra context, may be blank
    #[serde(default)]
    pub notes: String,
}

/// Body of `POST /api/report`
#[derive(Debug, Deserialize)]
pub struct ReportBody {
    /// Pasted report text
    #[serde(default)]
    pub raw: String,
}

/// Body of `POST /api/tab`
#[derive(Debug, Deserialize)]
pub struct TabBody {
    /// Tab to show
    pub tab: Tab,
}

/// Main Gateway
pub struct Gateway {
    state: Arc<GatewayState>,
}

impl Gateway {
    /// Create a gateway around an existing plan source
    pub fn new(config: GatewayConfig, plan_source: Arc<dyn PlanSource>) -> Self {
        let state = Arc::new(GatewayState::new(config, plan_source));
        Self { state }
    }

    /// Create a gateway backed by Gemini, configured from `config.provider`
    pub fn from_config(config: GatewayConfig) -> Result<Self> {
        let provider = &config.provider;
        let source = GeminiPlanSource::from_env_var(&provider.api_key_env, provider.model.clone())
            .and_then(|s| s.with_timeout(provider.timeout()))
            .map_err(|e| GatewayError::ProviderUnavailable(format!("{:#}", e)))?
            .with_base_url(provider.base_url.clone())
            .with_temperature(provider.temperature);

        tracing::info!("Plan source: {:?}", source);
        Ok(Self::new(config, Arc::new(source)))
    }

    /// Get gateway state
    pub fn state(&self) -> Arc<GatewayState> {
        self.state.clone()
    }

    /// Build the Axum router
    pub fn build_router(&self) -> Router {
        let router = Router::new()
            .route("/", get(Self::handle_index))
            .route("/health", get(Self::handle_health))
            .route("/api/state", get(Self::handle_state))
            .route("/api/analyze", post(Self::handle_analyze))
            .route("/api/reset", post(Self::handle_reset))
            .route("/api/report", post(Self::handle_report))
            .route("/api/report/reset", post(Self::handle_report_reset))
            .route("/api/tab", post(Self::handle_tab))
            .route("/api/tasks/:index/toggle", post(Self::handle_toggle))
            .layer(CorsLayer::permissive());

        let router = if self.state.config.tracing {
            router.layer(TraceLayer::new_for_http())
        } else {
            router
        };

        router.with_state(self.state.clone())
    }

    /// Start the gateway server
    pub async fn start(&self) -> Result<()> {
        let addr = self.state.config.socket_addr()?;
        let router = self.build_router();

        tracing::info!("SpeedPlan gateway listening on http://{}", addr);

        let listener = tokio::net::TcpListener::bind(addr).await?;

        axum::serve(listener, router)
            .await
            .map_err(|e| GatewayError::Internal(e.to_string()))?;

        Ok(())
    }

    // HTTP handlers

    async fn handle_index() -> Html<&'static str> {
        Html(include_str!("../static/index.html"))
    }

    async fn handle_health() -> impl IntoResponse {
        Json(serde_json::json!({
            "status": "healthy",
            "version": crate::VERSION
        }))
    }

    async fn handle_state(State(state): State<Arc<GatewayState>>) -> Json<ShellView> {
        Json(state.view())
    }

    async fn handle_analyze(
        State(state): State<Arc<GatewayState>>,
        Json(body): Json<AnalyzeBody>,
    ) -> Result<Json<ShellView>> {
        let request = PlanRequest::new(body.site_url, body.hosting, body.notes)?;

        // The cycle runs on its own task so a client disconnect cannot cut it short
        let task_state = state.clone();
        let outcome = tokio::spawn(async move {
            run_analysis(
                &task_state.shell,
                task_state.plan_source.as_ref(),
                request,
            )
            .await
        })
        .await
        .map_err(|e| GatewayError::Internal(format!("Analysis task failed: {}", e)))??;

        match outcome {
            AnalysisState::Failed { message } => Err(GatewayError::Analysis(message)),
            _ => Ok(Json(state.view())),
        }
    }

    async fn handle_reset(State(state): State<Arc<GatewayState>>) -> Result<Json<ShellView>> {
        state.shell.write().reset()?;
        Ok(Json(state.view()))
    }

    async fn handle_report(
        State(state): State<Arc<GatewayState>>,
        Json(body): Json<ReportBody>,
    ) -> Result<Json<ShellView>> {
        state.shell.write().submit_report(&body.raw)?;
        Ok(Json(state.view()))
    }

    async fn handle_report_reset(State(state): State<Arc<GatewayState>>) -> Json<ShellView> {
        state.shell.write().reset_report();
        Json(state.view())
    }

    async fn handle_tab(
        State(state): State<Arc<GatewayState>>,
        Json(body): Json<TabBody>,
    ) -> Json<ShellView> {
        state.shell.write().select_tab(body.tab);
        Json(state.view())
    }

    async fn handle_toggle(
        State(state): State<Arc<GatewayState>>,
        Path(index): Path<usize>,
    ) -> Result<Json<ShellView>> {
        state.shell.write().toggle_task(index)?;
        Ok(Json(state.view()))
    }
}
