//! Integration tests for the gateway API
//!
//! Each test drives the axum router in-process with `tower::ServiceExt` and a
//! stub plan source.

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tower::ServiceExt;

use speedplan_core::{decode_plan, PlanError, PlanRequest, PlanSource, SpeedAuditPlan};
use speedplan_gateway::{Gateway, GatewayConfig};

const PLAN: &str = r#"{
    "estimatedCurrentScore": 48,
    "summary": "Large hero images and render-blocking Elementor CSS.",
    "tasks": [
        {"title": "Convert images to WebP", "difficulty": "Easy", "category": "Plugin",
         "impact": "High", "instructions": "Bulk-convert the media library.", "tools": ["EWWW Image Optimizer"]},
        {"title": "Enable Redis object cache", "difficulty": "Hard", "category": "Hosting",
         "impact": "Medium", "instructions": "Ask the host to enable Redis.", "tools": ["Redis Object Cache"]}
    ]
}"#;

#[derive(Debug, Default)]
struct StubSource {
    calls: AtomicUsize,
    fail: bool,
}

#[async_trait]
impl PlanSource for StubSource {
    async fn request_plan(&self, request: &PlanRequest) -> Result<SpeedAuditPlan, PlanError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(PlanError::Request("quota exceeded".to_string()));
        }
        decode_plan(&request.site_url, PLAN)
    }
}

/// Holds every request until the gate opens
#[derive(Debug, Default)]
struct GatedSource {
    gate: Notify,
}

#[async_trait]
impl PlanSource for GatedSource {
    async fn request_plan(&self, request: &PlanRequest) -> Result<SpeedAuditPlan, PlanError> {
        self.gate.notified().await;
        decode_plan(&request.site_url, PLAN)
    }
}

fn router(source: Arc<StubSource>) -> Router {
    let config = GatewayConfig::default();
    Gateway::new(config, source).build_router()
}

async fn send(router: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(match body {
            Some(v) => Body::from(v.to_string()),
            None => Body::empty(),
        })
        .unwrap();

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn test_health_and_initial_state() {
    let router = router(Arc::new(StubSource::default()));

    let (status, body) = send(&router, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = send(&router, "GET", "/api/state", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["analysis"]["status"], "idle");
    assert_eq!(body["can_submit"], true);
}

#[tokio::test]
async fn test_analyze_then_reset() {
    let source = Arc::new(StubSource::default());
    let router = router(source.clone());

    let (status, body) = send(
        &router,
        "POST",
        "/api/analyze",
        Some(json!({"siteUrl": "https://example.com", "hosting": "", "notes": ""})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    assert_eq!(body["analysis"]["status"], "success");
    assert_eq!(body["analysis"]["plan"]["siteUrl"], "https://example.com");
    assert_eq!(body["analysis"]["plan"]["tasks"][1]["category"], "Hosting");
    assert_eq!(body["plan_band"], "fail");

    // A loaded plan must be reset before the next analysis
    let (status, _) = send(
        &router,
        "POST",
        "/api/analyze",
        Some(json!({"siteUrl": "https://example.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(source.calls.load(Ordering::SeqCst), 1);

    let (status, body) = send(&router, "POST", "/api/reset", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["analysis"]["status"], "idle");
}

#[tokio::test]
async fn test_invalid_url_never_reaches_source() {
    let source = Arc::new(StubSource::default());
    let router = router(source.clone());

    let (status, body) = send(
        &router,
        "POST",
        "/api/analyze",
        Some(json!({"siteUrl": "example dot com"})),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("Invalid site URL"));
    assert_eq!(source.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_analysis_failure_is_generic() {
    let source = Arc::new(StubSource {
        fail: true,
        ..StubSource::default()
    });
    let router = router(source);

    let (status, body) = send(
        &router,
        "POST",
        "/api/analyze",
        Some(json!({"siteUrl": "https://example.com"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(
        body["error"],
        "Failed to generate the optimization plan. Please try again."
    );

    let (_, body) = send(&router, "GET", "/api/state", None).await;
    assert_eq!(body["analysis"]["status"], "failed");
    assert_eq!(body["can_submit"], true);
}

#[tokio::test]
async fn test_report_panel() {
    let router = router(Arc::new(StubSource::default()));

    let (status, body) = send(&router, "POST", "/api/report", Some(json!({"raw": "   "}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Please paste the JSON content.");

    let (status, body) =
        send(&router, "POST", "/api/report", Some(json!({"raw": "{not json"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("Invalid JSON format"));

    let raw = json!({
        "categories": {"performance": {"score": 0.93}},
        "audits": {
            "largest-contentful-paint": {"displayValue": "1.9 s"},
            "total-blocking-time": {"displayValue": "250 ms"}
        }
    })
    .to_string();
    let (status, body) = send(&router, "POST", "/api/report", Some(json!({ "raw": raw }))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["report"]["status"], "report_parsed");
    assert_eq!(body["comparison"]["before"], 45);
    assert_eq!(body["comparison"]["after"], 93);
    assert_eq!(body["comparison"]["after_band"], "pass");
    assert_eq!(body["comparison"]["readings"][0]["status"], "good");
    assert_eq!(body["comparison"]["readings"][1]["status"], "needs-improvement");
    assert_eq!(body["comparison"]["readings"][2]["value"], "N/A");
    // The primary state is untouched
    assert_eq!(body["analysis"]["status"], "idle");

    let (_, body) = send(&router, "POST", "/api/report/reset", None).await;
    assert_eq!(body["report"]["status"], "no_report");
    assert!(body["comparison"].is_null());
}

#[tokio::test]
async fn test_tabs_and_task_toggle() {
    let router = router(Arc::new(StubSource::default()));

    let (status, _) = send(&router, "POST", "/api/tasks/0/toggle", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    send(
        &router,
        "POST",
        "/api/analyze",
        Some(json!({"siteUrl": "https://example.com"})),
    )
    .await;

    let (status, body) = send(&router, "POST", "/api/tasks/1/toggle", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["expanded"], json!([1]));

    let (_, body) = send(&router, "POST", "/api/tab", Some(json!({"tab": "compare"}))).await;
    assert_eq!(body["tab"], "compare");

    let (_, body) = send(&router, "POST", "/api/reset", None).await;
    assert_eq!(body["tab"], "plan");
    assert_eq!(body["expanded"], json!([]));
}

#[tokio::test]
async fn test_index_page_is_served() {
    let router = router(Arc::new(StubSource::default()));

    let request = Request::builder().uri("/").body(Body::empty()).unwrap();
    let response = router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert!(String::from_utf8_lossy(&bytes).contains("/api/analyze"));
}

#[tokio::test]
async fn test_analysis_survives_client_disconnect() {
    let source = Arc::new(GatedSource::default());
    let router = Gateway::new(GatewayConfig::default(), source.clone()).build_router();

    let disconnected = tokio::time::timeout(
        Duration::from_millis(50),
        send(
            &router,
            "POST",
            "/api/analyze",
            Some(json!({"siteUrl": "https://example.com"})),
        ),
    )
    .await;
    assert!(disconnected.is_err());

    let (_, body) = send(&router, "GET", "/api/state", None).await;
    assert_eq!(body["analysis"]["status"], "loading");

    source.gate.notify_one();

    let mut status = Value::Null;
    for _ in 0..100 {
        let (_, body) = send(&router, "GET", "/api/state", None).await;
        status = body["analysis"]["status"].clone();
        if status != "loading" {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(status, "success");

    let (status, _) = send(&router, "POST", "/api/reset", None).await;
    assert_eq!(status, StatusCode::OK);
}
