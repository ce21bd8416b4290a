use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use speedplan_core::{decode_plan, PlanError, PlanRequest, PlanSource, SpeedAuditPlan};
use uuid::Uuid;

use crate::prompt::{build_prompt, response_schema};

pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_TEMPERATURE: f64 = 0.3;

/// Environment variables checked for the API key, in order
pub const API_KEY_ENV_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

#[derive(Clone)]
pub struct GeminiPlanSource {
    pub name: String,
    api_key: String,
    model: String,
    base_url: String,
    temperature: f64,
    http_client: reqwest::Client,
}

impl fmt::Debug for GeminiPlanSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiPlanSource")
            .field("name", &self.name)
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("temperature", &self.temperature)
            .finish_non_exhaustive()
    }
}

impl GeminiPlanSource {
    pub fn new(api_key: String, model: impl Into<String>) -> Self {
        let model = model.into();
        Self {
            name: format!("Gemini {}", model),
            api_key,
            model,
            base_url: GEMINI_API_BASE.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            http_client: reqwest::Client::new(),
        }
    }

    /// Build from the first API key variable that is set
    pub fn from_env(model: impl Into<String>) -> Result<Self> {
        Self::from_env_var(API_KEY_ENV_VARS[0], model)
    }

    /// Build from `primary`, falling back to the generic variables
    pub fn from_env_var(primary: &str, model: impl Into<String>) -> Result<Self> {
        let api_key = std::iter::once(primary)
            .chain(API_KEY_ENV_VARS)
            .find_map(|var| std::env::var(var).ok().filter(|v| !v.trim().is_empty()))
            .with_context(|| {
                format!(
                    "No Gemini API key found (checked {}, {})",
                    primary,
                    API_KEY_ENV_VARS.join(", ")
                )
            })?;

        Ok(Self::new(api_key, model))
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self> {
        self.http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(self)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// The key travels in a header, never in the URL
    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    /// Request body for one plan
    pub fn build_request(&self, request: &PlanRequest) -> GeminiRequest {
        GeminiRequest {
            contents: vec![GeminiContent {
                role: "user".to_string(),
                parts: vec![GeminiPart {
                    text: Some(build_prompt(request)),
                }],
            }],
            generation_config: GeminiGenerationConfig {
                temperature: self.temperature,
                response_mime_type: "application/json".to_string(),
                response_schema: response_schema(),
            },
        }
    }

    async fn request_completion(&self, body: &GeminiRequest) -> Result<String> {
        let response = self
            .http_client
            .post(self.endpoint())
            .header("Content-Type", "application/json")
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await
            .context("Failed to send request to Gemini")?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("Gemini API error ({}): {}", status, error_text);
        }

        let completion: GeminiResponse = response
            .json()
            .await
            .context("Failed to parse Gemini response")?;

        Ok(completion.text())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiRequest {
    contents: Vec<GeminiContent>,
    generation_config: GeminiGenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    role: String,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    temperature: f64,
    response_mime_type: String,
    response_schema: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
}

impl GeminiResponse {
    /// Text parts of the first candidate, concatenated
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl PlanSource for GeminiPlanSource {
    async fn request_plan(&self, request: &PlanRequest) -> Result<SpeedAuditPlan, PlanError> {
        let request_id = Uuid::new_v4();
        tracing::info!(
            %request_id,
            model = %self.model,
            site_url = %request.site_url,
            "Requesting speed plan"
        );

        let body = self.build_request(request);
        let text = self.request_completion(&body).await.map_err(|e| {
            tracing::error!(%request_id, "Gemini analysis error: {:#}", e);
            PlanError::Request(format!("{:#}", e))
        })?;

        let plan = decode_plan(&request.site_url, &text)?;
        tracing::debug!(%request_id, tasks = plan.tasks.len(), "Speed plan decoded");
        Ok(plan)
    }
}
