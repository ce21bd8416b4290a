//! Error types for the Gateway

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use speedplan_core::{PlanError, ReportError, ShellError};

/// Gateway error type
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Input rejected before any request is made
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] PlanError),

    /// The plan request failed; carries the user-facing message
    #[error("Analysis failed: {0}")]
    Analysis(String),

    /// Pasted report could not be used
    #[error("Report rejected: {0}")]
    Report(#[from] ReportError),

    /// Transition not allowed in the current state
    #[error("State conflict: {0}")]
    Conflict(#[from] ShellError),

    /// Plan source could not be built
    #[error("Provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// Bad configuration value
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Anything else
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for GatewayError {
    fn from(e: serde_json::Error) -> Self {
        GatewayError::Serialization(e.to_string())
    }
}

impl GatewayError {
    /// HTTP status for this error
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::InvalidInput(_) => StatusCode::UNPROCESSABLE_ENTITY,
            GatewayError::Analysis(_) => StatusCode::BAD_GATEWAY,
            GatewayError::Report(_) => StatusCode::BAD_REQUEST,
            GatewayError::Conflict(ShellError::NoSuchTask(_)) => StatusCode::NOT_FOUND,
            GatewayError::Conflict(_) => StatusCode::CONFLICT,
            GatewayError::ProviderUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            GatewayError::InvalidConfig(_)
            | GatewayError::Io(_)
            | GatewayError::Serialization(_)
            | GatewayError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show in the interface
    pub fn user_message(&self) -> String {
        match self {
            GatewayError::Analysis(message) => message.clone(),
            GatewayError::Report(e) => e.user_message().to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{}", self);
        } else {
            tracing::debug!("{}", self);
        }

        (
            status,
            Json(serde_json::json!({ "error": self.user_message() })),
        )
            .into_response()
    }
}

/// Result type for Gateway operations
pub type Result<T> = std::result::Result<T, GatewayError>;
