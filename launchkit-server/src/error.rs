//! JSON error bodies for the HTTP surface.
//!
//! The template endpoint answers with a structured envelope
//! (`{"error": {"message", "code", "details"?}}`); the market endpoints
//! answer with a bare `{"error": "<message>"}`.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use launchkit_core::LaunchkitError;
use launchkit_prompt::{PromptError, PromptErrorDetails};
use serde::Serialize;

pub const MISSING_GENERATE_FIELDS: &str = "Missing required fields: templateId or input";
pub const LLM_UNAVAILABLE: &str = "LLM service is not available";
pub const MISSING_DESCRIPTION: &str = "Project description is required";
pub const MISSING_ANALYSIS_CONTENT: &str = "Analysis content is required";
pub const MARKET_UNAVAILABLE: &str = "Market analysis service is not available";
pub const MARKET_FAILED: &str = "Failed to generate market analysis";

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub message: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<PromptErrorDetails>,
}

#[derive(Debug, Serialize)]
pub struct ApiErrorResponse {
    pub error: ErrorDetail,
}

impl ApiErrorResponse {
    fn build(
        status: StatusCode,
        code: &str,
        msg: impl Into<String>,
        details: Option<PromptErrorDetails>,
    ) -> Response {
        let body = Self {
            error: ErrorDetail {
                message: msg.into(),
                code: code.to_string(),
                details,
            },
        };
        (status, Json(body)).into_response()
    }
}

/// Failures of `POST /api/generate`.
#[derive(Debug)]
pub enum GenerateError {
    InvalidRequest(String),
    Prompt(PromptError),
    Unavailable,
    Internal(LaunchkitError),
}

impl From<PromptError> for GenerateError {
    fn from(err: PromptError) -> Self {
        GenerateError::Prompt(err)
    }
}

impl From<LaunchkitError> for GenerateError {
    fn from(err: LaunchkitError) -> Self {
        if err.is_unavailable() {
            GenerateError::Unavailable
        } else {
            GenerateError::Internal(err)
        }
    }
}

impl From<JsonRejection> for GenerateError {
    fn from(rejection: JsonRejection) -> Self {
        GenerateError::InvalidRequest(rejection.body_text())
    }
}

impl IntoResponse for GenerateError {
    fn into_response(self) -> Response {
        match self {
            GenerateError::InvalidRequest(message) => {
                ApiErrorResponse::build(StatusCode::BAD_REQUEST, "INVALID_REQUEST", message, None)
            }
            GenerateError::Prompt(err) => ApiErrorResponse::build(
                StatusCode::BAD_REQUEST,
                err.code(),
                err.to_string(),
                Some(err.details()),
            ),
            GenerateError::Unavailable => ApiErrorResponse::build(
                StatusCode::SERVICE_UNAVAILABLE,
                "SERVICE_UNAVAILABLE",
                LLM_UNAVAILABLE,
                None,
            ),
            GenerateError::Internal(err) => {
                tracing::error!(error = %err, code = err.code(), "generation failed");
                ApiErrorResponse::build(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    err.to_string(),
                    None,
                )
            }
        }
    }
}

/// Failures of the market-analysis endpoints.
#[derive(Debug, PartialEq, Eq)]
pub enum MarketError {
    BadRequest(&'static str),
    Unavailable,
    Failed,
}

#[derive(Debug, Serialize)]
struct MessageBody {
    error: &'static str,
}

impl IntoResponse for MarketError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            MarketError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            MarketError::Unavailable => (StatusCode::SERVICE_UNAVAILABLE, MARKET_UNAVAILABLE),
            MarketError::Failed => (StatusCode::INTERNAL_SERVER_ERROR, MARKET_FAILED),
        };
        (status, Json(MessageBody { error })).into_response()
    }
}
