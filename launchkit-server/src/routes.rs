//! Request handlers.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use launchkit_core::{LlmOptions, LlmResponse};
use launchkit_market::{MarketAnalysisResult, SUMMARY_UNAVAILABLE};
use launchkit_prompt::TemplateInput;
use serde::{Deserialize, Serialize};
use tracing::Instrument;

use crate::error::{
    GenerateError, MarketError, MISSING_ANALYSIS_CONTENT, MISSING_DESCRIPTION,
    MISSING_GENERATE_FIELDS,
};
use crate::state::{AppState, ProviderStatus};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    #[serde(default)]
    pub template_id: Option<String>,
    #[serde(default)]
    pub input: Option<TemplateInput>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketAnalysisRequest {
    #[serde(default)]
    pub project_description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryRequest {
    #[serde(default)]
    pub analysis_content: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub summary: String,
}

#[derive(Debug, Serialize)]
pub struct TemplateSummary {
    pub id: String,
    pub name: String,
    pub description: String,
    pub variables: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub providers: ProviderStatus,
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.is_empty())
}

/// `POST /api/generate`: resolve a template, fill it, and run it through the engine.
pub async fn generate(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<LlmResponse>, GenerateError> {
    let Json(request) = payload?;
    let (template_id, input) = match (present(request.template_id), request.input) {
        (Some(template_id), Some(input)) => (template_id, input),
        _ => return Err(GenerateError::InvalidRequest(MISSING_GENERATE_FIELDS.to_string())),
    };

    let template = state.templates.get(&template_id)?;
    let filled = template.fill(&input)?;

    if !state.engine.is_available() {
        return Err(GenerateError::Unavailable);
    }

    let span = tracing::info_span!(
        "generate",
        template_id = %template_id,
        provider = %state.engine.adapter().name()
    );
    let options = LlmOptions::new().with_system_message(filled.system_message);
    let response = state
        .engine
        .generate_completion(&filled.user_message, &options)
        .instrument(span)
        .await?;
    Ok(Json(response))
}

/// `POST /api/market-analysis`
pub async fn market_analysis(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<MarketAnalysisRequest>, JsonRejection>,
) -> Result<Json<MarketAnalysisResult>, MarketError> {
    let description = payload
        .ok()
        .and_then(|Json(request)| present(request.project_description))
        .ok_or(MarketError::BadRequest(MISSING_DESCRIPTION))?;
    let analyzer = state.market.as_ref().ok_or(MarketError::Unavailable)?;

    match analyzer.analyze(&description).await {
        Ok(result) => Ok(Json(result)),
        Err(err) => {
            tracing::error!(error = %err, code = err.code(), "market analysis failed");
            Err(MarketError::Failed)
        }
    }
}

/// `POST /api/market-analysis-summary`. Generation failures still answer
/// 200 with a fixed apology line.
pub async fn market_analysis_summary(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SummaryRequest>, JsonRejection>,
) -> Result<Json<SummaryResponse>, MarketError> {
    let content = payload
        .ok()
        .and_then(|Json(request)| present(request.analysis_content))
        .ok_or(MarketError::BadRequest(MISSING_ANALYSIS_CONTENT))?;
    let analyzer = state.market.as_ref().ok_or(MarketError::Unavailable)?;

    let summary = match analyzer.generate_summary(&content).await {
        Ok(summary) => summary,
        Err(err) => {
            tracing::warn!(error = %err, "summary generation failed");
            SUMMARY_UNAVAILABLE.to_string()
        }
    };
    Ok(Json(SummaryResponse { summary }))
}

/// `GET /api/templates`
pub async fn list_templates(State(state): State<Arc<AppState>>) -> Json<Vec<TemplateSummary>> {
    let templates = state
        .templates
        .list()
        .iter()
        .map(|template| TemplateSummary {
            id: template.id.clone(),
            name: template.name.clone(),
            description: template.description.clone(),
            variables: template.variables.clone(),
        })
        .collect();
    Json(templates)
}

/// `GET /health`
pub async fn health(State(state): State<Arc<AppState>>) -> (StatusCode, Json<HealthResponse>) {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok",
            providers: state.providers,
        }),
    )
}
