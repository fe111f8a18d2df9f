//! Google Gemini API client and adapter

use std::fmt;
use std::time::Duration;

use launchkit_core::{LaunchkitError, LlmAdapter, LlmOptions, LlmResponse, Usage};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::Instrument;

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const GEMINI_DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";

const PROVIDER: &str = "Gemini";

#[derive(Clone)]
pub struct GeminiClient {
    base_url: String,
    api_key: SecretString,
    model: String,
    http: Client,
}

impl fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiClient")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// Per-call knobs for [`GeminiClient::generate`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GenerateOptions {
    pub model: Option<String>,
    pub temperature: Option<f32>,
    pub max_output_tokens: Option<u32>,
    pub system_instruction: Option<String>,
    /// Lets the model ground its answer in Google Search results.
    pub google_search: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<GeminiTool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

impl Content {
    fn text(role: Option<&str>, text: &str) -> Self {
        Self {
            role: role.map(str::to_string),
            parts: vec![Part {
                text: Some(text.to_string()),
            }],
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiTool {
    google_search: GoogleSearch,
}

#[derive(Debug, Serialize)]
struct GoogleSearch {}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
    usage_metadata: Option<UsageMetadata>,
    model_version: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    #[serde(default)]
    finish_reason: Option<String>,
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
    #[serde(default)]
    total_token_count: u32,
}

#[derive(Debug, Deserialize)]
struct GoogleErrorResponse {
    error: GoogleErrorDetail,
}

#[derive(Debug, Deserialize)]
struct GoogleErrorDetail {
    message: String,
    #[serde(default)]
    status: Option<String>,
}

/// Web-search grounding attached to a candidate.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GroundingMetadata {
    #[serde(default)]
    pub web_search_queries: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_entry_point: Option<SearchEntryPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grounding_chunks: Option<Vec<GroundingChunk>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grounding_supports: Option<Vec<GroundingSupport>>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SearchEntryPoint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rendered_content: Option<String>,
}

/// One cited web source.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct GroundingChunk {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web: Option<WebSource>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct WebSource {
    #[serde(default)]
    pub uri: String,
    #[serde(default)]
    pub title: String,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GroundingSupport {
    #[serde(default)]
    pub segment: GroundingSegment,
    #[serde(default)]
    pub grounding_chunk_indices: Vec<u32>,
    #[serde(default)]
    pub confidence_scores: Vec<f32>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GroundingSegment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_index: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_index: Option<u32>,
    #[serde(default)]
    pub text: String,
}

/// Text of the first candidate plus the metadata the market workflow needs.
#[derive(Clone, Debug, PartialEq)]
pub struct GeminiResponse {
    pub text: String,
    pub model: String,
    pub usage: Option<Usage>,
    pub finish_reason: Option<String>,
    pub grounding_metadata: Option<GroundingMetadata>,
}

impl GeminiResponse {
    /// Pre-rendered Google Search suggestion chip HTML, if any.
    pub fn search_suggestions_html(&self) -> Option<&str> {
        self.grounding_metadata
            .as_ref()
            .and_then(|metadata| metadata.search_entry_point.as_ref())
            .and_then(|entry| entry.rendered_content.as_deref())
    }
}

fn is_blocked_finish_reason(reason: &str) -> bool {
    matches!(reason, "SAFETY" | "RECITATION" | "BLOCKLIST")
}

/// Wraps `prompt` with an instruction to answer only with JSON matching `schema`.
pub fn structured_prompt(prompt: &str, schema: &Value) -> String {
    let schema = serde_json::to_string_pretty(schema).unwrap_or_else(|_| schema.to_string());
    format!(
        "\n{prompt}\n\nIMPORTANT: You must respond ONLY with a valid JSON object that follows this schema:\n{schema}\n\nDo not include any explanations, markdown formatting, or anything else outside the JSON object.\nJust return the raw JSON object that matches the schema.\n"
    )
}

impl GeminiClient {
    pub fn new(api_key: SecretString, model: impl Into<String>) -> Self {
        let http = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .expect("valid reqwest client config");
        Self {
            base_url: GEMINI_BASE_URL.to_string(),
            api_key,
            model: model.into(),
            http,
        }
    }

    /// Builds a client from `GEMINI_API_KEY`; `None` when the key is unset or blank.
    pub fn from_env() -> Option<Self> {
        std::env::var(GEMINI_API_KEY_ENV)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .map(|key| Self::new(SecretString::new(key), GEMINI_DEFAULT_MODEL))
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn model_name<'a>(&'a self, requested: Option<&'a str>) -> &'a str {
        let model = requested
            .filter(|model| !model.trim().is_empty())
            .unwrap_or(self.model.as_str())
            .trim();
        model.strip_prefix("models/").unwrap_or(model)
    }

    fn generate_url(&self, model: &str) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            model
        )
    }

    /// Search-grounded generation; the model decides when to consult Google Search.
    pub async fn generate_with_search(
        &self,
        prompt: &str,
        temperature: f32,
    ) -> Result<GeminiResponse, LaunchkitError> {
        let options = GenerateOptions {
            temperature: Some(temperature),
            google_search: true,
            ..GenerateOptions::default()
        };
        self.generate(prompt, &options).await
    }

    pub async fn generate_without_tools(
        &self,
        prompt: &str,
        temperature: f32,
    ) -> Result<GeminiResponse, LaunchkitError> {
        let options = GenerateOptions {
            temperature: Some(temperature),
            ..GenerateOptions::default()
        };
        self.generate(prompt, &options).await
    }

    /// Requests JSON conforming to `schema`. Conformance is requested in the
    /// prompt only; the caller parses and checks the text.
    pub async fn generate_structured(
        &self,
        prompt: &str,
        schema: &Value,
        temperature: f32,
    ) -> Result<GeminiResponse, LaunchkitError> {
        self.generate_without_tools(&structured_prompt(prompt, schema), temperature)
            .await
    }

    pub async fn generate(
        &self,
        prompt: &str,
        options: &GenerateOptions,
    ) -> Result<GeminiResponse, LaunchkitError> {
        let model = self.model_name(options.model.as_deref()).to_string();
        let request = GenerateContentRequest {
            contents: vec![Content::text(Some("user"), prompt)],
            system_instruction: options
                .system_instruction
                .as_deref()
                .filter(|text| !text.is_empty())
                .map(|text| Content::text(None, text)),
            tools: options.google_search.then(|| {
                vec![GeminiTool {
                    google_search: GoogleSearch {},
                }]
            }),
            generation_config: if options.temperature.is_some()
                || options.max_output_tokens.is_some()
            {
                Some(GenerationConfig {
                    temperature: options.temperature,
                    max_output_tokens: options.max_output_tokens,
                })
            } else {
                None
            },
        };

        let span = tracing::info_span!(
            "llm_completion",
            provider = "gemini",
            model = %model,
            google_search = options.google_search,
        );

        async move {
            let response = self
                .http
                .post(self.generate_url(&model))
                .query(&[("key", self.api_key.expose_secret().as_str())])
                .json(&request)
                .send()
                .await
                .map_err(|err| LaunchkitError::Provider {
                    message: err.to_string(),
                    code: None,
                    status: err.status().map(|status| status.as_u16()),
                })?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(match serde_json::from_str::<GoogleErrorResponse>(&body) {
                    Ok(parsed) => LaunchkitError::Provider {
                        message: parsed.error.message,
                        code: parsed.error.status,
                        status: Some(status.as_u16()),
                    },
                    Err(_) => LaunchkitError::Provider {
                        message: format!("HTTP {}: {}", status, body),
                        code: None,
                        status: Some(status.as_u16()),
                    },
                });
            }

            let response = response
                .json::<GenerateContentResponse>()
                .await
                .map_err(|err| LaunchkitError::provider(err.to_string()))?;

            let usage = response.usage_metadata.map(|usage| Usage {
                prompt_tokens: usage.prompt_token_count,
                completion_tokens: usage.candidates_token_count,
                total_tokens: usage.total_token_count,
            });
            let model = response.model_version.unwrap_or(model);

            let candidate = response
                .candidates
                .and_then(|candidates| candidates.into_iter().next())
                .ok_or_else(|| LaunchkitError::provider("No candidates in response"))?;

            let text = candidate
                .content
                .map(|content| {
                    content
                        .parts
                        .into_iter()
                        .filter_map(|part| part.text)
                        .collect::<Vec<_>>()
                        .join("")
                })
                .unwrap_or_default();

            if text.is_empty() {
                if let Some(reason) = candidate
                    .finish_reason
                    .as_deref()
                    .filter(|reason| is_blocked_finish_reason(reason))
                {
                    return Err(LaunchkitError::Provider {
                        message: format!("Generation blocked: {}", reason),
                        code: Some(reason.to_string()),
                        status: None,
                    });
                }
            }

            Ok(GeminiResponse {
                text,
                model,
                usage,
                finish_reason: candidate.finish_reason,
                grounding_metadata: candidate.grounding_metadata,
            })
        }
        .instrument(span)
        .await
    }
}

/// [`LlmAdapter`] over [`GeminiClient`] for template-driven generation.
#[derive(Clone, Debug)]
pub struct GeminiAdapter {
    client: Option<GeminiClient>,
}

impl GeminiAdapter {
    pub fn new(client: Option<GeminiClient>) -> Self {
        Self { client }
    }

    pub fn from_env() -> Self {
        Self::new(GeminiClient::from_env())
    }

    pub fn client(&self) -> Option<&GeminiClient> {
        self.client.as_ref()
    }
}

#[async_trait::async_trait]
impl LlmAdapter for GeminiAdapter {
    fn name(&self) -> &str {
        PROVIDER
    }

    fn is_available(&self) -> bool {
        self.client.is_some()
    }

    async fn generate_completion(
        &self,
        prompt: &str,
        options: &LlmOptions,
    ) -> Result<LlmResponse, LaunchkitError> {
        let client = self
            .client
            .as_ref()
            .ok_or_else(|| LaunchkitError::unavailable(PROVIDER))?;
        options.validate()?;

        let response = client
            .generate(
                prompt,
                &GenerateOptions {
                    model: options.model.clone(),
                    temperature: Some(options.temperature_or_default()),
                    max_output_tokens: options.max_tokens,
                    system_instruction: options.system_message.clone(),
                    google_search: false,
                },
            )
            .await?;

        if response.text.is_empty() {
            return Err(LaunchkitError::provider("No completion received from Gemini"));
        }

        Ok(LlmResponse {
            content: response.text,
            model: response.model,
            usage: response.usage,
        })
    }
}
