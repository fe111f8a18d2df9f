//! OpenAI chat-completions adapter

use std::fmt;
use std::time::Duration;

use launchkit_core::{LaunchkitError, LlmAdapter, LlmOptions, LlmResponse};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use tracing::Instrument;

use crate::openai_compatible::{ChatCompletionRequest, ChatCompletionResponse, OpenAiError};

const OPENAI_BASE_URL: &str = "https://api.openai.com";
pub const OPENAI_DEFAULT_MODEL: &str = "gpt-4o";
pub const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";

const PROVIDER: &str = "OpenAI";

#[derive(Clone)]
struct Credentials {
    api_key: SecretString,
    http: Client,
}

/// OpenAI adapter. Without an API key at construction it stays unavailable
/// for the life of the process.
#[derive(Clone)]
pub struct OpenAiAdapter {
    credentials: Option<Credentials>,
    base_url: String,
    default_model: String,
}

impl fmt::Debug for OpenAiAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let api_key = if self.credentials.is_some() {
            "<redacted>"
        } else {
            "<none>"
        };
        f.debug_struct("OpenAiAdapter")
            .field("base_url", &self.base_url)
            .field("default_model", &self.default_model)
            .field("api_key", &api_key)
            .finish()
    }
}

impl OpenAiAdapter {
    pub fn new(api_key: Option<SecretString>) -> Self {
        let credentials = api_key
            .filter(|key| !key.expose_secret().trim().is_empty())
            .map(|api_key| Credentials {
                api_key,
                http: Client::builder()
                    .timeout(Duration::from_secs(120))
                    .build()
                    .expect("valid reqwest client config"),
            });
        Self {
            credentials,
            base_url: OPENAI_BASE_URL.to_string(),
            default_model: OPENAI_DEFAULT_MODEL.to_string(),
        }
    }

    /// Reads `OPENAI_API_KEY` once.
    pub fn from_env() -> Self {
        Self::new(std::env::var(OPENAI_API_KEY_ENV).ok().map(SecretString::new))
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = model.into();
        self
    }

    fn completions_url(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url.trim_end_matches('/'))
    }

    fn build_request(&self, prompt: &str, options: &LlmOptions) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: options
                .model
                .clone()
                .unwrap_or_else(|| self.default_model.clone()),
            messages: options.messages_for(prompt),
            temperature: Some(options.temperature_or_default()),
            max_tokens: options.max_tokens,
            stream: false,
        }
    }
}

fn transport_error(err: reqwest::Error) -> LaunchkitError {
    LaunchkitError::Provider {
        message: err.to_string(),
        code: None,
        status: err.status().map(|status| status.as_u16()),
    }
}

#[async_trait::async_trait]
impl LlmAdapter for OpenAiAdapter {
    fn name(&self) -> &str {
        PROVIDER
    }

    fn is_available(&self) -> bool {
        self.credentials.is_some()
    }

    async fn generate_completion(
        &self,
        prompt: &str,
        options: &LlmOptions,
    ) -> Result<LlmResponse, LaunchkitError> {
        let credentials = self
            .credentials
            .as_ref()
            .ok_or_else(|| LaunchkitError::unavailable(PROVIDER))?;
        options.validate()?;

        let request = self.build_request(prompt, options);
        let span = tracing::info_span!(
            "llm_completion",
            provider = "openai",
            model = %request.model
        );

        async move {
            let response = credentials
                .http
                .post(self.completions_url())
                .bearer_auth(credentials.api_key.expose_secret())
                .json(&request)
                .send()
                .await
                .map_err(transport_error)?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(match serde_json::from_str::<OpenAiError>(&body) {
                    Ok(parsed) => LaunchkitError::Provider {
                        message: parsed.error.message,
                        code: parsed.error.code.or(parsed.error.error_type),
                        status: Some(status.as_u16()),
                    },
                    Err(_) => LaunchkitError::Provider {
                        message: format!("HTTP {}: {}", status, body),
                        code: None,
                        status: Some(status.as_u16()),
                    },
                });
            }

            let completion = response
                .json::<ChatCompletionResponse>()
                .await
                .map_err(transport_error)?;

            let content = completion
                .choices
                .into_iter()
                .next()
                .and_then(|choice| choice.message.content)
                .filter(|content| !content.is_empty())
                .ok_or_else(|| LaunchkitError::provider("No completion received from OpenAI"))?;

            Ok(LlmResponse {
                content,
                model: completion.model,
                usage: Some(completion.usage.unwrap_or_default().into()),
            })
        }
        .instrument(span)
        .await
    }
}
