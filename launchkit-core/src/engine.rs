use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::output_parsers::parse_json;
use crate::{LaunchkitError, LlmAdapter, LlmOptions, LlmResponse};

/// Instruction appended to prompts sent through [`LlmEngine::generate_json`].
pub const JSON_INSTRUCTION: &str = "Respond with valid JSON only.";

/// Thin wrapper over an adapter that adds JSON-mode generation.
#[derive(Clone)]
pub struct LlmEngine {
    adapter: Arc<dyn LlmAdapter>,
}

impl LlmEngine {
    pub fn new(adapter: Arc<dyn LlmAdapter>) -> Self {
        Self { adapter }
    }

    pub fn adapter(&self) -> &dyn LlmAdapter {
        self.adapter.as_ref()
    }

    pub fn is_available(&self) -> bool {
        self.adapter.is_available()
    }

    pub async fn generate_completion(
        &self,
        prompt: &str,
        options: &LlmOptions,
    ) -> Result<LlmResponse, LaunchkitError> {
        self.adapter.generate_completion(prompt, options).await
    }

    /// Asks for JSON at temperature 0 and parses the reply. The parsed value
    /// is not checked against any schema.
    pub async fn generate_json<T: DeserializeOwned>(
        &self,
        prompt: &str,
        options: &LlmOptions,
    ) -> Result<T, LaunchkitError> {
        let enhanced = format!("{prompt}\n\n{JSON_INSTRUCTION}");
        let options = LlmOptions {
            temperature: Some(0.0),
            ..options.clone()
        };
        let response = self.generate_completion(&enhanced, &options).await?;
        parse_json(&response.content)
    }
}

impl std::fmt::Debug for LlmEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmEngine")
            .field("adapter", &self.adapter.name())
            .field("available", &self.adapter.is_available())
            .finish()
    }
}
