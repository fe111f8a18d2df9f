use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use clap::{Parser, ValueEnum};
use launchkit_core::{LlmAdapter, LlmEngine};
use launchkit_llm::{
    GeminiAdapter, GeminiClient, OpenAiAdapter, GEMINI_DEFAULT_MODEL, OPENAI_DEFAULT_MODEL,
};
use launchkit_market::{AnalyzerConfig, MarketAnalyzer};
use secrecy::{ExposeSecret, SecretString};

use crate::state::{AppState, ProviderStatus};

pub const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;

/// Adapter wrapped by the template endpoint's engine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum GenerateProvider {
    #[default]
    Openai,
    Gemini,
}

#[derive(Debug, Parser)]
#[command(
    name = "launchkit-server",
    about = "HTTP API for prompt-template generation and market analysis",
    version
)]
pub struct ServerConfig {
    /// Address to listen on
    #[arg(long, env = "LAUNCHKIT_BIND", default_value = "127.0.0.1:3000")]
    pub bind: SocketAddr,

    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true, value_parser = parse_secret)]
    pub openai_api_key: Option<SecretString>,

    #[arg(long, env = "OPENAI_MODEL", default_value = OPENAI_DEFAULT_MODEL)]
    pub openai_model: String,

    /// Overrides the OpenAI API host
    #[arg(long, env = "OPENAI_BASE_URL")]
    pub openai_base_url: Option<String>,

    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true, value_parser = parse_secret)]
    pub gemini_api_key: Option<SecretString>,

    #[arg(long, env = "GEMINI_MODEL", default_value = GEMINI_DEFAULT_MODEL)]
    pub gemini_model: String,

    /// Overrides the Gemini API host
    #[arg(long, env = "GEMINI_BASE_URL")]
    pub gemini_base_url: Option<String>,

    #[arg(
        long,
        env = "LAUNCHKIT_GENERATE_PROVIDER",
        value_enum,
        default_value_t = GenerateProvider::Openai
    )]
    pub generate_provider: GenerateProvider,

    /// Skip the summary call inside market analysis
    #[arg(long, env = "LAUNCHKIT_SKIP_SUMMARY")]
    pub skip_summary: bool,

    /// Maximum request body size in bytes
    #[arg(long, env = "LAUNCHKIT_BODY_LIMIT", default_value_t = DEFAULT_BODY_LIMIT)]
    pub body_limit: usize,
}

fn parse_secret(value: &str) -> Result<SecretString, Infallible> {
    Ok(SecretString::new(value.to_string()))
}

fn non_blank(key: &Option<SecretString>) -> Option<SecretString> {
    key.as_ref()
        .filter(|key| !key.expose_secret().trim().is_empty())
        .cloned()
}

impl ServerConfig {
    pub fn openai_adapter(&self) -> OpenAiAdapter {
        let adapter =
            OpenAiAdapter::new(non_blank(&self.openai_api_key)).with_model(&self.openai_model);
        match &self.openai_base_url {
            Some(base_url) => adapter.with_base_url(base_url),
            None => adapter,
        }
    }

    /// `None` when the Gemini key is unset or blank.
    pub fn gemini_client(&self) -> Option<GeminiClient> {
        non_blank(&self.gemini_api_key).map(|key| {
            let client = GeminiClient::new(key, &self.gemini_model);
            match &self.gemini_base_url {
                Some(base_url) => client.with_base_url(base_url),
                None => client,
            }
        })
    }

    pub fn analyzer_config(&self) -> AnalyzerConfig {
        AnalyzerConfig::default().with_summary(!self.skip_summary)
    }

    /// Constructs every client once; handlers share them through [`AppState`].
    pub fn build_state(&self) -> AppState {
        let openai = self.openai_adapter();
        let gemini = self.gemini_client();
        let providers = ProviderStatus {
            openai: openai.is_available(),
            gemini: gemini.is_some(),
        };

        let adapter: Arc<dyn LlmAdapter> = match self.generate_provider {
            GenerateProvider::Openai => Arc::new(openai),
            GenerateProvider::Gemini => Arc::new(GeminiAdapter::new(gemini.clone())),
        };
        let market = gemini
            .map(|client| MarketAnalyzer::new(client).with_config(self.analyzer_config()));

        AppState::new(LlmEngine::new(adapter), market, providers)
    }
}
