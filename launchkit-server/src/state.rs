use launchkit_core::LlmEngine;
use launchkit_market::MarketAnalyzer;
use launchkit_prompt::TemplateRegistry;
use serde::Serialize;

/// Which provider adapters were configured with a credential.
#[derive(Clone, Copy, Debug, Default, Serialize, PartialEq, Eq)]
pub struct ProviderStatus {
    pub openai: bool,
    pub gemini: bool,
}

/// Shared, read-only handler state built once at startup.
#[derive(Clone, Debug)]
pub struct AppState {
    pub engine: LlmEngine,
    pub templates: &'static TemplateRegistry,
    /// `None` when no Gemini key was supplied.
    pub market: Option<MarketAnalyzer>,
    pub providers: ProviderStatus,
}

impl AppState {
    pub fn new(
        engine: LlmEngine,
        market: Option<MarketAnalyzer>,
        providers: ProviderStatus,
    ) -> Self {
        Self {
            engine,
            templates: TemplateRegistry::builtin(),
            market,
            providers,
        }
    }
}
