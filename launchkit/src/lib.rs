//! launchkit: prompt templates, LLM adapters and a market-analysis pipeline.
//!
//! This crate re-exports the workspace crates behind cargo features:
//!
//! | feature | crate |
//! |---|---|
//! | (always) | [`core`], [`prompt`] |
//! | `openai`, `google` | [`llm`] |
//! | `market` | [`market`] |
//! | `server` | [`server`] |

pub use launchkit_core as core;
pub use launchkit_prompt as prompt;

#[cfg(any(feature = "openai", feature = "google"))]
pub use launchkit_llm as llm;

#[cfg(feature = "market")]
pub use launchkit_market as market;

#[cfg(feature = "server")]
pub use launchkit_server as server;

pub use launchkit_core::{LaunchkitError, LlmAdapter, LlmEngine, LlmOptions, LlmResponse};
pub use launchkit_prompt::{fill_template, get_template_by_id, PromptError, PromptTemplate};

/// Common imports for application code.
pub mod prelude {
    pub use launchkit_core::{LaunchkitError, LlmAdapter, LlmEngine, LlmOptions, LlmResponse, Usage};
    pub use launchkit_prompt::{
        fill_template, get_template_by_id, PromptError, TemplateInput, TemplateValue,
    };

    #[cfg(feature = "openai")]
    pub use launchkit_llm::OpenAiAdapter;

    #[cfg(feature = "google")]
    pub use launchkit_llm::{GeminiAdapter, GeminiClient};

    #[cfg(feature = "market")]
    pub use launchkit_market::{MarketAnalysisResult, MarketAnalyzer};
}
