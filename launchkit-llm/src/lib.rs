// OpenAI-style wire types (always available)
pub mod openai_compatible;

// Provider-specific clients (feature-gated)
pub mod providers;

pub use launchkit_core::{LaunchkitError, LlmAdapter, LlmOptions, LlmResponse, Message, Role, Usage};

#[cfg(feature = "openai")]
pub use providers::openai::{OpenAiAdapter, OPENAI_API_KEY_ENV, OPENAI_DEFAULT_MODEL};

#[cfg(feature = "google")]
pub use providers::google::{
    structured_prompt, GeminiAdapter, GeminiClient, GeminiResponse, GenerateOptions,
    GroundingChunk, GroundingMetadata, GroundingSegment, GroundingSupport, SearchEntryPoint,
    WebSource, GEMINI_API_KEY_ENV, GEMINI_DEFAULT_MODEL,
};
