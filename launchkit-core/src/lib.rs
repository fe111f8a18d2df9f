mod engine;
mod error;
mod llm;
pub mod output_parsers;

pub use engine::{LlmEngine, JSON_INSTRUCTION};
pub use error::LaunchkitError;
pub use llm::{LlmAdapter, LlmOptions, LlmResponse, Message, Role, Usage, DEFAULT_TEMPERATURE};
