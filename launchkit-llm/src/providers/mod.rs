//! Provider-specific LLM clients

#[cfg(feature = "openai")]
pub mod openai;

#[cfg(feature = "google")]
pub mod google;
