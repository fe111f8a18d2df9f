//! Prompt templates for launchkit.
//!
//! A template declares the variables its user text needs. Filling validates
//! the input first and then substitutes `{{variable}}` tokens in one pass.
//!
//! ```rust
//! use launchkit_prompt::{get_template_by_id, TemplateInput};
//!
//! let template = get_template_by_id("mission-statement").unwrap();
//! let mut input = TemplateInput::new();
//! input.insert("productIdea".to_string(), "A meal planner".into());
//! let filled = template.fill(&input).unwrap();
//! assert!(filled.user_message.contains("A meal planner"));
//! ```
mod error;
mod registry;
mod template;

pub use error::{PromptError, PromptErrorDetails};
pub use registry::{get_template_by_id, TemplateRegistry};
pub use template::{
    fill_template, validate_template_input, FilledPrompt, PromptTemplate, TemplateInput,
    TemplateValue,
};
