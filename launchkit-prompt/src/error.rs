use serde::Serialize;
use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum PromptError {
    #[error("Template with id '{template_id}' not found")]
    TemplateNotFound { template_id: String },
    #[error("Missing required variables: {}", missing_variables.join(", "))]
    MissingVariable {
        template_id: String,
        missing_variables: Vec<String>,
    },
}

/// Structured payload attached to a [`PromptError`] at the request boundary.
#[derive(Clone, Debug, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PromptErrorDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub missing_variables: Option<Vec<String>>,
}

impl PromptError {
    pub fn code(&self) -> &'static str {
        match self {
            PromptError::TemplateNotFound { .. } => "TEMPLATE_NOT_FOUND",
            PromptError::MissingVariable { .. } => "MISSING_VARIABLE",
        }
    }

    pub fn details(&self) -> PromptErrorDetails {
        match self {
            PromptError::TemplateNotFound { template_id } => PromptErrorDetails {
                template_id: Some(template_id.clone()),
                missing_variables: None,
            },
            PromptError::MissingVariable {
                template_id,
                missing_variables,
            } => PromptErrorDetails {
                template_id: Some(template_id.clone()),
                missing_variables: Some(missing_variables.clone()),
            },
        }
    }
}
