use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use crate::PromptError;

/// Scalar supplied for a template variable.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(untagged)]
pub enum TemplateValue {
    Bool(bool),
    Number(serde_json::Number),
    Text(String),
}

impl fmt::Display for TemplateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateValue::Bool(value) => write!(f, "{value}"),
            TemplateValue::Number(value) => write!(f, "{value}"),
            TemplateValue::Text(value) => f.write_str(value),
        }
    }
}

impl From<&str> for TemplateValue {
    fn from(value: &str) -> Self {
        TemplateValue::Text(value.to_string())
    }
}

impl From<String> for TemplateValue {
    fn from(value: String) -> Self {
        TemplateValue::Text(value)
    }
}

impl From<bool> for TemplateValue {
    fn from(value: bool) -> Self {
        TemplateValue::Bool(value)
    }
}

impl From<i64> for TemplateValue {
    fn from(value: i64) -> Self {
        TemplateValue::Number(value.into())
    }
}

/// Per-request variable values. Keys beyond the declared variables are ignored.
pub type TemplateInput = HashMap<String, TemplateValue>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PromptTemplate {
    pub id: String,
    pub name: String,
    pub description: String,
    pub system_message: String,
    pub user_template: String,
    pub variables: Vec<String>,
}

/// System and user text ready to send to an adapter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilledPrompt {
    pub system_message: String,
    pub user_message: String,
}

fn placeholder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\{\{(\w+)\}\}").expect("valid placeholder regex"))
}

impl PromptTemplate {
    /// Declared variables absent from `input`, in declaration order.
    pub fn missing_variables(&self, input: &TemplateInput) -> Vec<String> {
        self.variables
            .iter()
            .filter(|variable| !input.contains_key(variable.as_str()))
            .cloned()
            .collect()
    }

    pub fn validate_input(&self, input: &TemplateInput) -> Result<(), PromptError> {
        let missing_variables = self.missing_variables(input);
        if missing_variables.is_empty() {
            Ok(())
        } else {
            Err(PromptError::MissingVariable {
                template_id: self.id.clone(),
                missing_variables,
            })
        }
    }

    /// Substitutes every declared `{{variable}}` in a single pass, so values
    /// that themselves contain placeholders are inserted verbatim.
    pub fn fill(&self, input: &TemplateInput) -> Result<FilledPrompt, PromptError> {
        self.validate_input(input)?;

        let user_message =
            placeholder_pattern().replace_all(&self.user_template, |caps: &Captures| {
                let key = &caps[1];
                let declared = self.variables.iter().any(|variable| variable == key);
                match input.get(key) {
                    Some(value) if declared => value.to_string(),
                    _ => caps[0].to_string(),
                }
            });

        Ok(FilledPrompt {
            system_message: self.system_message.clone(),
            user_message: user_message.into_owned(),
        })
    }
}

pub fn validate_template_input(
    template: &PromptTemplate,
    input: &TemplateInput,
) -> Result<(), PromptError> {
    template.validate_input(input)
}

pub fn fill_template(
    template: &PromptTemplate,
    input: &TemplateInput,
) -> Result<FilledPrompt, PromptError> {
    template.fill(input)
}
