use thiserror::Error;

#[derive(Debug, Error)]
pub enum LaunchkitError {
    #[error("{provider} client is not initialized. Please check your API key.")]
    Unavailable { provider: String },
    #[error("{message}")]
    Provider {
        message: String,
        code: Option<String>,
        status: Option<u16>,
    },
    #[error("Failed to parse JSON response from LLM: {0}")]
    JsonResponse(String),
    #[error("Parsing failed on output '{output}': {reason}")]
    ParseFailed { output: String, reason: String },
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Serialization/deserialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("{0}")]
    Custom(String),
}

impl LaunchkitError {
    /// Provider failure without a vendor code or HTTP status.
    pub fn provider(message: impl Into<String>) -> Self {
        LaunchkitError::Provider {
            message: message.into(),
            code: None,
            status: None,
        }
    }

    pub fn unavailable(provider: impl Into<String>) -> Self {
        LaunchkitError::Unavailable {
            provider: provider.into(),
        }
    }

    /// Stable machine-readable code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            LaunchkitError::Unavailable { .. } => "SERVICE_UNAVAILABLE",
            LaunchkitError::Provider { .. } => "PROVIDER_ERROR",
            LaunchkitError::JsonResponse(_) => "INVALID_JSON_RESPONSE",
            LaunchkitError::ParseFailed { .. } => "PARSE_FAILED",
            LaunchkitError::InvalidConfig(_) => "INVALID_CONFIG",
            LaunchkitError::Serde(_) => "SERDE_ERROR",
            LaunchkitError::Custom(_) => "INTERNAL_ERROR",
        }
    }

    /// HTTP status reported by the provider, if the failure came from one.
    pub fn status(&self) -> Option<u16> {
        match self {
            LaunchkitError::Provider { status, .. } => *status,
            _ => None,
        }
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, LaunchkitError::Unavailable { .. })
    }
}
