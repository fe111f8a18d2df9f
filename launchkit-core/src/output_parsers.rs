use serde::de::DeserializeOwned;

use crate::LaunchkitError;

/// Removes a surrounding markdown code fence (with or without a `json` tag).
pub fn strip_json_fence(input: &str) -> &str {
    let cleaned = input.trim();
    if cleaned.starts_with("```json") {
        cleaned
            .trim_start_matches("```json")
            .trim_end_matches("```")
            .trim()
    } else if cleaned.starts_with("```") {
        cleaned
            .trim_start_matches("```")
            .trim_end_matches("```")
            .trim()
    } else {
        cleaned
    }
}

/// Parses LLM output as JSON. The original parser message is preserved
/// inside [`LaunchkitError::JsonResponse`].
pub fn parse_json<T: DeserializeOwned>(input: &str) -> Result<T, LaunchkitError> {
    serde_json::from_str(strip_json_fence(input))
        .map_err(|err| LaunchkitError::JsonResponse(err.to_string()))
}
