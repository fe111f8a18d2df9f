#![cfg(feature = "google")]

use httpmock::prelude::*;
use launchkit_llm::{
    structured_prompt, GeminiAdapter, GeminiClient, LaunchkitError, LlmAdapter, LlmOptions,
};
use secrecy::SecretString;
use serde_json::json;

fn client(server: &MockServer) -> GeminiClient {
    GeminiClient::new(SecretString::new("test-key".to_string()), "gemini-2.0-flash")
        .with_base_url(server.url(""))
}

#[tokio::test]
async fn adapter_maps_text_usage_and_system_instruction() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/v1beta/models/gemini-2.0-flash:generateContent")
            .query_param("key", "test-key")
            .json_body(json!({
                "systemInstruction": {"parts": [{"text": "You are concise."}]},
                "contents": [{"role": "user", "parts": [{"text": "hi"}]}],
                "generationConfig": {"temperature": 0.7}
            }));
        then.status(200).json_body(json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "hel"}, {"text": "lo"}]},
                "finishReason": "STOP"
            }],
            "usageMetadata": {"promptTokenCount": 4, "candidatesTokenCount": 2, "totalTokenCount": 6},
            "modelVersion": "gemini-2.0-flash-001"
        }));
    });

    let adapter = GeminiAdapter::new(Some(client(&server)));
    assert!(adapter.is_available());

    let response = adapter
        .generate_completion("hi", &LlmOptions::new().with_system_message("You are concise."))
        .await
        .unwrap();

    assert_eq!(response.content, "hello");
    assert_eq!(response.model, "gemini-2.0-flash-001");
    let usage = response.usage.unwrap();
    assert_eq!(usage.total_tokens, 6);
    assert_eq!(usage.completion_tokens, 2);
    mock.assert();
}

#[tokio::test]
async fn search_mode_sends_google_search_tool_and_returns_grounding() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/v1beta/models/gemini-2.0-flash:generateContent")
            .json_body(json!({
                "contents": [{"role": "user", "parts": [{"text": "market for bikes"}]}],
                "tools": [{"googleSearch": {}}],
                "generationConfig": {"temperature": 0.7}
            }));
        then.status(200).json_body(json!({
            "candidates": [{
                "content": {"parts": [{"text": "<p>Bikes are big.</p>"}]},
                "groundingMetadata": {
                    "webSearchQueries": ["bike market size"],
                    "searchEntryPoint": {"renderedContent": "<div>chips</div>"},
                    "groundingChunks": [{"web": {"uri": "https://example.com", "title": "example.com"}}],
                    "groundingSupports": [{
                        "segment": {"startIndex": 0, "endIndex": 10, "text": "Bikes are big."},
                        "groundingChunkIndices": [0],
                        "confidenceScores": [0.9]
                    }]
                }
            }]
        }));
    });

    let response = client(&server)
        .generate_with_search("market for bikes", 0.7)
        .await
        .unwrap();

    assert_eq!(response.text, "<p>Bikes are big.</p>");
    assert_eq!(response.search_suggestions_html(), Some("<div>chips</div>"));
    let metadata = response.grounding_metadata.unwrap();
    assert_eq!(metadata.web_search_queries, vec!["bike market size".to_string()]);
    let chunks = metadata.grounding_chunks.unwrap();
    assert_eq!(chunks[0].web.as_ref().unwrap().title, "example.com");
    assert_eq!(metadata.grounding_supports.unwrap()[0].grounding_chunk_indices, vec![0]);
    mock.assert();
}

#[tokio::test]
async fn structured_mode_embeds_schema_in_prompt() {
    let server = MockServer::start();
    let schema = json!({"type": "object", "properties": {"a": {"type": "number"}}});
    let expected_prompt = structured_prompt("give numbers", &schema);
    assert!(expected_prompt.contains("IMPORTANT: You must respond ONLY with a valid JSON object"));
    assert!(expected_prompt.contains("\"properties\""));

    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/v1beta/models/gemini-2.0-flash:generateContent")
            .json_body(json!({
                "contents": [{"role": "user", "parts": [{"text": expected_prompt}]}],
                "generationConfig": {"temperature": 0.5}
            }));
        then.status(200).json_body(json!({
            "candidates": [{"content": {"parts": [{"text": "{\"a\": 1}"}]}}]
        }));
    });

    let response = client(&server)
        .generate_structured("give numbers", &schema, 0.5)
        .await
        .unwrap();
    assert_eq!(response.text, "{\"a\": 1}");
    assert!(response.grounding_metadata.is_none());
    mock.assert();
}

#[tokio::test]
async fn blocked_finish_reason_without_text_is_an_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST);
        then.status(200).json_body(json!({
            "candidates": [{"content": {"parts": []}, "finishReason": "SAFETY"}]
        }));
    });

    let err = client(&server)
        .generate_without_tools("hi", 0.7)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Generation blocked: SAFETY");
}

#[tokio::test]
async fn provider_error_message_and_status_are_preserved() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST);
        then.status(429).json_body(json!({
            "error": {"code": 429, "message": "Resource has been exhausted", "status": "RESOURCE_EXHAUSTED"}
        }));
    });

    let err = client(&server)
        .generate_without_tools("hi", 0.7)
        .await
        .unwrap_err();
    match err {
        LaunchkitError::Provider {
            message,
            code,
            status,
        } => {
            assert_eq!(message, "Resource has been exhausted");
            assert_eq!(code.as_deref(), Some("RESOURCE_EXHAUSTED"));
            assert_eq!(status, Some(429));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn adapter_without_client_is_unavailable() {
    let adapter = GeminiAdapter::new(None);
    assert!(!adapter.is_available());
    let err = adapter
        .generate_completion("hi", &LlmOptions::new())
        .await
        .unwrap_err();
    assert!(err.is_unavailable());
    assert_eq!(
        err.to_string(),
        "Gemini client is not initialized. Please check your API key."
    );
}
