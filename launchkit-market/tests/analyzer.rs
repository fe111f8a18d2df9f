use httpmock::prelude::*;
use launchkit_llm::GeminiClient;
use launchkit_market::{fallback_chart_data, AnalyzerConfig, ChartPoint, MarketAnalyzer};
use secrecy::SecretString;
use serde_json::{json, Value};

const GENERATE_PATH: &str = "/v1beta/models/gemini-2.0-flash:generateContent";
const NARRATIVE_MARKER: &str = "googleSearch";
const CHART_MARKER: &str = "respond ONLY with a valid JSON object";
const SUMMARY_MARKER: &str = "MARKET ANALYSIS:";

const NARRATIVE: &str =
    "```html\n<h1>Report</h1>\n<p>Bikes are big.</p>\n```\n\nI've added sources for every claim.";

fn analyzer(server: &MockServer) -> MarketAnalyzer {
    let client = GeminiClient::new(SecretString::new("test-key".to_string()), "gemini-2.0-flash")
        .with_base_url(server.url(""));
    MarketAnalyzer::new(client)
}

fn text_response(text: &str) -> Value {
    json!({"candidates": [{"content": {"parts": [{"text": text}]}, "finishReason": "STOP"}]})
}

fn grounded_response(text: &str) -> Value {
    json!({
        "candidates": [{
            "content": {"parts": [{"text": text}]},
            "groundingMetadata": {
                "webSearchQueries": ["e-bike market size 2024"],
                "searchEntryPoint": {"renderedContent": "<div class=\"chips\">e-bike</div>"},
                "groundingChunks": [{"web": {"uri": "https://example.com/bikes", "title": "example.com"}}],
                "groundingSupports": [{
                    "segment": {"startIndex": 0, "endIndex": 14, "text": "Bikes are big."},
                    "groundingChunkIndices": [0],
                    "confidenceScores": [0.93]
                }]
            }
        }]
    })
}

#[tokio::test]
async fn analysis_merges_narrative_charts_and_summary() {
    let server = MockServer::start();
    let narrative = server.mock(|when, then| {
        when.method(POST)
            .path(GENERATE_PATH)
            .body_contains(NARRATIVE_MARKER)
            .body_contains("Project: Electric cargo bikes for city deliveries");
        then.status(200).json_body(grounded_response(NARRATIVE));
    });
    let charts = server.mock(|when, then| {
        when.method(POST).path(GENERATE_PATH).body_contains(CHART_MARKER);
        then.status(200).json_body(text_response(
            "```json\n{\"pieChart\": [{\"name\": \"Acme\", \"value\": 60}, {\"name\": \"Others\", \"value\": 40}]}\n```",
        ));
    });
    let summary = server.mock(|when, then| {
        when.method(POST)
            .path(GENERATE_PATH)
            .body_contains(SUMMARY_MARKER)
            .body_contains("Bikes are big.");
        then.status(200)
            .json_body(text_response("## Summary\nThe **e-bike** market is *large*."));
    });

    let result = analyzer(&server)
        .analyze("Electric cargo bikes for city deliveries")
        .await
        .unwrap();

    assert!(result.html_content.starts_with("<h1>Report</h1>\n<p>Bikes are big.</p>\n<h2"));
    assert!(result.html_content.contains("href=\"https://example.com/bikes\""));
    assert!(!result.html_content.contains("I've added"));
    assert!(result.content.starts_with("# Report"));
    assert!(result.content.ends_with("## Sources\n1. example.com\n"));
    assert!(result.is_grounded);
    assert_eq!(result.search_suggestions, vec!["e-bike market size 2024".to_string()]);
    assert_eq!(
        result.rendered_content.as_deref(),
        Some("<div class=\"chips\">e-bike</div>")
    );
    assert_eq!(result.grounding_chunks.as_ref().unwrap().len(), 1);

    let chart_data = result.chart_data.as_ref().unwrap();
    assert_eq!(
        chart_data.pie_chart.as_deref().unwrap(),
        &[ChartPoint::new("Acme", 60.0), ChartPoint::new("Others", 40.0)]
    );
    assert!(chart_data.bar_chart.is_none());
    assert_eq!(result.summary.as_deref(), Some("Summary\nThe e-bike market is large."));

    narrative.assert();
    charts.assert();
    summary.assert();

    let value = serde_json::to_value(&result).unwrap();
    assert_eq!(value["isGrounded"], json!(true));
    assert!(value.get("htmlContent").is_some());
}

#[tokio::test]
async fn unparseable_chart_data_and_failed_summary_fall_back() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path(GENERATE_PATH).body_contains(NARRATIVE_MARKER);
        then.status(200).json_body(text_response(NARRATIVE));
    });
    server.mock(|when, then| {
        when.method(POST).path(GENERATE_PATH).body_contains(CHART_MARKER);
        then.status(200).json_body(text_response("not json"));
    });
    server.mock(|when, then| {
        when.method(POST).path(GENERATE_PATH).body_contains(SUMMARY_MARKER);
        then.status(500).json_body(json!({
            "error": {"code": 500, "message": "internal", "status": "INTERNAL"}
        }));
    });

    let result = analyzer(&server).analyze("Bikes").await.unwrap();

    assert_eq!(result.chart_data, Some(fallback_chart_data()));
    assert_eq!(result.summary.as_deref(), Some("<p>Bikes are big.</p>"));
    assert!(!result.is_grounded);
    assert!(result.search_suggestions.is_empty());
    assert_eq!(result.rendered_content, None);
    assert!(result.grounding_chunks.is_none());
    assert!(!result.html_content.contains("Sources"));

    let value = serde_json::to_value(&result).unwrap();
    assert_eq!(value["renderedContent"], Value::Null);
}

#[tokio::test]
async fn chart_provider_error_falls_back() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path(GENERATE_PATH).body_contains(CHART_MARKER);
        then.status(429).json_body(json!({
            "error": {"code": 429, "message": "quota", "status": "RESOURCE_EXHAUSTED"}
        }));
    });

    let charts = analyzer(&server).generate_chart_data("Bikes").await;
    assert_eq!(charts, fallback_chart_data());
}

#[tokio::test]
async fn narrative_failure_fails_the_request() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path(GENERATE_PATH).body_contains(NARRATIVE_MARKER);
        then.status(503).json_body(json!({
            "error": {"code": 503, "message": "The model is overloaded.", "status": "UNAVAILABLE"}
        }));
    });
    let charts = server.mock(|when, then| {
        when.method(POST).path(GENERATE_PATH).body_contains(CHART_MARKER);
        then.status(200).json_body(text_response("{}"));
    });

    let err = analyzer(&server).analyze("Bikes").await.unwrap_err();
    assert_eq!(err.to_string(), "The model is overloaded.");
    assert_eq!(err.status(), Some(503));
    charts.assert_hits(0);
}

#[tokio::test]
async fn summary_call_is_skipped_when_disabled() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path(GENERATE_PATH).body_contains(NARRATIVE_MARKER);
        then.status(200).json_body(text_response("<p>Plain.</p>"));
    });
    server.mock(|when, then| {
        when.method(POST).path(GENERATE_PATH).body_contains(CHART_MARKER);
        then.status(200).json_body(text_response("{\"barChart\": [{\"name\": \"Revenue\", \"value\": 5}]}"));
    });
    let summary = server.mock(|when, then| {
        when.method(POST).path(GENERATE_PATH).body_contains(SUMMARY_MARKER);
        then.status(200).json_body(text_response("unused"));
    });

    let result = analyzer(&server)
        .with_config(AnalyzerConfig::default().with_summary(false))
        .analyze("Bikes")
        .await
        .unwrap();

    assert_eq!(result.summary, None);
    assert_eq!(result.content, "Plain.\n\n");
    let bar = &result.chart_data.unwrap().bar_chart.unwrap()[0];
    assert_eq!(bar.unit.as_deref(), Some("$"));
    summary.assert_hits(0);
}

#[tokio::test]
async fn summary_uses_low_temperature_without_tools() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path(GENERATE_PATH)
            .body_contains(SUMMARY_MARKER)
            .body_contains("\"temperature\":0.5");
        then.status(200).json_body(text_response("# Overview\nSolid **demand**.  "));
    });

    let summary = analyzer(&server)
        .generate_summary("<p>Bikes are big.</p>")
        .await
        .unwrap();
    assert_eq!(summary, "Overview\nSolid demand.");
    mock.assert();
}
