//! Gemini `generateContent` client.

use async_trait::async_trait;
use log::{debug, error};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{
    prompt::{build_prompt, response_schema},
    TimelineGenerator,
};
use crate::{
    error::{Result, TimelineError},
    models::Timeline,
    params::GenerateTimeline,
};

/// Default API root of the generation endpoint.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default model used for timeline generation.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Message used when an error body cannot be decoded.
const UNKNOWN_API_ERROR: &str = "Unknown API error format.";

/// Gemini client configuration.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub base_url: String,
    pub model: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

// ============================================================================
// Gemini API structs (private)
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    response_schema: Value,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: Option<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: Option<String>,
}

/// Extracts the upstream error message from a failed response body, falling
/// back to a generic message when the body is not the documented shape.
fn upstream_error_message(body: &str) -> String {
    serde_json::from_str::<ErrorResponse>(body)
        .ok()
        .and_then(|e| e.error)
        .and_then(|e| e.message)
        .unwrap_or_else(|| UNKNOWN_API_ERROR.to_string())
}

/// Parses a successful response body into a timeline.
///
/// The envelope must carry `candidates[0].content.parts[0].text`; that text is
/// itself the JSON timeline document.
fn parse_generate_response(body: &str) -> Result<Timeline> {
    let response: GenerateResponse =
        serde_json::from_str(body).map_err(|e| TimelineError::UpstreamProtocol {
            reason: format!("response is not a valid envelope: {e}"),
        })?;

    let text = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .and_then(|c| c.parts.into_iter().next())
        .and_then(|p| p.text)
        .ok_or_else(|| TimelineError::UpstreamProtocol {
            reason: "missing candidates[0].content.parts[0].text".to_string(),
        })?;

    serde_json::from_str(&text).map_err(|source| {
        error!("Generated payload is not a valid timeline: {source}");
        TimelineError::MalformedPayload { source }
    })
}

/// Client for the Gemini `generateContent` endpoint.
///
/// Issues exactly one request per call: no retry, no timeout override, no
/// streaming, and no guard against concurrent calls.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    config: GeminiConfig,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// Create a client against a custom API root (for testing / proxies).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self::new(GeminiConfig {
            base_url: base_url.into(),
            ..GeminiConfig::default()
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }
}

impl Default for GeminiClient {
    fn default() -> Self {
        Self::new(GeminiConfig::default())
    }
}

#[async_trait]
impl TimelineGenerator for GeminiClient {
    async fn generate(&self, params: &GenerateTimeline) -> Result<Timeline> {
        params.validate()?;

        let request = GenerateRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some(build_prompt(params)),
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: response_schema(),
            },
        };

        let key = params.api_key.as_deref().unwrap_or_default();
        debug!(
            "Requesting timeline from model {} (credential supplied: {})",
            self.config.model,
            !key.is_empty()
        );

        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", key)])
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if !status.is_success() {
            let message = upstream_error_message(&body);
            error!("Generation API error ({}): {message}", status.as_u16());
            return Err(TimelineError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        let timeline = parse_generate_response(&body)?;
        debug!(
            "Generated timeline '{}' with {} phases",
            timeline.title,
            timeline.phases.len()
        );
        Ok(timeline)
    }

    fn name(&self) -> &str {
        "gemini"
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn bakery_request() -> GenerateTimeline {
        GenerateTimeline {
            business_type: "Local bakery".to_string(),
            business_position: "1 year old, 2 employees".to_string(),
            growth_goals: "Open second location in 18 months".to_string(),
            api_key: Some("test-api-key".to_string()),
        }
    }

    fn envelope(text: &str) -> serde_json::Value {
        json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": text }] }
            }]
        })
    }

    fn two_phase_timeline() -> serde_json::Value {
        json!({
            "timelineTitle": "Bakery Growth Plan",
            "phases": [
                {
                    "phaseName": "Foundation",
                    "duration": "Months 1-6",
                    "keyObjectives": ["Stabilize cash flow"],
                    "focusAreas": ["Operations"],
                    "potentialMetrics": ["Monthly revenue"],
                    "notes": "Focus on unit economics."
                },
                {
                    "phaseName": "Expansion",
                    "duration": "Months 7-18",
                    "keyObjectives": ["Sign lease", "Hire staff"],
                    "focusAreas": ["Real estate", "Hiring", "Brand"],
                    "potentialMetrics": ["Second-site revenue"],
                    "notes": ""
                }
            ]
        })
    }

    async fn mount(server: &MockServer, template: ResponseTemplate) {
        Mock::given(method("POST"))
            .and(path("/models/gemini-2.0-flash:generateContent"))
            .respond_with(template)
            .expect(1)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_generate_sends_prompt_and_schema_and_parses_phases_in_order() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/gemini-2.0-flash:generateContent"))
            .and(query_param("key", "test-api-key"))
            .and(body_partial_json(json!({
                "contents": [{ "role": "user" }],
                "generationConfig": { "responseMimeType": "application/json" }
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(envelope(&two_phase_timeline().to_string())),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = GeminiClient::with_base_url(server.uri());
        let timeline = client.generate(&bakery_request()).await.expect("timeline");

        assert_eq!(timeline.title, "Bakery Growth Plan");
        let names: Vec<&str> = timeline.phases.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Foundation", "Expansion"]);
        assert_eq!(timeline.phases[1].focus_areas.len(), 3);
        assert!(timeline.phases.iter().all(|p| !p.completed));
    }

    #[tokio::test]
    async fn test_empty_input_fails_before_any_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = GeminiClient::with_base_url(server.uri());
        let mut params = bakery_request();
        params.growth_goals = String::new();

        let err = client.generate(&params).await.unwrap_err();
        assert!(matches!(err, TimelineError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_upstream_error_message_is_surfaced() {
        let server = MockServer::start().await;
        mount(
            &server,
            ResponseTemplate::new(400)
                .set_body_json(json!({ "error": { "code": 400, "message": "API key not valid" } })),
        )
        .await;

        let client = GeminiClient::with_base_url(server.uri());
        let err = client.generate(&bakery_request()).await.unwrap_err();

        match &err {
            TimelineError::Upstream { status, message } => {
                assert_eq!(*status, 400);
                assert_eq!(message, "API key not valid");
            }
            other => panic!("expected upstream error, got {other:?}"),
        }
        assert!(err.to_string().contains("API key not valid"));
    }

    #[tokio::test]
    async fn test_non_json_error_body_uses_generic_message() {
        let server = MockServer::start().await;
        mount(
            &server,
            ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"),
        )
        .await;

        let client = GeminiClient::with_base_url(server.uri());
        let err = client.generate(&bakery_request()).await.unwrap_err();

        match err {
            TimelineError::Upstream { status, message } => {
                assert_eq!(status, 502);
                assert_eq!(message, UNKNOWN_API_ERROR);
            }
            other => panic!("expected upstream error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_candidates_is_a_protocol_error() {
        let server = MockServer::start().await;
        mount(
            &server,
            ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })),
        )
        .await;

        let client = GeminiClient::with_base_url(server.uri());
        let err = client.generate(&bakery_request()).await.unwrap_err();
        assert!(matches!(err, TimelineError::UpstreamProtocol { .. }));
    }

    #[tokio::test]
    async fn test_invalid_inner_payload_is_malformed_not_protocol() {
        let server = MockServer::start().await;
        mount(
            &server,
            ResponseTemplate::new(200).set_body_json(envelope("{ this is not json")),
        )
        .await;

        let client = GeminiClient::with_base_url(server.uri());
        let err = client.generate(&bakery_request()).await.unwrap_err();
        assert!(matches!(err, TimelineError::MalformedPayload { .. }));
    }

    #[test]
    fn test_envelope_without_text_part_is_protocol_error() {
        let body = json!({ "candidates": [{ "content": { "parts": [{}] } }] }).to_string();
        assert!(matches!(
            parse_generate_response(&body),
            Err(TimelineError::UpstreamProtocol { .. })
        ));
    }

    #[test]
    fn test_payload_missing_required_field_is_malformed() {
        let body = envelope(r#"{"phases": []}"#).to_string();
        assert!(matches!(
            parse_generate_response(&body),
            Err(TimelineError::MalformedPayload { .. })
        ));
    }

    #[test]
    fn test_error_message_falls_back_when_shape_differs() {
        assert_eq!(upstream_error_message(r#"{"error": "flat"}"#), UNKNOWN_API_ERROR);
        assert_eq!(upstream_error_message(""), UNKNOWN_API_ERROR);
        assert_eq!(
            upstream_error_message(r#"{"error": {"message": "quota"}}"#),
            "quota"
        );
    }
}
