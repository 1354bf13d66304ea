//! Gemini advisory provider.
//!
//! Calls the `generateContent` REST endpoint of the Generative Language API.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

use super::config::{resolve_endpoint, resolve_model};
use super::provider::{AdvisoryProvider, ProviderInfo};

/// Gemini provider.
pub struct GeminiProvider {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl GeminiProvider {
    /// Create a provider with the configured endpoint and model.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_config(None, None, api_key)
    }

    /// Create a provider with an explicit endpoint and model.
    pub fn with_config(endpoint: Option<String>, model: Option<String>, api_key: impl Into<String>) -> Self {
        let endpoint = endpoint.unwrap_or_else(resolve_endpoint);
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            model: model.unwrap_or_else(resolve_model),
            api_key: api_key.into(),
        }
    }

    async fn generate(&self, prompt: &str, generation_config: Option<GenerationConfig<'_>>) -> Result<String> {
        let url = format!("{}/models/{}:generateContent", self.endpoint, self.model);

        let request = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config,
        };

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Advisor(format!("Gemini request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Advisor(format!("Gemini returned {status}: {body}")));
        }

        let data: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| Error::Advisor(format!("Failed to parse Gemini response: {e}")))?;

        Ok(data.text())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_mime_type: &'static str,
    response_schema: &'a serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate; empty if none.
    fn text(self) -> String {
        self.candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

impl AdvisoryProvider for GeminiProvider {
    fn info(&self) -> ProviderInfo {
        ProviderInfo {
            name: "gemini".to_string(),
            model: self.model.clone(),
            endpoint: self.endpoint.clone(),
        }
    }

    async fn generate_text(&self, prompt: &str) -> Result<String> {
        self.generate(prompt, None).await
    }

    async fn generate_json(&self, prompt: &str, schema: &serde_json::Value) -> Result<String> {
        let config = GenerationConfig {
            response_mime_type: "application/json",
            response_schema: schema,
        };
        self.generate(prompt, Some(config)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider_for(server: &MockServer) -> GeminiProvider {
        GeminiProvider::with_config(
            Some(format!("{}/", server.uri())),
            Some("gemini-2.5-flash".to_string()),
            "test-key",
        )
    }

    fn reply(parts: serde_json::Value) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{ "content": { "role": "model", "parts": parts } }]
        }))
    }

    #[test]
    fn test_provider_info() {
        let provider = GeminiProvider::with_config(
            Some("http://localhost:9999/v1beta/".to_string()),
            Some("gemini-test".to_string()),
            "k",
        );
        let info = provider.info();
        assert_eq!(info.name, "gemini");
        assert_eq!(info.model, "gemini-test");
        assert_eq!(info.endpoint, "http://localhost:9999/v1beta");
    }

    #[tokio::test]
    async fn test_generate_text_sends_key_and_joins_parts() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/gemini-2.5-flash:generateContent"))
            .and(header("x-goog-api-key", "test-key"))
            .and(body_partial_json(json!({
                "contents": [{ "role": "user", "parts": [{ "text": "Hello" }] }]
            })))
            .respond_with(reply(json!([{ "text": "Keep " }, { "text": "going." }])))
            .expect(1)
            .mount(&server)
            .await;

        let text = provider_for(&server).generate_text("Hello").await.unwrap();
        assert_eq!(text, "Keep going.");
    }

    #[tokio::test]
    async fn test_generate_json_sets_schema() {
        let server = MockServer::start().await;
        let schema = json!({ "type": "ARRAY", "items": { "type": "STRING" } });
        Mock::given(method("POST"))
            .and(body_partial_json(json!({
                "generationConfig": {
                    "responseMimeType": "application/json",
                    "responseSchema": schema.clone()
                }
            })))
            .respond_with(reply(json!([{ "text": "[\"a\",\"b\"]" }])))
            .expect(1)
            .mount(&server)
            .await;

        let text = provider_for(&server).generate_json("List", &schema).await.unwrap();
        assert_eq!(text, r#"["a","b"]"#);
    }

    #[tokio::test]
    async fn test_error_status_is_advisor_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(403).set_body_string("API key not valid"))
            .mount(&server)
            .await;

        let err = provider_for(&server).generate_text("Hi").await.unwrap_err();
        assert!(matches!(err, Error::Advisor(ref msg) if msg.contains("403")));
    }

    #[tokio::test]
    async fn test_no_candidates_is_empty_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
            .mount(&server)
            .await;

        let text = provider_for(&server).generate_text("Hi").await.unwrap();
        assert!(text.is_empty());
    }
}
