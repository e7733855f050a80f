//! Generative-AI text completion.
//!
//! The concierge and the question classifier only need "prompt in, text
//! out", expressed by [`TextGenerator`]. [`GeminiClient`] implements it
//! against the `generateContent` REST endpoint.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::GeminiSettings;
use crate::error::{ServiceError, ServiceResult};

const SERVICE: &str = "gemini";

/// Produces a text completion for a prompt.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Returns the generated text.
    ///
    /// # Errors
    ///
    /// Returns `Upstream` when the model cannot be reached or returns no text.
    async fn generate(&self, prompt: &str) -> ServiceResult<String>;
}

/// HTTP client for the Gemini `generateContent` API.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    settings: GeminiSettings,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: [RequestPart<'a>; 1],
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: String,
}

impl GeminiClient {
    /// Creates a client sharing the given connection pool.
    pub fn new(client: Client, settings: GeminiSettings) -> Self {
        Self { client, settings }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.settings.base_url.trim_end_matches('/'),
            self.settings.model
        )
    }
}

/// Joins the text parts of the first candidate.
fn first_candidate_text(response: GenerateResponse) -> Option<String> {
    let text: String = response
        .candidates
        .into_iter()
        .next()?
        .content?
        .parts
        .into_iter()
        .map(|p| p.text)
        .collect();
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> ServiceResult<String> {
        let body = GenerateRequest {
            contents: [Content {
                role: "user",
                parts: [RequestPart { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", self.settings.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| ServiceError::upstream(SERVICE, e.to_string()))?
            .error_for_status()
            .map_err(|e| ServiceError::upstream(SERVICE, e.to_string()))?;

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| ServiceError::upstream(SERVICE, format!("invalid response body: {e}")))?;

        let text = first_candidate_text(parsed)
            .ok_or_else(|| ServiceError::upstream(SERVICE, "response contained no text"))?;

        debug!(model = %self.settings.model, chars = text.len(), "Generated completion");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> GeminiSettings {
        GeminiSettings {
            api_key: "key".to_string(),
            model: "gemini-1.5-flash".to_string(),
            base_url: "https://example.test/v1beta/".to_string(),
        }
    }

    #[test]
    fn test_endpoint_format() {
        let client = GeminiClient::new(Client::new(), settings());
        assert_eq!(
            client.endpoint(),
            "https://example.test/v1beta/models/gemini-1.5-flash:generateContent"
        );
    }

    #[test]
    fn test_request_body_shape() {
        let body = GenerateRequest {
            contents: [Content {
                role: "user",
                parts: [RequestPart { text: "hello" }],
            }],
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hello");
    }

    #[test]
    fn test_first_candidate_text_joins_parts() {
        let response: GenerateResponse = serde_json::from_value(serde_json::json!({
            "candidates": [
                { "content": { "parts": [{ "text": "Hello " }, { "text": "guest" }] } },
                { "content": { "parts": [{ "text": "ignored" }] } }
            ]
        }))
        .unwrap();
        assert_eq!(first_candidate_text(response).as_deref(), Some("Hello guest"));
    }

    #[test]
    fn test_empty_candidates_yield_none() {
        let response: GenerateResponse = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(first_candidate_text(response), None);

        let blocked: GenerateResponse =
            serde_json::from_value(serde_json::json!({ "candidates": [{ "finishReason": "SAFETY" }] }))
                .unwrap();
        assert_eq!(first_candidate_text(blocked), None);
    }
}
