//! Anthropic API provider implementation.

use std::time::Instant;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use eduquest_core::traits::{
    feedback_prompt, FeedbackGenerator, FeedbackRequest, FeedbackResponse,
};

use crate::error::FeedbackError;

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const DEFAULT_MODEL: &str = "claude-haiku-4-5-20251001";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const SYSTEM_PROMPT: &str = "You are a supportive teaching assistant. Reply with a single short, \
motivating feedback message in Bahasa Indonesia. No preamble, no formatting.";

/// Anthropic API provider.
pub struct AnthropicProvider {
    api_key: String,
    base_url: String,
    model: String,
    client: reqwest::Client,
}

impl AnthropicProvider {
    pub fn new(api_key: &str, base_url: Option<String>, model: Option<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .expect("failed to build HTTP client");

        Self {
            api_key: api_key.to_string(),
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            client,
        }
    }
}

#[derive(Serialize)]
struct AnthropicRequest {
    model: String,
    max_tokens: u32,
    temperature: f64,
    system: String,
    messages: Vec<AnthropicMessage>,
}

#[derive(Serialize)]
struct AnthropicMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct AnthropicResponse {
    content: Vec<AnthropicContent>,
    model: String,
}

#[derive(Deserialize)]
struct AnthropicContent {
    text: String,
}

#[derive(Deserialize)]
struct AnthropicError {
    error: AnthropicErrorBody,
}

#[derive(Deserialize)]
struct AnthropicErrorBody {
    message: String,
}

#[async_trait]
impl FeedbackGenerator for AnthropicProvider {
    fn name(&self) -> &str {
        "anthropic"
    }

    #[instrument(skip(self, request), fields(score = request.score))]
    async fn generate(&self, request: &FeedbackRequest) -> anyhow::Result<FeedbackResponse> {
        let start = Instant::now();

        let body = AnthropicRequest {
            model: self.model.clone(),
            max_tokens: 200,
            temperature: 0.7,
            system: SYSTEM_PROMPT.to_string(),
            messages: vec![AnthropicMessage {
                role: "user".to_string(),
                content: feedback_prompt(request),
            }],
        };

        let response = self
            .client
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    FeedbackError::Timeout(DEFAULT_TIMEOUT_SECS)
                } else {
                    FeedbackError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status().as_u16();
        if status == 429 {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(5)
                * 1000;
            return Err(FeedbackError::RateLimited {
                retry_after_ms: retry_after,
            }
            .into());
        }
        if status == 401 {
            let body = response.text().await.unwrap_or_default();
            return Err(FeedbackError::AuthenticationFailed(body).into());
        }
        if status == 404 {
            return Err(FeedbackError::ModelNotFound(self.model.clone()).into());
        }
        if status >= 400 {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<AnthropicError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(FeedbackError::ApiError { status, message }.into());
        }

        let api_response: AnthropicResponse =
            response
                .json()
                .await
                .map_err(|e| FeedbackError::MalformedResponse(e.to_string()))?;

        let latency_ms = start.elapsed().as_millis() as u64;
        let text = api_response
            .content
            .first()
            .map(|c| c.text.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| FeedbackError::MalformedResponse("empty content".into()))?;

        Ok(FeedbackResponse {
            text,
            model: api_response.model,
            latency_ms,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eduquest_core::traits::EXAM_TITLE;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request() -> FeedbackRequest {
        FeedbackRequest::new(60, 100, EXAM_TITLE)
    }

    #[tokio::test]
    async fn successful_generation() {
        let server = MockServer::start().await;

        let response_body = serde_json::json!({
            "content": [{"type": "text", "text": "Hasil yang baik, terus berlatih!"}],
            "model": "claude-haiku-4-5-20251001"
        });

        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .and(header("x-api-key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&response_body))
            .mount(&server)
            .await;

        let provider = AnthropicProvider::new("test-key", Some(server.uri()), None);
        let response = provider.generate(&request()).await.unwrap();
        assert_eq!(response.text, "Hasil yang baik, terus berlatih!");
        assert_eq!(response.model, "claude-haiku-4-5-20251001");
    }

    #[tokio::test]
    async fn authentication_failure() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .respond_with(ResponseTemplate::new(401).set_body_string("unauthorized"))
            .mount(&server)
            .await;

        let provider = AnthropicProvider::new("bad-key", Some(server.uri()), None);
        let err = provider.generate(&request()).await.unwrap_err();
        assert!(err.to_string().contains("authentication"));
    }

    #[tokio::test]
    async fn empty_content_is_malformed() {
        let server = MockServer::start().await;

        let response_body = serde_json::json!({
            "content": [],
            "model": "claude-haiku-4-5-20251001"
        });
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&response_body))
            .mount(&server)
            .await;

        let provider = AnthropicProvider::new("test-key", Some(server.uri()), None);
        let err = provider.generate(&request()).await.unwrap_err();
        assert!(err.to_string().contains("malformed"));
    }
}
