//! Google Gemini backend over the `generateContent` REST endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::RETRY_AFTER;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::LlmError;
use crate::llm::provider::{CompletionRequest, CompletionResponse, LlmProvider};

const PROVIDER: &str = "gemini";
const API_VERSION: &str = "v1beta";
const API_KEY_HEADER: &str = "x-goog-api-key";

// ── Wire types ──────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
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
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
}

impl From<CompletionRequest> for GenerateContentRequest {
    fn from(request: CompletionRequest) -> Self {
        Self {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some(request.prompt),
                }],
            }],
        }
    }
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate.
    ///
    /// `None` when there is no candidate or it carries no text part. An
    /// empty string is a valid answer and is returned as `Some("")`.
    fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let mut texts = content.parts.iter().filter_map(|p| p.text.as_deref()).peekable();
        texts.peek()?;
        Some(texts.collect())
    }
}

// ── Provider ────────────────────────────────────────────────────────────

/// Gemini-backed `LlmProvider`.
///
/// Holds one `reqwest::Client` for the lifetime of the process.
pub struct GeminiProvider {
    http: reqwest::Client,
    api_key: SecretString,
    model: String,
    base_url: String,
}

impl GeminiProvider {
    pub fn new(
        api_key: SecretString,
        model: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LlmError::RequestFailed {
                provider: PROVIDER.to_string(),
                reason: format!("Failed to build HTTP client: {e}"),
            })?;

        let base_url: String = base_url.into();
        Ok(Self {
            http,
            api_key,
            model: model.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn generate_content_url(&self) -> String {
        format!(
            "{}/{API_VERSION}/models/{}:generateContent",
            self.base_url, self.model
        )
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let body = GenerateContentRequest::from(request);
        debug!(model = %self.model, "Sending generateContent request");

        let response = self
            .http
            .post(self.generate_content_url())
            .header(API_KEY_HEADER, self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::RequestFailed {
                provider: PROVIDER.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();

        if status.as_u16() == 429 {
            let retry_after = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok())
                .map(Duration::from_secs);
            return Err(LlmError::RateLimited {
                provider: PROVIDER.to_string(),
                retry_after,
            });
        }

        let raw = response.text().await.map_err(|e| LlmError::RequestFailed {
            provider: PROVIDER.to_string(),
            reason: format!("Failed to read response body: {e}"),
        })?;

        if !status.is_success() {
            return Err(api_error(status.as_u16(), &raw));
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&raw)?;
        let Some(content) = parsed.text() else {
            let reason = match parsed
                .prompt_feedback
                .as_ref()
                .and_then(|f| f.block_reason.as_deref())
            {
                Some(block) => format!("prompt blocked: {block}"),
                None => "response contained no text".to_string(),
            };
            return Err(LlmError::InvalidResponse {
                provider: PROVIDER.to_string(),
                reason,
            });
        };

        Ok(CompletionResponse { content })
    }
}

/// Turn a non-success response into `LlmError::Api`, decoding Google's
/// error envelope when present.
fn api_error(status: u16, body: &str) -> LlmError {
    let message = match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) if envelope.error.status.is_empty() => envelope.error.message,
        Ok(envelope) => format!("{}: {}", envelope.error.status, envelope.error.message),
        Err(_) => body.trim().to_string(),
    };
    LlmError::Api {
        provider: PROVIDER.to_string(),
        status,
        message,
    }
}

#[cfg(test)]
mod tests {
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{Value, json};
    use tokio::net::TcpListener;

    use super::*;

    #[test]
    fn prompt_becomes_single_user_turn() {
        let body = serde_json::to_value(GenerateContentRequest::from(CompletionRequest::new(
            "classify this",
        )))
        .unwrap();

        assert_eq!(
            body,
            json!({"contents": [{"role": "user", "parts": [{"text": "classify this"}]}]})
        );
    }

    #[test]
    fn response_text_joins_parts_of_first_candidate() {
        let parsed: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [
                {"content": {"role": "model", "parts": [{"text": "Produ"}, {"text": "tivo"}]}},
                {"content": {"role": "model", "parts": [{"text": "ignored"}]}}
            ]
        }))
        .unwrap();
        assert_eq!(parsed.text().as_deref(), Some("Produtivo"));
    }

    #[test]
    fn empty_text_part_is_still_an_answer() {
        let parsed: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{"content": {"parts": [{"text": ""}]}, "finishReason": "STOP"}]
        }))
        .unwrap();
        assert_eq!(parsed.text().as_deref(), Some(""));
    }

    #[test]
    fn missing_candidate_or_text_part_has_no_text() {
        let no_candidates: GenerateContentResponse =
            serde_json::from_value(json!({"candidates": []})).unwrap();
        let no_parts: GenerateContentResponse =
            serde_json::from_value(json!({"candidates": [{"content": {"parts": []}}]})).unwrap();
        let no_content: GenerateContentResponse =
            serde_json::from_value(json!({"candidates": [{"finishReason": "SAFETY"}]})).unwrap();

        assert_eq!(no_candidates.text(), None);
        assert_eq!(no_parts.text(), None);
        assert_eq!(no_content.text(), None);
    }

    #[test]
    fn api_error_decodes_google_envelope() {
        let body = r#"{"error": {"code": 400, "message": "API key not valid.", "status": "INVALID_ARGUMENT"}}"#;
        match api_error(400, body) {
            LlmError::Api {
                status, message, ..
            } => {
                assert_eq!(status, 400);
                assert_eq!(message, "INVALID_ARGUMENT: API key not valid.");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn api_error_falls_back_to_raw_body() {
        match api_error(502, "  Bad Gateway \n") {
            LlmError::Api { message, .. } => assert_eq!(message, "Bad Gateway"),
            other => panic!("unexpected error: {other}"),
        }
    }

    // ── Against a local stub server ─────────────────────────────────

    async fn serve(app: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn provider(base_url: String) -> GeminiProvider {
        GeminiProvider::new(
            SecretString::from("test-key"),
            "gemini-2.5-flash",
            base_url,
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn complete_sends_key_and_parses_text() {
        let app = Router::new().route(
            "/v1beta/models/{call}",
            post(|headers: HeaderMap, Json(body): Json<Value>| async move {
                assert_eq!(headers[API_KEY_HEADER], "test-key");
                assert_eq!(body["contents"][0]["parts"][0]["text"], "ping");
                Json(json!({
                    "candidates": [{
                        "content": {"role": "model", "parts": [{"text": " pong \n"}]},
                        "finishReason": "STOP"
                    }],
                    "usageMetadata": {"promptTokenCount": 3, "candidatesTokenCount": 1},
                    "responseId": "abc"
                }))
            }),
        );
        let llm = provider(serve(app).await);

        let response = llm.complete(CompletionRequest::new("ping")).await.unwrap();
        assert_eq!(response.content, " pong \n");
    }

    #[tokio::test]
    async fn empty_answer_is_passed_through() {
        let app = Router::new().route(
            "/v1beta/models/{call}",
            post(|| async {
                Json(json!({
                    "candidates": [{"content": {"parts": [{"text": ""}]}, "finishReason": "STOP"}]
                }))
            }),
        );
        let llm = provider(serve(app).await);

        let response = llm.complete(CompletionRequest::new("oi")).await.unwrap();
        assert_eq!(response.content, "");
    }

    #[tokio::test]
    async fn error_status_becomes_provider_error() {
        let app = Router::new().route(
            "/v1beta/models/{call}",
            post(|| async {
                (
                    StatusCode::FORBIDDEN,
                    Json(json!({"error": {"code": 403, "message": "denied", "status": "PERMISSION_DENIED"}})),
                )
            }),
        );
        let llm = provider(serve(app).await);

        let err = llm.complete(CompletionRequest::new("x")).await.unwrap_err();
        assert!(err.is_provider_error());
        assert!(matches!(err, LlmError::Api { status: 403, .. }));
    }

    #[tokio::test]
    async fn too_many_requests_is_rate_limited() {
        let app = Router::new().route(
            "/v1beta/models/{call}",
            post(|| async {
                (
                    StatusCode::TOO_MANY_REQUESTS,
                    [("retry-after", "7")],
                    "slow down",
                )
            }),
        );
        let llm = provider(serve(app).await);

        match llm.complete(CompletionRequest::new("x")).await.unwrap_err() {
            LlmError::RateLimited { retry_after, .. } => {
                assert_eq!(retry_after, Some(Duration::from_secs(7)));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn blocked_prompt_is_invalid_response() {
        let app = Router::new().route(
            "/v1beta/models/{call}",
            post(|| async { Json(json!({"promptFeedback": {"blockReason": "SAFETY"}})) }),
        );
        let llm = provider(serve(app).await);

        let err = llm.complete(CompletionRequest::new("x")).await.unwrap_err();
        assert!(!err.is_provider_error());
        match err {
            LlmError::InvalidResponse { reason, .. } => assert!(reason.contains("SAFETY")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn unreachable_host_is_request_failure() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let llm = provider(format!("http://{addr}"));
        let err = llm.complete(CompletionRequest::new("x")).await.unwrap_err();
        assert!(matches!(err, LlmError::RequestFailed { .. }));
    }
}
