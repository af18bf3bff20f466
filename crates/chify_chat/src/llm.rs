//! Text-generation collaborator.
//!
//! The session only sees the [`TextGenerator`] trait. [`GeminiAdapter`] is
//! the production implementation, talking to the Gemini REST API.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{ChatError, ChatResult};
use crate::persona::Persona;

/// Default Gemini model
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

/// Default REST endpoint prefix
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Environment variables checked for the API key, in order
pub const DEFAULT_CREDENTIAL_VARS: [&str; 2] = ["API_KEY", "GEMINI_API_KEY"];

const MAX_ATTEMPTS: u32 = 3;

/// First retry waits twice this, the second four times
const DEFAULT_BACKOFF: Duration = Duration::from_secs(1);

/// Turns a prompt into assistant reply text
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate a reply for a single, stateless prompt
    async fn generate(&self, prompt: &str) -> ChatResult<String>;
}

/// Connection settings for the Gemini API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeminiConfig {
    pub model: String,
    pub base_url: String,
    pub timeout_secs: u64,
    pub credential_vars: Vec<String>,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
            credential_vars: DEFAULT_CREDENTIAL_VARS.iter().map(|v| v.to_string()).collect(),
        }
    }
}

/// Gemini `generateContent` client
pub struct GeminiAdapter {
    config: GeminiConfig,
    persona: Persona,
    client: reqwest::Client,
    backoff: Duration,
}

impl GeminiAdapter {
    /// Create an adapter. The credential is not read until a request is made.
    pub fn new(config: GeminiConfig, persona: Persona) -> ChatResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            config,
            persona,
            client,
            backoff: DEFAULT_BACKOFF,
        })
    }

    /// Set the base retry delay
    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    /// Get the configured model
    pub fn model(&self) -> &str {
        &self.config.model
    }

    pub fn persona(&self) -> &Persona {
        &self.persona
    }

    /// Read the API key from the environment. Called once per request so a
    /// key added after startup is picked up.
    fn credential(&self) -> ChatResult<String> {
        self.config
            .credential_vars
            .iter()
            .filter_map(|var| std::env::var(var).ok())
            .find(|key| !key.trim().is_empty())
            .ok_or_else(|| ChatError::MissingCredential(self.config.credential_vars.clone()))
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    /// Build the request body for a prompt
    pub fn build_request(&self, prompt: &str) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part { text: prompt.to_string() }],
            }],
            system_instruction: Some(Content {
                role: None,
                parts: vec![Part { text: self.persona.system_instruction.clone() }],
            }),
            generation_config: GenerationConfig {
                temperature: self.persona.temperature,
            },
        }
    }

    async fn send_once(&self, api_key: &str, body: &GenerateContentRequest) -> ChatResult<String> {
        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ChatError::Upstream { status: status.as_u16(), body });
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ChatError::Decode(e.to_string()))?;

        extract_text(parsed)
    }
}

#[async_trait]
impl TextGenerator for GeminiAdapter {
    async fn generate(&self, prompt: &str) -> ChatResult<String> {
        let api_key = self.credential()?;
        let body = self.build_request(prompt);

        // Retry transient failures (network, 429, 5xx)
        let mut last_error = None;
        for attempt in 0..MAX_ATTEMPTS {
            if attempt > 0 {
                // Exponential backoff: 2x, 4x
                tokio::time::sleep(self.backoff * (1 << attempt)).await;
            }

            match self.send_once(&api_key, &body).await {
                Ok(text) => {
                    debug!(model = %self.config.model, attempt = attempt + 1, "Generation succeeded");
                    return Ok(text);
                }
                Err(e) if e.is_retryable() => {
                    warn!("Generation attempt {}/{} failed: {}", attempt + 1, MAX_ATTEMPTS, e);
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or_else(|| ChatError::Network("Max retries exceeded".to_string())))
    }
}

/// Pull the reply text out of the first candidate
fn extract_text(response: GenerateContentResponse) -> ChatResult<String> {
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(ChatError::EmptyResponse);
    }
    Ok(text)
}

// Gemini API types
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
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
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    const RETRY_KEY_VAR: &str = "CHIFY_TEST_RETRY_KEY";
    const REPLY_BODY: &str =
        r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"Try icing the knee"}]}}]}"#;

    fn adapter_with_vars(vars: &[&str]) -> GeminiAdapter {
        let config = GeminiConfig {
            credential_vars: vars.iter().map(|v| v.to_string()).collect(),
            ..GeminiConfig::default()
        };
        GeminiAdapter::new(config, Persona::default()).unwrap()
    }

    #[test]
    fn test_default_config() {
        let config = GeminiConfig::default();
        assert_eq!(config.model, "gemini-3-flash-preview");
        assert_eq!(config.credential_vars, vec!["API_KEY", "GEMINI_API_KEY"]);
    }

    #[test]
    fn test_request_body_shape() {
        let adapter = adapter_with_vars(&["CHIFY_TEST_UNUSED_KEY"]);
        let body = serde_json::to_value(adapter.build_request("My knee hurts")).unwrap();

        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "My knee hurts");
        assert!(body["systemInstruction"]["parts"][0]["text"]
            .as_str()
            .unwrap()
            .contains("rehabilitation assistant"));
        assert!(body["systemInstruction"].get("role").is_none());
        let temperature = body["generationConfig"]["temperature"].as_f64().unwrap();
        assert!((temperature - 0.7).abs() < 1e-6);
    }

    #[test]
    fn test_endpoint_includes_model() {
        let adapter = adapter_with_vars(&["CHIFY_TEST_UNUSED_KEY"]);
        assert_eq!(
            adapter.endpoint(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-3-flash-preview:generateContent"
        );
    }

    #[tokio::test]
    async fn test_missing_credential_fails_the_call() {
        let adapter = adapter_with_vars(&["CHIFY_TEST_ABSENT_KEY_1", "CHIFY_TEST_ABSENT_KEY_2"]);
        let err = adapter.generate("hello").await.unwrap_err();
        assert!(matches!(err, ChatError::MissingCredential(ref vars) if vars.len() == 2));
    }

    #[test]
    fn test_credential_read_at_call_time() {
        let adapter = adapter_with_vars(&["CHIFY_TEST_LATE_KEY"]);
        assert!(adapter.credential().is_err());

        std::env::set_var("CHIFY_TEST_LATE_KEY", "secret");
        assert_eq!(adapter.credential().unwrap(), "secret");
        std::env::remove_var("CHIFY_TEST_LATE_KEY");
    }

    #[test]
    fn test_blank_credential_is_missing() {
        std::env::set_var("CHIFY_TEST_BLANK_KEY", "  ");
        let adapter = adapter_with_vars(&["CHIFY_TEST_BLANK_KEY"]);
        assert!(adapter.credential().is_err());
        std::env::remove_var("CHIFY_TEST_BLANK_KEY");
    }

    #[test]
    fn test_extract_text_joins_parts() {
        let response: GenerateContentResponse = serde_json::from_value(serde_json::json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": "Try icing " }, { "text": "the knee" }] }
            }]
        }))
        .unwrap();
        assert_eq!(extract_text(response).unwrap(), "Try icing the knee");
    }

    #[test]
    fn test_extract_text_empty_is_error() {
        let response: GenerateContentResponse =
            serde_json::from_value(serde_json::json!({ "candidates": [] })).unwrap();
        assert!(matches!(extract_text(response), Err(ChatError::EmptyResponse)));

        let blocked: GenerateContentResponse =
            serde_json::from_value(serde_json::json!({ "promptFeedback": { "blockReason": "SAFETY" } }))
                .unwrap();
        assert!(matches!(extract_text(blocked), Err(ChatError::EmptyResponse)));
    }

    /// Local HTTP server answering one scripted `(status, body)` per
    /// connection. Returns the base URL and a request counter.
    async fn scripted_server(responses: Vec<(u16, &'static str)>) -> (String, Arc<AtomicUsize>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);

        tokio::spawn(async move {
            let mut responses = responses.into_iter();
            while let Ok((mut stream, _)) = listener.accept().await {
                read_request(&mut stream).await;
                counter.fetch_add(1, Ordering::SeqCst);
                let (status, body) = responses.next().unwrap_or((500, "{}"));
                let response = format!(
                    "HTTP/1.1 {} Scripted\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                let _ = stream.write_all(response.as_bytes()).await;
                let _ = stream.shutdown().await;
            }
        });

        (base_url, hits)
    }

    async fn read_request(stream: &mut TcpStream) {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = stream.read(&mut chunk).await.unwrap_or(0);
            if n == 0 {
                return;
            }
            buf.extend_from_slice(&chunk[..n]);
            if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                let head = String::from_utf8_lossy(&buf[..end]).to_lowercase();
                let length = head
                    .lines()
                    .find_map(|line| line.strip_prefix("content-length:"))
                    .and_then(|v| v.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if buf.len() >= end + 4 + length {
                    return;
                }
            }
        }
    }

    fn local_adapter(base_url: String) -> GeminiAdapter {
        std::env::set_var(RETRY_KEY_VAR, "test-key");
        let config = GeminiConfig {
            base_url,
            timeout_secs: 5,
            credential_vars: vec![RETRY_KEY_VAR.to_string()],
            ..GeminiConfig::default()
        };
        let mut adapter = GeminiAdapter::new(config, Persona::default())
            .unwrap()
            .with_backoff(Duration::from_millis(1));
        adapter.client = reqwest::Client::builder()
            .no_proxy()
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap();
        adapter
    }

    #[tokio::test]
    async fn test_server_errors_retried_until_success() {
        let (base_url, hits) = scripted_server(vec![(503, "{}"), (503, "{}"), (200, REPLY_BODY)]).await;
        let adapter = local_adapter(base_url);

        assert_eq!(adapter.generate("My knee hurts").await.unwrap(), "Try icing the knee");
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_rate_limit_is_retried() {
        let (base_url, hits) = scripted_server(vec![(429, "{}"), (200, REPLY_BODY)]).await;
        let adapter = local_adapter(base_url);

        assert!(adapter.generate("Hello").await.is_ok());
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_gives_up_after_three_attempts() {
        let (base_url, hits) =
            scripted_server(vec![(503, "{}"), (502, "{}"), (503, "busy")]).await;
        let adapter = local_adapter(base_url);

        let err = adapter.generate("Hello").await.unwrap_err();
        assert!(matches!(err, ChatError::Upstream { status: 503, ref body } if body == "busy"));
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_client_error_fails_without_retry() {
        let (base_url, hits) =
            scripted_server(vec![(400, r#"{"error":"bad request"}"#), (200, REPLY_BODY)]).await;
        let adapter = local_adapter(base_url);

        let err = adapter.generate("Hello").await.unwrap_err();
        assert!(matches!(err, ChatError::Upstream { status: 400, .. }));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_reply_without_text_is_empty_response() {
        let (base_url, hits) = scripted_server(vec![(200, r#"{"candidates":[]}"#)]).await;
        let adapter = local_adapter(base_url);

        assert!(matches!(adapter.generate("Hello").await, Err(ChatError::EmptyResponse)));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}
