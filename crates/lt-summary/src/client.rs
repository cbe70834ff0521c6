//! Chat API client for the narrative summary.
//!
//! Two wire shapes are supported: OpenAI chat completions
//! (`POST {base}/v1/chat/completions`, bearer auth) and the Anthropic messages
//! API (`POST {base}/v1/messages`, `x-api-key`). Any failure is logged and
//! turned into `None` by [`SummaryClient::summarize`].

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Utc;
use lt_core::AnalysisResult;
use serde::{Deserialize, Serialize};

use crate::config::{Provider, SummaryConfig};
use crate::error::{SummaryError, SummaryResult};
use crate::prompt;

pub const FILE_NAME: &str = "summary.md";

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Error bodies are cut to this many characters before logging.
const MAX_ERROR_BODY: usize = 300;

// ── Wire types ──────────────────────────────────────────────────

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct OpenAiRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct OpenAiResponse {
    #[serde(default)]
    choices: Vec<OpenAiChoice>,
}

#[derive(Deserialize)]
struct OpenAiChoice {
    message: OpenAiMessage,
}

#[derive(Deserialize)]
struct OpenAiMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    system: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct AnthropicResponse {
    #[serde(default)]
    content: Vec<AnthropicBlock>,
}

#[derive(Deserialize)]
struct AnthropicBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

// ── Client ──────────────────────────────────────────────────────

/// Client for one configured provider.
pub struct SummaryClient {
    client: reqwest::Client,
    provider: Provider,
    api_key: String,
    model: String,
    base_url: String,
    max_tokens: u32,
    language: String,
}

impl SummaryClient {
    /// Build a client from `config`.
    ///
    /// Returns `Ok(None)` when provider or key is missing; an unsupported
    /// provider is an error.
    pub fn from_config(config: &SummaryConfig) -> SummaryResult<Option<Self>> {
        if !config.is_configured() {
            tracing::info!("AI summary not configured, skipping");
            return Ok(None);
        }
        let provider: Provider = config.provider.as_deref().unwrap_or_default().parse()?;
        let api_key = config.api_key.clone().unwrap_or_default();

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Some(Self {
            client,
            provider,
            api_key,
            model: config
                .model
                .clone()
                .unwrap_or_else(|| provider.default_model().to_string()),
            base_url: config
                .base_url
                .as_deref()
                .unwrap_or(provider.default_base_url())
                .trim_end_matches('/')
                .to_string(),
            max_tokens: config.max_tokens,
            language: config.language.clone(),
        }))
    }

    pub fn provider(&self) -> Provider {
        self.provider
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Ask the provider for a narrative summary of `result`.
    ///
    /// Returns `None` on network errors, timeouts, non-2xx statuses or
    /// malformed bodies.
    pub async fn summarize(&self, result: &AnalysisResult) -> Option<String> {
        match self.request(result).await {
            Ok(text) => {
                tracing::info!(
                    provider = ?self.provider,
                    model = %self.model,
                    chars = text.len(),
                    "AI summary received"
                );
                Some(text)
            }
            Err(e) => {
                tracing::warn!(provider = ?self.provider, error = %e, "AI summary failed");
                None
            }
        }
    }

    async fn request(&self, result: &AnalysisResult) -> SummaryResult<String> {
        let user_prompt = prompt::build(result, &self.language);

        let response = match self.provider {
            Provider::OpenAi => {
                let body = OpenAiRequest {
                    model: &self.model,
                    messages: vec![
                        ChatMessage {
                            role: "system",
                            content: prompt::SYSTEM_PROMPT,
                        },
                        ChatMessage {
                            role: "user",
                            content: &user_prompt,
                        },
                    ],
                    max_tokens: self.max_tokens,
                };
                self.client
                    .post(format!("{}/v1/chat/completions", self.base_url))
                    .bearer_auth(&self.api_key)
                    .json(&body)
                    .send()
                    .await?
            }
            Provider::Anthropic => {
                let body = AnthropicRequest {
                    model: &self.model,
                    system: prompt::SYSTEM_PROMPT,
                    messages: vec![ChatMessage {
                        role: "user",
                        content: &user_prompt,
                    }],
                    max_tokens: self.max_tokens,
                };
                self.client
                    .post(format!("{}/v1/messages", self.base_url))
                    .header("x-api-key", &self.api_key)
                    .header("anthropic-version", ANTHROPIC_VERSION)
                    .json(&body)
                    .send()
                    .await?
            }
        };

        let status = response.status();
        if !status.is_success() {
            let body: String = response
                .text()
                .await
                .unwrap_or_default()
                .chars()
                .take(MAX_ERROR_BODY)
                .collect();
            return Err(SummaryError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let text = match self.provider {
            Provider::OpenAi => {
                let parsed: OpenAiResponse = response.json().await?;
                parsed
                    .choices
                    .into_iter()
                    .find_map(|c| c.message.content)
                    .unwrap_or_default()
            }
            Provider::Anthropic => {
                let parsed: AnthropicResponse = response.json().await?;
                parsed
                    .content
                    .into_iter()
                    .filter(|b| b.kind == "text")
                    .filter_map(|b| b.text)
                    .collect::<Vec<_>>()
                    .join("\n")
            }
        };

        let text = text.trim();
        if text.is_empty() {
            return Err(SummaryError::EmptyResponse);
        }
        Ok(text.to_string())
    }
}

/// Write `text` as `summary.md` under `dir` with a short header.
pub async fn write_summary(dir: &Path, text: &str) -> SummaryResult<PathBuf> {
    let path = dir.join(FILE_NAME);
    let doc = format!(
        "# Log Analysis Summary\n\n_Generated {}_\n\n{}\n",
        Utc::now().format("%Y-%m-%d %H:%M:%S UTC"),
        text.trim_end()
    );
    tokio::fs::write(&path, doc).await?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use lt_core::{MockLogSource, RunOptions};
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn sample_result() -> AnalysisResult {
        let reference = Utc.with_ymd_and_hms(2026, 10, 16, 0, 0, 0).unwrap();
        let config = RunOptions::default().resolve_at(reference).unwrap();
        lt_core::run(config, &MockLogSource::with_all_samples(), &["/var/log/auth.log"])
    }

    fn config_for(server: &MockServer, provider: &str) -> SummaryConfig {
        SummaryConfig {
            provider: Some(provider.into()),
            api_key: Some("test-key".into()),
            model: Some("test-model".into()),
            base_url: Some(server.uri()),
            timeout_secs: 2,
            ..Default::default()
        }
    }

    fn client_for(server: &MockServer, provider: &str) -> SummaryClient {
        SummaryClient::from_config(&config_for(server, provider))
            .unwrap()
            .expect("client should be configured")
    }

    fn openai_body(content: &str) -> serde_json::Value {
        serde_json::json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "choices": [{
                "index": 0,
                "message": { "role": "assistant", "content": content },
                "finish_reason": "stop"
            }]
        })
    }

    #[tokio::test]
    async fn openai_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer test-key"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(openai_body("All systems nominal.")),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, "openai");
        let text = client.summarize(&sample_result()).await;
        assert_eq!(text.as_deref(), Some("All systems nominal."));
    }

    #[tokio::test]
    async fn anthropic_success() {
        let server = MockServer::start().await;
        let body = serde_json::json!({
            "id": "msg_1",
            "type": "message",
            "role": "assistant",
            "content": [
                { "type": "text", "text": "Brute force from 203.0.113.9." }
            ],
            "stop_reason": "end_turn"
        });
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .and(header("x-api-key", "test-key"))
            .and(header("anthropic-version", ANTHROPIC_VERSION))
            .respond_with(ResponseTemplate::new(200).set_body_json(&body))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, "anthropic");
        let text = client.summarize(&sample_result()).await;
        assert_eq!(text.as_deref(), Some("Brute force from 203.0.113.9."));
    }

    #[tokio::test]
    async fn unauthorized_returns_none() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
            .mount(&server)
            .await;

        let client = client_for(&server, "openai");
        let err = client.request(&sample_result()).await.unwrap_err();
        assert!(matches!(err, SummaryError::Status { status: 401, ref body } if body == "invalid api key"));
        assert!(client.summarize(&sample_result()).await.is_none());
    }

    #[tokio::test]
    async fn timeout_returns_none() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(10)))
            .mount(&server)
            .await;

        // Client timeout is 2s, mock delays 10s
        let client = client_for(&server, "anthropic");
        assert!(client.summarize(&sample_result()).await.is_none());
    }

    #[tokio::test]
    async fn malformed_body_returns_none() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json at all"))
            .mount(&server)
            .await;

        let client = client_for(&server, "openai");
        assert!(client.summarize(&sample_result()).await.is_none());
    }

    #[tokio::test]
    async fn empty_content_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(openai_body("   ")))
            .mount(&server)
            .await;

        let client = client_for(&server, "openai");
        let err = client.request(&sample_result()).await.unwrap_err();
        assert!(matches!(err, SummaryError::EmptyResponse));
    }

    #[test]
    fn missing_key_skips() {
        let config = SummaryConfig {
            provider: Some("openai".into()),
            ..Default::default()
        };
        assert!(SummaryClient::from_config(&config).unwrap().is_none());
        assert!(SummaryClient::from_config(&SummaryConfig::default()).unwrap().is_none());
    }

    #[test]
    fn unsupported_provider_is_an_error() {
        let config = SummaryConfig {
            provider: Some("gemini".into()),
            api_key: Some("k".into()),
            ..Default::default()
        };
        let err = SummaryClient::from_config(&config).err().unwrap();
        assert!(matches!(err, SummaryError::UnsupportedProvider(_)));
    }

    #[test]
    fn provider_defaults_fill_model_and_url() {
        let config = SummaryConfig {
            provider: Some("anthropic".into()),
            api_key: Some("k".into()),
            ..Default::default()
        };
        let client = SummaryClient::from_config(&config).unwrap().unwrap();
        assert_eq!(client.provider(), Provider::Anthropic);
        assert_eq!(client.model(), Provider::Anthropic.default_model());
        assert_eq!(client.base_url, "https://api.anthropic.com");
    }

    #[tokio::test]
    async fn summary_file_has_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_summary(dir.path(), "Everything is fine.\n\n").await.unwrap();
        assert_eq!(path.file_name().unwrap(), FILE_NAME);
        let text = std::fs::read_to_string(path).unwrap();
        assert!(text.starts_with("# Log Analysis Summary\n"));
        assert!(text.ends_with("Everything is fine.\n"));
    }
}
