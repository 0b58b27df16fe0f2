//! Chat-completions client for competitor analysis
//!
//! One request per call, no retries. Transport, auth and rate-limit failures
//! surface as `MonitorError::ModelCall`; the caller decides what to do with
//! them.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::Serialize;
use serde_json::{Value, json};
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::prompt::{image_prompt, system_prompt, text_prompt};
use super::schema::AnalysisRecord;
use super::validator::validate;
use crate::config::AnalysisConfig;
use crate::error::{MonitorError, MonitorResult};
use crate::utils::{TRUNCATION_MARKER, char_len, safe_truncate_chars, truncate_with_marker};

/// Characters of an error body kept in a `ModelCall` message
const MAX_ERROR_BODY_CHARS: usize = 500;

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: Value,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

/// MIME type for an image file, PNG when the extension is unknown
#[must_use]
pub fn mime_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "image/png",
    }
}

/// Pull `choices[0].message.content` out of a completion body
fn assistant_content(body: &Value) -> Option<&str> {
    body.get("choices")?
        .get(0)?
        .get("message")?
        .get("content")?
        .as_str()
}

#[derive(Debug, Clone)]
pub struct AnalysisClient {
    http: reqwest::Client,
    config: AnalysisConfig,
    system_prompt: String,
}

impl AnalysisClient {
    /// Build a client for `config`
    ///
    /// # Errors
    ///
    /// `MonitorError::Config` when the API key is blank or the HTTP client
    /// cannot be constructed.
    pub fn new(config: AnalysisConfig) -> MonitorResult<Self> {
        if config.api_key.trim().is_empty() {
            return Err(MonitorError::Config(
                "analysis API key is not set".to_string(),
            ));
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| MonitorError::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            config,
            system_prompt: system_prompt(),
        })
    }

    #[must_use]
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.api_base_url.trim_end_matches('/')
        )
    }

    /// Send normalized page text and return the raw model output
    ///
    /// Input longer than `max_text_chars` is cut and marked as truncated.
    pub async fn complete_text(&self, text: &str, competitor_name: &str) -> MonitorResult<String> {
        let original_chars = char_len(text);
        let text = truncate_with_marker(text, self.config.max_text_chars, TRUNCATION_MARKER);
        if original_chars > self.config.max_text_chars {
            tracing::debug!(
                competitor = competitor_name,
                "Analysis text truncated from {} to {} characters",
                original_chars,
                self.config.max_text_chars
            );
        }

        let user = ChatMessage {
            role: "user",
            content: Value::String(text_prompt(&text, competitor_name)),
        };
        self.complete(&self.config.text_model, user, competitor_name)
            .await
    }

    /// Send the image at `path` and return the raw model output
    ///
    /// # Errors
    ///
    /// `MonitorError::ImageNotFound` for an empty path, a missing file or an
    /// empty file, before any request is made.
    pub async fn complete_image(
        &self,
        path: &Path,
        competitor_name: &str,
    ) -> MonitorResult<String> {
        if path.as_os_str().is_empty() {
            return Err(MonitorError::ImageNotFound(path.to_path_buf()));
        }

        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(MonitorError::ImageNotFound(path.to_path_buf()));
            }
            Err(e) => return Err(e.into()),
        };
        if bytes.is_empty() {
            return Err(MonitorError::ImageNotFound(path.to_path_buf()));
        }

        self.complete_image_bytes(&bytes, mime_type_for(path), competitor_name)
            .await
    }

    /// Send in-memory image bytes of type `mime` and return the raw model output
    ///
    /// # Errors
    ///
    /// `MonitorError::ImageNotFound` (with an empty path) when `bytes` is empty.
    pub async fn complete_image_bytes(
        &self,
        bytes: &[u8],
        mime: &str,
        competitor_name: &str,
    ) -> MonitorResult<String> {
        if bytes.is_empty() {
            return Err(MonitorError::ImageNotFound(PathBuf::new()));
        }

        let data_url = format!("data:{mime};base64,{}", BASE64.encode(bytes));
        let user = ChatMessage {
            role: "user",
            content: json!([
                { "type": "text", "text": image_prompt(competitor_name) },
                { "type": "image_url", "image_url": { "url": data_url, "detail": "high" } }
            ]),
        };
        self.complete(&self.config.vision_model, user, competitor_name)
            .await
    }

    /// Text-mode analysis, validated into a record
    pub async fn analyze_text(
        &self,
        text: &str,
        competitor_name: &str,
    ) -> MonitorResult<AnalysisRecord> {
        let raw = self.complete_text(text, competitor_name).await?;
        Ok(validate(&raw, competitor_name))
    }

    /// Image-mode analysis, validated into a record
    pub async fn analyze_image(
        &self,
        path: &Path,
        competitor_name: &str,
    ) -> MonitorResult<AnalysisRecord> {
        let raw = self.complete_image(path, competitor_name).await?;
        Ok(validate(&raw, competitor_name))
    }

    async fn complete(
        &self,
        model: &str,
        user: ChatMessage,
        competitor_name: &str,
    ) -> MonitorResult<String> {
        let request = ChatRequest {
            model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: Value::String(self.system_prompt.clone()),
                },
                user,
            ],
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        tracing::info!(competitor = competitor_name, model, "Requesting analysis");

        let response = self
            .http
            .post(self.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MonitorError::ModelCall(format!(
                "API error {status}: {}",
                safe_truncate_chars(body.trim(), MAX_ERROR_BODY_CHARS)
            )));
        }

        let body: Value = response.json().await?;
        let content = assistant_content(&body).ok_or_else(|| {
            MonitorError::ModelCall("response has no choices[0].message.content".to_string())
        })?;

        tracing::debug!(
            competitor = competitor_name,
            "Model reply received ({} characters)",
            char_len(content)
        );
        Ok(content.to_string())
    }
}
