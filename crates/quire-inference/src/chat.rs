//! OpenAI-compatible chat-completions backend.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use quire_core::{
    defaults, ChatBackend, CompletionOptions, Error, ModelInfo, ModelList, Result,
};

/// Default completions endpoint.
pub const DEFAULT_COMPLETIONS_URL: &str = defaults::COMPLETIONS_URL;

/// Default generation model.
pub const DEFAULT_GEN_MODEL: &str = defaults::GEN_MODEL;

/// Timeout for generation requests (seconds).
pub const GEN_TIMEOUT_SECS: u64 = defaults::GEN_TIMEOUT_SECS;

/// Elapsed time above which a completion logs a slow-operation warning (ms).
pub const SLOW_OP_THRESHOLD_MS: u64 = defaults::SLOW_OP_THRESHOLD_MS;

/// Chat-completions backend against any OpenAI-compatible provider.
pub struct ChatCompletionsBackend {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    default_model: String,
    timeout_secs: u64,
}

impl ChatCompletionsBackend {
    /// Create a new backend with the given base URL and default model.
    pub fn new(base_url: String, api_key: Option<String>, default_model: String) -> Result<Self> {
        let timeout_secs = std::env::var("COMPLETIONS_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(GEN_TIMEOUT_SECS);

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| Error::Inference(format!("Failed to create HTTP client: {}", e)))?;

        info!(
            "Initializing completions backend: url={}, model={}",
            base_url, default_model
        );

        Ok(Self {
            client,
            base_url,
            api_key,
            default_model,
            timeout_secs,
        })
    }

    /// Create from environment variables.
    ///
    /// Reads `COMPLETIONS_BASE_URL`, `COMPLETIONS_API_KEY`, and
    /// `COMPLETIONS_MODEL`, each with a sensible default.
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var("COMPLETIONS_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_COMPLETIONS_URL.to_string());
        let api_key = std::env::var("COMPLETIONS_API_KEY").ok();
        let model =
            std::env::var("COMPLETIONS_MODEL").unwrap_or_else(|_| DEFAULT_GEN_MODEL.to_string());

        Self::new(base_url, api_key, model)
    }

    /// Build a request with authentication if configured.
    fn build_request(&self, method: reqwest::Method, endpoint: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url.trim_end_matches('/'), endpoint);
        let mut req = self.client.request(method, &url);

        if let Some(ref api_key) = self.api_key {
            req = req.header("Authorization", format!("Bearer {}", api_key));
        }

        req
    }
}

/// A single chat message.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

/// Request body for the `/chat/completions` endpoint.
#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    stream: bool,
}

/// Response from the `/chat/completions` endpoint.
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

/// Single chat completion choice.
#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[async_trait]
impl ChatBackend for ChatCompletionsBackend {
    #[instrument(skip(self, system, user), fields(subsystem = "inference", component = "chat", op = "complete", prompt_len = user.len()))]
    async fn complete(
        &self,
        system: &str,
        user: &str,
        options: &CompletionOptions,
    ) -> Result<String> {
        let start = Instant::now();

        let mut messages = Vec::new();
        if !system.is_empty() {
            messages.push(ChatMessage {
                role: "system".to_string(),
                content: system.to_string(),
            });
        }
        messages.push(ChatMessage {
            role: "user".to_string(),
            content: user.to_string(),
        });

        let model = options
            .model
            .clone()
            .unwrap_or_else(|| self.default_model.clone());

        let request = ChatCompletionRequest {
            model,
            messages,
            temperature: options.temperature,
            max_tokens: options.max_tokens,
            stream: false,
        };

        let response = self
            .build_request(reqwest::Method::POST, "/chat/completions")
            .timeout(Duration::from_secs(self.timeout_secs))
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Inference(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Inference(format!(
                "Provider returned {}: {}",
                status, body
            )));
        }

        let result: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| Error::Inference(format!("Failed to parse response: {}", e)))?;

        let content = result
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .unwrap_or_default();

        let elapsed = start.elapsed().as_millis() as u64;
        debug!(
            response_len = content.len(),
            duration_ms = elapsed,
            "Completion finished"
        );
        if elapsed > SLOW_OP_THRESHOLD_MS {
            warn!(
                duration_ms = elapsed,
                prompt_len = user.len(),
                slow = true,
                "Slow completion operation"
            );
        }
        Ok(content)
    }

    #[instrument(skip(self), fields(subsystem = "inference", component = "chat", op = "list_models"))]
    async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        let response = self
            .build_request(reqwest::Method::GET, "/models")
            .send()
            .await
            .map_err(|e| Error::Inference(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Inference(format!(
                "Provider returned {}: {}",
                status, body
            )));
        }

        let result: ModelList = response
            .json()
            .await
            .map_err(|e| Error::Inference(format!("Failed to parse response: {}", e)))?;

        debug!(result_count = result.data.len(), "Model listing complete");
        Ok(result.data)
    }

    fn default_model(&self) -> &str {
        &self.default_model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slow_threshold_is_below_the_request_timeout() {
        // A request that outlives the timeout errors out instead of
        // logging slow; the warning must be able to fire before that.
        assert!(SLOW_OP_THRESHOLD_MS < GEN_TIMEOUT_SECS * 1000);
    }
}
