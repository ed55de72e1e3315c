//! Mock chat backend for deterministic testing.
//!
//! Records every call so tests can assert on the exact prompt and options a
//! component produced, and supports failure injection for error paths.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use quire_core::{ChatBackend, CompletionOptions, Error, ModelInfo, Result};

/// A recorded `complete` invocation.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub system: String,
    pub user: String,
    pub options: CompletionOptions,
}

#[derive(Debug)]
struct MockConfig {
    default_response: String,
    default_model: String,
    models: Vec<ModelInfo>,
    complete_failure: Option<String>,
    list_models_failure: Option<String>,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            default_response: "Mock summary".to_string(),
            default_model: "mock-model".to_string(),
            models: vec![ModelInfo {
                id: "mock-model".to_string(),
                owned_by: Some("mock".to_string()),
            }],
            complete_failure: None,
            list_models_failure: None,
        }
    }
}

/// Mock chat backend.
#[derive(Clone)]
pub struct MockChatBackend {
    config: Arc<MockConfig>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl MockChatBackend {
    /// Create a new mock backend with default configuration.
    pub fn new() -> Self {
        Self {
            config: Arc::new(MockConfig::default()),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn config_mut(&mut self) -> &mut MockConfig {
        Arc::get_mut(&mut self.config).expect("Configure the mock before cloning it")
    }

    /// Set the fixed response returned by `complete`.
    pub fn with_fixed_response(mut self, response: impl Into<String>) -> Self {
        self.config_mut().default_response = response.into();
        self
    }

    /// Set the advertised model listing.
    pub fn with_models(mut self, models: Vec<ModelInfo>) -> Self {
        self.config_mut().models = models;
        self
    }

    /// Make every `complete` call fail with the given message.
    pub fn with_failure(mut self, message: impl Into<String>) -> Self {
        self.config_mut().complete_failure = Some(message.into());
        self
    }

    /// Make `list_models` fail with the given message.
    pub fn with_model_listing_failure(mut self, message: impl Into<String>) -> Self {
        self.config_mut().list_models_failure = Some(message.into());
        self
    }

    /// All recorded `complete` calls.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl Default for MockChatBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatBackend for MockChatBackend {
    async fn complete(
        &self,
        system: &str,
        user: &str,
        options: &CompletionOptions,
    ) -> Result<String> {
        self.calls.lock().unwrap().push(RecordedCall {
            system: system.to_string(),
            user: user.to_string(),
            options: options.clone(),
        });

        if let Some(ref msg) = self.config.complete_failure {
            return Err(Error::Inference(msg.clone()));
        }

        Ok(self.config.default_response.clone())
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        if let Some(ref msg) = self.config.list_models_failure {
            return Err(Error::Inference(msg.clone()));
        }
        Ok(self.config.models.clone())
    }

    fn default_model(&self) -> &str {
        &self.config.default_model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_records_calls() {
        let backend = MockChatBackend::new().with_fixed_response("ok");
        let out = backend
            .complete("sys", "user", &CompletionOptions::default())
            .await
            .unwrap();
        assert_eq!(out, "ok");

        let calls = backend.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].system, "sys");
        assert_eq!(calls[0].user, "user");
    }

    #[tokio::test]
    async fn test_mock_failure_injection() {
        let backend = MockChatBackend::new().with_failure("boom");
        let err = backend
            .complete("", "x", &CompletionOptions::default())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("boom"));
        // The failed call is still recorded.
        assert_eq!(backend.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_mock_model_listing() {
        let backend = MockChatBackend::new();
        let models = backend.list_models().await.unwrap();
        assert_eq!(models.len(), 1);
        assert_eq!(models[0].id, "mock-model");

        let failing = MockChatBackend::new().with_model_listing_failure("offline");
        assert!(failing.list_models().await.is_err());
    }
}
