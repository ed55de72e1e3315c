//! Summarizer: shapes a summarize request into a single backend call.

use std::sync::Arc;

use tracing::debug;

use quire_core::{
    build_prompt, defaults, ChatBackend, CompletionOptions, Result, SummarizeRequest,
};

/// Builds the prompt from the request parameters and forwards it to the
/// completion backend. The length enum travels as a `max_tokens` hint and
/// the tone enum as a system-directive instruction; see
/// [`quire_core::prompt`].
pub struct Summarizer {
    backend: Arc<dyn ChatBackend>,
}

impl Summarizer {
    /// Create a summarizer over the given backend.
    pub fn new(backend: Arc<dyn ChatBackend>) -> Self {
        Self { backend }
    }

    /// The backend this summarizer forwards to.
    pub fn backend(&self) -> &Arc<dyn ChatBackend> {
        &self.backend
    }

    /// Generate a summary of `req.text`.
    ///
    /// Empty text yields an empty summary without a provider call; the API
    /// layer rejects empty text before it gets here.
    pub async fn summarize(&self, req: &SummarizeRequest) -> Result<String> {
        if req.text.is_empty() {
            return Ok(String::new());
        }

        let length = req.length.unwrap_or_default();
        let tone = req.tone.unwrap_or_default();
        let prompt = build_prompt(&req.text, tone);

        let options = CompletionOptions {
            model: req.model.clone(),
            max_tokens: Some(length.max_tokens()),
            temperature: Some(defaults::GEN_TEMPERATURE),
        };

        debug!(
            model = options.model.as_deref().unwrap_or(self.backend.default_model()),
            max_tokens = length.max_tokens(),
            prompt_len = prompt.user.len(),
            "Dispatching summary generation"
        );

        let summary = self
            .backend
            .complete(&prompt.system, &prompt.user, &options)
            .await?;

        Ok(summary.trim().to_string())
    }
}
