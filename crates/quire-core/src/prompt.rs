//! Prompt construction for summary generation.
//!
//! Pure functions with exhaustively enumerated option tables so prompt
//! shaping is unit-testable without network access. The length hint is
//! carried out-of-band as `max_tokens` (see [`SummaryLength::max_tokens`]),
//! not interpolated into the text.
//!
//! [`SummaryLength::max_tokens`]: crate::models::SummaryLength::max_tokens

use crate::models::SummaryTone;

/// Base system directive for the summarization assistant.
pub const SYSTEM_DIRECTIVE: &str = "You are a helpful assistant that summarizes text content. \
     Provide concise but comprehensive summaries that capture the main points and key details.";

/// A fully shaped prompt ready to hand to a chat backend.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryPrompt {
    /// System message: base directive plus the tone instruction.
    pub system: String,
    /// User message carrying the raw note text.
    pub user: String,
}

/// Build the system and user messages for a summary request.
pub fn build_prompt(text: &str, tone: SummaryTone) -> SummaryPrompt {
    SummaryPrompt {
        system: format!("{} {}", SYSTEM_DIRECTIVE, tone.instruction()),
        user: format!("Please summarize the following text:\n\n{}", text),
    }
}
