//! Data models for notes, sessions, and summarization requests.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::defaults;

// =============================================================================
// NOTES
// =============================================================================

/// A note record as persisted in the store and sent over the wire.
///
/// A note is always owned by exactly one identity (`email`); every read and
/// write is scoped by that owner, never global. `uuid` is server-assigned and
/// immutable; `updated_at` advances on every successful mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    /// Server-assigned unique identifier.
    pub uuid: Uuid,
    /// Optional display title.
    pub title: Option<String>,
    /// Rich-text content as editor markup. Opaque to this system.
    pub notes: String,
    /// Owner identity the note is scoped to.
    pub email: String,
    /// Generated summary, if one has been saved.
    pub summary: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request body for creating a note.
///
/// The owner identity is taken from the session, never from the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateNoteRequest {
    /// Note content. Required; empty content is rejected.
    pub notes: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// Request body for updating a note.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateNoteRequest {
    /// Note content. Required; empty content is rejected.
    pub notes: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Accepted on the wire for compatibility with older clients but IGNORED:
    /// the owner identity is always forced from the session.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// When present, replaces the saved summary. Counts as a note update.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

/// Response body for a successful delete.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteNoteResponse {
    pub message: String,
}

// =============================================================================
// SESSIONS
// =============================================================================

/// An ephemeral bearer credential identifying an authenticated user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Bearer token presented on every authenticated request.
    pub access_token: String,
    /// Owner identity this session authenticates.
    pub email: String,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Whether the session has passed its expiry.
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }
}

// =============================================================================
// SUMMARIZATION
// =============================================================================

/// Bounded output-size hint for a generated summary.
///
/// The exact token mapping is a tunable, not a contract; the contract is the
/// ordering short ≤ medium ≤ detailed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryLength {
    Short,
    #[default]
    Medium,
    Detailed,
}

impl SummaryLength {
    /// Maximum output tokens requested from the completion provider.
    pub fn max_tokens(&self) -> u32 {
        match self {
            SummaryLength::Short => defaults::SUMMARY_TOKENS_SHORT,
            SummaryLength::Medium => defaults::SUMMARY_TOKENS_MEDIUM,
            SummaryLength::Detailed => defaults::SUMMARY_TOKENS_DETAILED,
        }
    }
}

/// Phrasing instruction appended to the system directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryTone {
    #[default]
    Neutral,
    Formal,
    Casual,
    Technical,
    Simple,
}

impl SummaryTone {
    /// Natural-language instruction for this tone.
    pub fn instruction(&self) -> &'static str {
        match self {
            SummaryTone::Neutral => "Use a balanced, neutral tone.",
            SummaryTone::Formal => "Use a formal, professional tone.",
            SummaryTone::Casual => "Use a relaxed, conversational tone.",
            SummaryTone::Technical => {
                "Use precise technical language and preserve domain terminology."
            }
            SummaryTone::Simple => {
                "Use plain language a general reader can follow, avoiding jargon."
            }
        }
    }
}

/// Request body for `POST /ai/summarize`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummarizeRequest {
    /// Raw note text to condense.
    pub text: String,
    /// Completion model identifier. Falls back to the backend default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<SummaryLength>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tone: Option<SummaryTone>,
}

/// Response body for `POST /ai/summarize`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummarizeResponse {
    pub summary: String,
}

// =============================================================================
// MODEL DISCOVERY
// =============================================================================

/// A completion model advertised by the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Free-text model identifier (e.g. "llama3-70b-8192").
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owned_by: Option<String>,
}

/// Provider model listing, OpenAI wire shape (`{"data": [...]}`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelList {
    pub data: Vec<ModelInfo>,
}
