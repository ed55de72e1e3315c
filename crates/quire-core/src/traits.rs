//! Trait definitions for the store, session, and inference seams.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{CreateNoteRequest, ModelInfo, Note, Session, UpdateNoteRequest};

/// Persistence interface for notes.
///
/// Every operation is scoped by the owner identity; an id belonging to
/// another owner behaves exactly like an unknown id (empty result, never a
/// permission error).
#[async_trait]
pub trait NoteStore: Send + Sync {
    /// List all notes owned by `owner`. No filtering or pagination.
    async fn list(&self, owner: &str) -> Result<Vec<Note>>;

    /// Fetch a single note by id, owner-scoped. Returns `None` when the id is
    /// unknown or owned by someone else.
    async fn fetch(&self, owner: &str, id: Uuid) -> Result<Option<Note>>;

    /// Insert a new note for `owner`. The store assigns the uuid and
    /// timestamps; the created record is returned.
    async fn insert(&self, owner: &str, req: CreateNoteRequest) -> Result<Note>;

    /// Update a note, owner-scoped. Returns the updated record, or `None`
    /// when the id is unknown or owned by someone else.
    async fn update(&self, owner: &str, id: Uuid, req: UpdateNoteRequest) -> Result<Option<Note>>;

    /// Hard-delete a note, owner-scoped. Returns the number of rows removed.
    async fn delete(&self, owner: &str, id: Uuid) -> Result<u64>;
}

/// Source of the current session on the client side.
///
/// Auth state is an explicit dependency passed to every data-access call,
/// never global mutable state.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// The current session, or `None` when the user is not authenticated.
    async fn current(&self) -> Option<Session>;
}

/// Completion-provider interface used by the summarization workflow.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Run a single system+user chat completion and return the generated text.
    async fn complete(&self, system: &str, user: &str, options: &CompletionOptions)
        -> Result<String>;

    /// List the models the provider advertises.
    async fn list_models(&self) -> Result<Vec<ModelInfo>>;

    /// Model used when a request does not name one.
    fn default_model(&self) -> &str;
}

/// Request-shaping options for a chat completion.
#[derive(Debug, Clone, Default)]
pub struct CompletionOptions {
    /// Model identifier; `None` uses the backend default.
    pub model: Option<String>,
    /// Maximum output tokens.
    pub max_tokens: Option<u32>,
    /// Sampling temperature.
    pub temperature: Option<f32>,
}
