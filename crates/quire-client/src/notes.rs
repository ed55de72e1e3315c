//! Cached HTTP client for the notes API.
//!
//! Reads are cache-first: the collection and by-id partitions answer from
//! fresh entries and only hit the network on a miss. Mutations follow a
//! strict invalidation contract:
//!
//! | operation | collection | by-id entry      |
//! |-----------|------------|------------------|
//! | create    | invalidate | untouched        |
//! | update    | invalidate | invalidate       |
//! | delete    | invalidate | evict            |
//!
//! A failed mutation invalidates NOTHING and emits an [`OperationFailed`]
//! event with the operation's own message. All mutations require an active
//! session; without one they fail locally before any network traffic.
//!
//! [`OperationFailed`]: crate::events::ClientEvent::OperationFailed

use std::sync::Arc;

use reqwest::StatusCode;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use quire_core::{
    CreateNoteRequest, Error, ModelInfo, ModelList, Note, Result, Session, SessionProvider,
    SummarizeRequest, SummarizeResponse, UpdateNoteRequest,
};

use crate::cache::NoteCache;
use crate::events::{ClientEvent, ClientEventBus, MutationOp};

/// Cached, session-aware client for the notes API.
#[derive(Clone)]
pub struct NotesClient {
    http: reqwest::Client,
    base_url: String,
    sessions: Arc<dyn SessionProvider>,
    cache: NoteCache,
    events: ClientEventBus,
}

impl NotesClient {
    /// Create a client against `base_url` (no trailing slash).
    pub fn new(base_url: impl Into<String>, sessions: Arc<dyn SessionProvider>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            sessions,
            cache: NoteCache::new(),
            events: ClientEventBus::default(),
        })
    }

    /// The cache backing this client.
    pub fn cache(&self) -> &NoteCache {
        &self.cache
    }

    /// The event bus this client publishes to.
    pub fn events(&self) -> &ClientEventBus {
        &self.events
    }

    async fn require_session(&self, op: MutationOp) -> Result<Session> {
        match self.sessions.current().await {
            Some(session) => Ok(session),
            None => {
                warn!(op = ?op, "Mutation rejected: no active session");
                self.events.emit_failure(op);
                Err(Error::Unauthorized("No active session".to_string()))
            }
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Map an error response to the client error taxonomy.
    async fn error_for(response: reqwest::Response) -> Error {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        match status {
            StatusCode::UNAUTHORIZED => Error::Unauthorized(body),
            StatusCode::BAD_REQUEST => Error::InvalidInput(body),
            _ => Error::Internal(format!("Server returned {}: {}", status, body)),
        }
    }

    // ─── Reads ──────────────────────────────────────────────────────────

    /// List the owner's notes, newest first. Served from the collection
    /// partition when fresh, otherwise fetched and cached.
    #[instrument(skip(self), fields(subsystem = "client", component = "notes", op = "list"))]
    pub async fn list_notes(&self) -> Result<Vec<Note>> {
        if let Some(notes) = self.cache.collection().await {
            return Ok(notes);
        }

        let session = self
            .sessions
            .current()
            .await
            .ok_or_else(|| Error::Unauthorized("No active session".to_string()))?;

        let response = self
            .http
            .get(self.url("/notes"))
            .bearer_auth(&session.access_token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_for(response).await);
        }

        let notes: Vec<Note> = response.json().await?;
        debug!(result_count = notes.len(), "Fetched note collection");
        self.cache.set_collection(notes.clone()).await;
        Ok(notes)
    }

    /// Fetch a single note by id.
    ///
    /// `None` id short-circuits to `Ok(None)` without touching cache or
    /// network, so callers can pass an unresolved route parameter directly.
    /// An id the server does not know also yields `Ok(None)`.
    #[instrument(skip(self), fields(subsystem = "client", component = "notes", op = "get"))]
    pub async fn get_note(&self, id: Option<Uuid>) -> Result<Option<Note>> {
        let Some(id) = id else {
            return Ok(None);
        };

        if let Some(note) = self.cache.note(id).await {
            return Ok(Some(note));
        }

        let session = self
            .sessions
            .current()
            .await
            .ok_or_else(|| Error::Unauthorized("No active session".to_string()))?;

        let response = self
            .http
            .get(self.url("/notes"))
            .query(&[("uuid", id.to_string())])
            .bearer_auth(&session.access_token)
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(Self::error_for(response).await);
        }

        // The by-id read shares the listing endpoint and returns an array;
        // empty means the note does not exist for this owner.
        let mut notes: Vec<Note> = response.json().await?;
        match notes.pop() {
            Some(note) => {
                self.cache.set_note(note.clone()).await;
                Ok(Some(note))
            }
            None => Ok(None),
        }
    }

    // ─── Mutations ──────────────────────────────────────────────────────

    /// Create a note. Invalidates the collection on success.
    #[instrument(skip(self, req), fields(subsystem = "client", component = "notes", op = "create"))]
    pub async fn create_note(&self, req: &CreateNoteRequest) -> Result<Note> {
        let session = self.require_session(MutationOp::Create).await?;

        let result = self.post_note(&session, req).await;
        match result {
            Ok(note) => {
                self.cache.invalidate_collection().await;
                self.events.emit(ClientEvent::NoteCreated { id: note.uuid });
                Ok(note)
            }
            Err(e) => {
                warn!(error_msg = %e, "Create failed");
                self.events.emit_failure(MutationOp::Create);
                Err(e)
            }
        }
    }

    async fn post_note(&self, session: &Session, req: &CreateNoteRequest) -> Result<Note> {
        let response = self
            .http
            .post(self.url("/notes"))
            .bearer_auth(&session.access_token)
            .json(req)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_for(response).await);
        }

        let mut notes: Vec<Note> = response.json().await?;
        notes
            .pop()
            .ok_or_else(|| Error::Internal("Create returned no note".to_string()))
    }

    /// Update a note. Invalidates both partitions on success.
    ///
    /// Any `email` in `req` is ignored; ownership comes from the session.
    #[instrument(skip(self, req), fields(subsystem = "client", component = "notes", op = "update", note_id = %id))]
    pub async fn update_note(&self, id: Uuid, req: &UpdateNoteRequest) -> Result<Note> {
        let session = self.require_session(MutationOp::Update).await?;

        let result = self.put_note(&session, id, req).await;
        match result {
            Ok(note) => {
                self.cache.invalidate_collection().await;
                self.cache.invalidate_note(id).await;
                self.events.emit(ClientEvent::NoteUpdated { id });
                Ok(note)
            }
            Err(e) => {
                warn!(error_msg = %e, note_id = %id, "Update failed");
                self.events.emit_failure(MutationOp::Update);
                Err(e)
            }
        }
    }

    async fn put_note(&self, session: &Session, id: Uuid, req: &UpdateNoteRequest) -> Result<Note> {
        let response = self
            .http
            .put(self.url("/notes"))
            .query(&[("uuid", id.to_string())])
            .bearer_auth(&session.access_token)
            .json(req)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_for(response).await);
        }

        // An empty array means no row matched this owner and id.
        let mut notes: Vec<Note> = response.json().await?;
        notes.pop().ok_or(Error::NoteNotFound(id))
    }

    /// Delete a note. Invalidates the collection and evicts the by-id entry
    /// on success, so not even a stale placeholder survives.
    #[instrument(skip(self), fields(subsystem = "client", component = "notes", op = "delete", note_id = %id))]
    pub async fn delete_note(&self, id: Uuid) -> Result<()> {
        let session = self.require_session(MutationOp::Delete).await?;

        let result: Result<()> = async {
            let response = self
                .http
                .delete(self.url("/notes"))
                .query(&[("uuid", id.to_string())])
                .bearer_auth(&session.access_token)
                .send()
                .await?;

            if !response.status().is_success() {
                return Err(Self::error_for(response).await);
            }
            Ok(())
        }
        .await;

        match result {
            Ok(()) => {
                self.cache.invalidate_collection().await;
                self.cache.evict_note(id).await;
                self.events.emit(ClientEvent::NoteDeleted { id });
                Ok(())
            }
            Err(e) => {
                warn!(error_msg = %e, note_id = %id, "Delete failed");
                self.events.emit_failure(MutationOp::Delete);
                Err(e)
            }
        }
    }

    // ─── Summarization ──────────────────────────────────────────────────

    /// Request a summary of raw text. Does not touch the note cache; summary
    /// persistence goes through [`update_note`](Self::update_note). The
    /// endpoint is unauthenticated, so no session is required.
    #[instrument(skip(self, req), fields(subsystem = "client", component = "notes", op = "summarize"))]
    pub async fn summarize(&self, req: &SummarizeRequest) -> Result<String> {
        let result: Result<String> = async {
            let response = self
                .http
                .post(self.url("/ai/summarize"))
                .json(req)
                .send()
                .await?;

            if !response.status().is_success() {
                return Err(Self::error_for(response).await);
            }

            let body: SummarizeResponse = response.json().await?;
            Ok(body.summary)
        }
        .await;

        if let Err(ref e) = result {
            warn!(error_msg = %e, "Summarize failed");
            self.events.emit_failure(MutationOp::Summarize);
        }
        result
    }

    /// List models advertised by the summarization provider.
    #[instrument(skip(self), fields(subsystem = "client", component = "notes", op = "list_models"))]
    pub async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        let response = self.http.get(self.url("/ai/models")).send().await?;

        if !response.status().is_success() {
            return Err(Self::error_for(response).await);
        }

        let list: ModelList = response.json().await?;
        Ok(list.data)
    }
}
