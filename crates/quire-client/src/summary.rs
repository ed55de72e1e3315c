//! Summary workflow: drives the [`SummarySession`] state machine over the
//! network client.
//!
//! Opening a note that already carries a saved summary displays it with no
//! network call. Opening a note without one triggers the initial generation
//! automatically and persists the result to the note in the same step.
//! Regeneration produces a candidate held apart from the saved summary; the
//! candidate only persists through an explicit [`save_candidate`].
//!
//! [`save_candidate`]: SummaryWorkflow::save_candidate

use tracing::{info, instrument, warn};
use uuid::Uuid;

use quire_core::{
    defaults, Error, GenerationPhase, Note, Result, SummarizeRequest, SummaryLength,
    SummarySession, SummaryTone, UpdateNoteRequest,
};

use crate::events::ClientEvent;
use crate::notes::NotesClient;

/// Generation parameters carried by each request.
#[derive(Debug, Clone, Default)]
pub struct SummaryOptions {
    /// Explicit model choice; `None` uses the provider default.
    pub model: Option<String>,
    pub length: SummaryLength,
    pub tone: SummaryTone,
}

/// Models offered for selection, with a fallback marker.
#[derive(Debug, Clone)]
pub struct ModelSelection {
    /// Model identifiers to offer.
    pub models: Vec<String>,
    /// False when discovery failed and only the hardwired default is known.
    /// Selection controls should be disabled in that case.
    pub selection_enabled: bool,
}

/// A summary page session bound to one note.
pub struct SummaryWorkflow {
    client: NotesClient,
    note: Note,
    session: SummarySession,
}

impl SummaryWorkflow {
    /// Open the workflow for `note_id`.
    ///
    /// A saved summary displays immediately. Otherwise an initial generation
    /// runs right away and its result is persisted to the note. A failed
    /// initial generation still yields a usable workflow: the failure is
    /// recorded in the session state and emitted as an event, not returned
    /// as an error.
    #[instrument(skip(client, options), fields(subsystem = "client", component = "summary", op = "open", note_id = %note_id))]
    pub async fn open(
        client: NotesClient,
        note_id: Uuid,
        options: &SummaryOptions,
    ) -> Result<Self> {
        let note = client
            .get_note(Some(note_id))
            .await?
            .ok_or(Error::NoteNotFound(note_id))?;

        let mut workflow = Self {
            session: SummarySession::open(note.summary.clone()),
            client,
            note,
        };

        if workflow.session.saved().is_none() {
            workflow.generate(GenerationPhase::Initial, options).await;
        }
        Ok(workflow)
    }

    pub fn session(&self) -> &SummarySession {
        &self.session
    }

    pub fn note(&self) -> &Note {
        &self.note
    }

    /// Manually regenerate. The result lands in the candidate slot only;
    /// the saved summary is untouched until [`save_candidate`] is called.
    /// Returns `false` when a generation is already in flight.
    ///
    /// [`save_candidate`]: Self::save_candidate
    #[instrument(skip(self, options), fields(subsystem = "client", component = "summary", op = "regenerate", note_id = %self.note.uuid))]
    pub async fn regenerate(&mut self, options: &SummaryOptions) -> bool {
        if self.session.is_generating() {
            return false;
        }
        self.generate(GenerationPhase::Regeneration, options).await;
        true
    }

    async fn generate(&mut self, phase: GenerationPhase, options: &SummaryOptions) {
        if !self.session.begin(phase) {
            return;
        }

        let request = SummarizeRequest {
            text: self.note.notes.clone(),
            model: options.model.clone(),
            length: Some(options.length),
            tone: Some(options.tone),
        };

        match self.client.summarize(&request).await {
            Ok(summary) => match phase {
                GenerationPhase::Initial => {
                    // The initial result is canonical: persist it to the
                    // note before marking the session displayed.
                    match self.persist_summary(&summary).await {
                        Ok(()) => {
                            info!(note_id = %self.note.uuid, "Initial summary saved");
                            self.session.complete_initial(summary);
                        }
                        Err(e) => {
                            warn!(note_id = %self.note.uuid, error_msg = %e, "Failed to persist initial summary");
                            self.session.fail(phase, e.to_string());
                        }
                    }
                }
                GenerationPhase::Regeneration => {
                    self.session.complete_regeneration(summary);
                }
            },
            Err(e) => {
                warn!(note_id = %self.note.uuid, error_msg = %e, "Generation failed");
                self.session.fail(phase, phase.failure_message());
            }
        }
    }

    /// Persist the current candidate as the note's saved summary.
    /// Returns the committed text, or `None` when there is no candidate.
    #[instrument(skip(self), fields(subsystem = "client", component = "summary", op = "save", note_id = %self.note.uuid))]
    pub async fn save_candidate(&mut self) -> Result<Option<String>> {
        let Some(candidate) = self.session.candidate().map(str::to_string) else {
            return Ok(None);
        };

        self.persist_summary(&candidate).await?;
        let committed = self.session.commit_candidate();
        self.client
            .events()
            .emit(ClientEvent::SummarySaved { id: self.note.uuid });
        Ok(committed)
    }

    /// Drop the candidate and fall back to the saved summary.
    pub fn discard_candidate(&mut self) {
        self.session.discard_candidate();
    }

    async fn persist_summary(&mut self, summary: &str) -> Result<()> {
        let request = UpdateNoteRequest {
            notes: self.note.notes.clone(),
            title: self.note.title.clone(),
            email: None,
            summary: Some(summary.to_string()),
        };
        self.note = self.client.update_note(self.note.uuid, &request).await?;
        Ok(())
    }
}

/// Models to offer in the selection control.
///
/// When discovery fails or returns nothing, falls back to the single
/// hardwired default with selection disabled rather than erroring.
pub async fn available_models(client: &NotesClient) -> ModelSelection {
    match client.list_models().await {
        Ok(models) if !models.is_empty() => ModelSelection {
            models: models.into_iter().map(|m| m.id).collect(),
            selection_enabled: true,
        },
        Ok(_) => {
            warn!("Provider advertised no models, falling back to default");
            ModelSelection {
                models: vec![defaults::GEN_MODEL.to_string()],
                selection_enabled: false,
            }
        }
        Err(e) => {
            warn!(error_msg = %e, "Model discovery failed, falling back to default");
            ModelSelection {
                models: vec![defaults::GEN_MODEL.to_string()],
                selection_enabled: false,
            }
        }
    }
}
