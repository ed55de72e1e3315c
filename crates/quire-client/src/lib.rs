//! quire-client: cached note client and summary workflow.
//!
//! Wraps the notes API in a two-partition cache with a strict invalidation
//! contract, publishes lifecycle and failure events on a broadcast bus, and
//! drives the summary-generation state machine from `quire-core`.

pub mod cache;
pub mod events;
pub mod notes;
pub mod session;
pub mod summary;

pub use quire_core::*;

pub use cache::NoteCache;
pub use events::{ClientEvent, ClientEventBus, MutationOp};
pub use notes::NotesClient;
pub use session::StaticSessionProvider;
pub use summary::{available_models, ModelSelection, SummaryOptions, SummaryWorkflow};
