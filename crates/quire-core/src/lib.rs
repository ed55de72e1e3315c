//! # quire-core
//!
//! Core types, traits, and abstractions for the quire notes application.
//!
//! This crate provides the foundational data structures and trait definitions
//! that other quire crates depend on: the note and session models, the error
//! taxonomy, prompt construction for summarization, and the summary workflow
//! state machine.

pub mod defaults;
pub mod error;
pub mod logging;
pub mod models;
pub mod prompt;
pub mod summary;
pub mod traits;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use models::*;
pub use prompt::{build_prompt, SummaryPrompt};
pub use summary::{GenerationPhase, SummarySession, SummaryState};
pub use traits::*;
