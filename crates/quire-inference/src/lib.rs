//! # quire-inference
//!
//! Completion-provider abstraction for quire.
//!
//! This crate provides:
//! - An OpenAI-compatible chat-completions backend (works against Groq,
//!   OpenAI, or any compatible provider)
//! - Model discovery via the provider's `/models` listing
//! - The summarizer that shapes a [`SummarizeRequest`] into a backend call
//! - A deterministic mock backend (feature `mock`)
//!
//! # Example
//!
//! ```rust,no_run
//! use quire_inference::{ChatCompletionsBackend, Summarizer};
//! use quire_core::SummarizeRequest;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let backend = ChatCompletionsBackend::from_env().unwrap();
//!     let summarizer = Summarizer::new(Arc::new(backend));
//!     let summary = summarizer
//!         .summarize(&SummarizeRequest {
//!             text: "Long note text".to_string(),
//!             model: None,
//!             length: None,
//!             tone: None,
//!         })
//!         .await
//!         .unwrap();
//!     println!("{}", summary);
//! }
//! ```

pub mod chat;
pub mod summarizer;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

// Re-export core types
pub use quire_core::*;

pub use chat::ChatCompletionsBackend;
pub use summarizer::Summarizer;

#[cfg(any(test, feature = "mock"))]
pub use mock::MockChatBackend;
