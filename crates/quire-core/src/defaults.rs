//! Centralized default constants for the quire system.
//!
//! **This module is the single source of truth** for all shared default
//! values. Crates reference these constants instead of defining their own
//! magic numbers.

// =============================================================================
// COMPLETIONS
// =============================================================================

/// Default base URL for the OpenAI-compatible completions provider.
///
/// Groq exposes an OpenAI-compatible surface under `/openai/v1`.
pub const COMPLETIONS_URL: &str = "https://api.groq.com/openai/v1";

/// Default generation model for summaries.
pub const GEN_MODEL: &str = "llama3-70b-8192";

/// Sampling temperature for summary generation.
pub const GEN_TEMPERATURE: f32 = 0.5;

/// Timeout for generation requests (seconds).
pub const GEN_TIMEOUT_SECS: u64 = 120;

/// Elapsed time above which a completion logs a slow-operation warning (ms).
pub const SLOW_OP_THRESHOLD_MS: u64 = 30_000;

// =============================================================================
// SUMMARY LENGTH HINTS
// =============================================================================

/// Maximum output tokens for a short summary.
pub const SUMMARY_TOKENS_SHORT: u32 = 256;

/// Maximum output tokens for a medium summary.
pub const SUMMARY_TOKENS_MEDIUM: u32 = 1024;

/// Maximum output tokens for a detailed summary.
pub const SUMMARY_TOKENS_DETAILED: u32 = 1536;

// =============================================================================
// SESSIONS
// =============================================================================

/// Default session lifetime (hours).
pub const SESSION_LIFETIME_HOURS: i64 = 24;

/// Default login-code lifetime (minutes).
pub const LOGIN_CODE_LIFETIME_MINS: i64 = 10;

// =============================================================================
// API SERVER
// =============================================================================

/// Default bind address for the API server.
pub const API_BIND_ADDR: &str = "0.0.0.0:3000";

/// Default application root the auth callback redirects to.
pub const APP_BASE_URL: &str = "http://localhost:3000";
