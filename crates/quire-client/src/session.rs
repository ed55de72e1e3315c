//! In-memory session provider.
//!
//! Holds the current session (token + owner email) behind a lock so the
//! client can be shared across tasks. An expired session reads as absent,
//! which downgrades every mutation to the unauthenticated path.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use quire_core::{Session, SessionProvider};

/// Session provider backed by a shared in-memory slot.
#[derive(Clone, Default)]
pub struct StaticSessionProvider {
    slot: Arc<RwLock<Option<Session>>>,
}

impl StaticSessionProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a session, replacing any previous one.
    pub async fn set(&self, session: Session) {
        debug!(owner = %session.email, "Session installed");
        *self.slot.write().await = Some(session);
    }

    /// Drop the current session.
    pub async fn clear(&self) {
        debug!("Session cleared");
        *self.slot.write().await = None;
    }
}

#[async_trait]
impl SessionProvider for StaticSessionProvider {
    async fn current(&self) -> Option<Session> {
        let slot = self.slot.read().await;
        slot.as_ref().filter(|s| !s.is_expired()).cloned()
    }
}
