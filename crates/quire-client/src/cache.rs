//! Client-side note cache.
//!
//! Exactly two partitions: the "collection" (the owner's full note listing)
//! and "by id" (individual notes). Mutations never write into the cache
//! directly; they go through the invalidation contract on [`NotesClient`]:
//! create invalidates the collection, update invalidates both partitions,
//! delete invalidates the collection and EVICTS the by-id entry.
//!
//! Invalidation marks an entry stale: the next read misses and refetches,
//! but the stale value stays readable through the `*_stale` accessors as
//! placeholder data while the refetch is in flight. Eviction removes the
//! entry entirely, for entities that no longer exist.
//!
//! Writes are unconditional, so with concurrent requests for the same id
//! the later response to resolve wins (last-write-wins).
//!
//! [`NotesClient`]: crate::NotesClient

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use quire_core::Note;

/// Two-partition note cache.
#[derive(Clone)]
pub struct NoteCache {
    inner: Arc<NoteCacheInner>,
}

struct NoteCacheInner {
    slots: RwLock<Slots>,
}

#[derive(Default)]
struct Slots {
    collection: Option<CachedCollection>,
    by_id: HashMap<Uuid, CachedNote>,
}

struct CachedCollection {
    notes: Vec<Note>,
    stale: bool,
}

struct CachedNote {
    note: Note,
    stale: bool,
}

impl NoteCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(NoteCacheInner {
                slots: RwLock::new(Slots::default()),
            }),
        }
    }

    // ─── Collection partition ───────────────────────────────────────────

    /// Fresh collection contents, or `None` when absent or stale.
    pub async fn collection(&self) -> Option<Vec<Note>> {
        let slots = self.inner.slots.read().await;
        match &slots.collection {
            Some(c) if !c.stale => {
                debug!(cache_partition = "collection", "Cache HIT");
                Some(c.notes.clone())
            }
            _ => {
                debug!(cache_partition = "collection", "Cache MISS");
                None
            }
        }
    }

    /// Collection contents even when stale (placeholder data).
    pub async fn collection_stale(&self) -> Option<Vec<Note>> {
        let slots = self.inner.slots.read().await;
        slots.collection.as_ref().map(|c| c.notes.clone())
    }

    /// Store a fresh collection listing. Last write wins.
    pub async fn set_collection(&self, notes: Vec<Note>) {
        let mut slots = self.inner.slots.write().await;
        debug!(
            cache_partition = "collection",
            result_count = notes.len(),
            "Cache SET"
        );
        slots.collection = Some(CachedCollection {
            notes,
            stale: false,
        });
    }

    /// Mark the collection stale. The next read refetches.
    pub async fn invalidate_collection(&self) {
        let mut slots = self.inner.slots.write().await;
        if let Some(c) = slots.collection.as_mut() {
            c.stale = true;
            debug!(cache_partition = "collection", "Cache INVALIDATE");
        }
    }

    // ─── By-id partition ────────────────────────────────────────────────

    /// Fresh note by id, or `None` when absent or stale.
    pub async fn note(&self, id: Uuid) -> Option<Note> {
        let slots = self.inner.slots.read().await;
        match slots.by_id.get(&id) {
            Some(entry) if !entry.stale => {
                debug!(cache_partition = "by_id", note_id = %id, "Cache HIT");
                Some(entry.note.clone())
            }
            _ => {
                debug!(cache_partition = "by_id", note_id = %id, "Cache MISS");
                None
            }
        }
    }

    /// Note by id even when stale (placeholder data).
    pub async fn note_stale(&self, id: Uuid) -> Option<Note> {
        let slots = self.inner.slots.read().await;
        slots.by_id.get(&id).map(|entry| entry.note.clone())
    }

    /// Store a fresh note. Last write wins.
    pub async fn set_note(&self, note: Note) {
        let mut slots = self.inner.slots.write().await;
        debug!(cache_partition = "by_id", note_id = %note.uuid, "Cache SET");
        slots.by_id.insert(
            note.uuid,
            CachedNote {
                note,
                stale: false,
            },
        );
    }

    /// Mark a by-id entry stale. The next read refetches; the old value
    /// remains as placeholder data.
    pub async fn invalidate_note(&self, id: Uuid) {
        let mut slots = self.inner.slots.write().await;
        if let Some(entry) = slots.by_id.get_mut(&id) {
            entry.stale = true;
            debug!(cache_partition = "by_id", note_id = %id, "Cache INVALIDATE");
        }
    }

    /// Remove a by-id entry entirely. Used after delete: the entity no
    /// longer exists, so not even a stale placeholder may remain.
    pub async fn evict_note(&self, id: Uuid) {
        let mut slots = self.inner.slots.write().await;
        if slots.by_id.remove(&id).is_some() {
            debug!(cache_partition = "by_id", note_id = %id, "Cache EVICT");
        }
    }

    /// Drop everything (e.g. on logout).
    pub async fn clear(&self) {
        let mut slots = self.inner.slots.write().await;
        slots.collection = None;
        slots.by_id.clear();
    }
}

impl Default for NoteCache {
    fn default() -> Self {
        Self::new()
    }
}
