//! In-memory draft store
//!
//! Holds at most one draft per chat. Owned by the runtime dispatcher, which
//! is the only reader and writer, so no locking is needed.

use crate::state_machine::Draft;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Chat (user/session) identifier
pub type ChatId = i64;

#[derive(Debug)]
struct Entry {
    draft: Draft,
    touched_at: Instant,
}

/// Drafts keyed by chat id
#[derive(Debug, Default)]
pub struct DraftStore {
    drafts: HashMap<ChatId, Entry>,
}

impl DraftStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cleared draft, replacing any draft the chat already has
    pub fn begin(&mut self, chat_id: ChatId, initiator_name: Option<String>) -> &Draft {
        let entry = Entry {
            draft: Draft::new(initiator_name),
            touched_at: Instant::now(),
        };
        if let Some(old) = self.drafts.insert(chat_id, entry) {
            tracing::debug!(chat_id, draft_id = %old.draft.id, "Replacing draft in progress");
        }
        &self.drafts[&chat_id].draft
    }

    pub fn get(&self, chat_id: ChatId) -> Option<&Draft> {
        self.drafts.get(&chat_id).map(|e| &e.draft)
    }

    /// Apply an update to an existing draft. Returns false if the chat has none.
    pub fn advance(&mut self, chat_id: ChatId, transform: impl FnOnce(&mut Draft)) -> bool {
        match self.drafts.get_mut(&chat_id) {
            Some(entry) => {
                transform(&mut entry.draft);
                entry.touched_at = Instant::now();
                true
            }
            None => false,
        }
    }

    /// Delete the chat's draft, no-op if absent
    pub fn remove(&mut self, chat_id: ChatId) -> Option<Draft> {
        self.drafts.remove(&chat_id).map(|e| e.draft)
    }

    /// Drop drafts untouched for longer than `ttl`. Drafts awaiting a
    /// submission result are kept. Returns the evicted chat ids.
    pub fn evict_stale(&mut self, now: Instant, ttl: Duration) -> Vec<ChatId> {
        let stale: Vec<ChatId> = self
            .drafts
            .iter()
            .filter(|(_, e)| {
                !e.draft.is_completed() && now.saturating_duration_since(e.touched_at) > ttl
            })
            .map(|(chat_id, _)| *chat_id)
            .collect();
        for chat_id in &stale {
            self.drafts.remove(chat_id);
        }
        stale
    }

    pub fn len(&self) -> usize {
        self.drafts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drafts.is_empty()
    }
}
