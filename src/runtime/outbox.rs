//! Per-chat ordered message delivery
//!
//! Each send runs on its own task chained after the previous send to the same
//! chat, so a slow chat never holds up the dispatcher or other chats.

use super::traits::ChatTransport;
use crate::state_machine::Formatting;
use crate::store::ChatId;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::task::JoinHandle;

pub struct Outbox<T: ChatTransport + 'static> {
    transport: Arc<T>,
    /// Last queued send per chat
    tails: HashMap<ChatId, JoinHandle<()>>,
}

impl<T: ChatTransport + 'static> Outbox<T> {
    pub fn new(transport: Arc<T>) -> Self {
        Self {
            transport,
            tails: HashMap::new(),
        }
    }

    /// Queue a message behind everything already queued for the chat
    pub fn send(&mut self, chat_id: ChatId, text: String, formatting: Formatting) {
        let previous = self
            .tails
            .remove(&chat_id)
            .filter(|handle| !handle.is_finished());
        let transport = Arc::clone(&self.transport);

        let handle = tokio::spawn(async move {
            if let Some(previous) = previous {
                // A failed predecessor does not block this message
                let _ = previous.await;
            }
            if let Err(e) = transport.send_message(chat_id, &text, formatting).await {
                tracing::warn!(chat_id, error = %e, "Failed to send message");
            }
        });
        self.tails.insert(chat_id, handle);
    }

    /// Forget chats whose queue has drained
    pub fn prune(&mut self) {
        self.tails.retain(|_, handle| !handle.is_finished());
    }

    /// Wait until every queued message has been handed to the transport
    pub async fn flush(&mut self) {
        for (_, handle) in self.tails.drain() {
            let _ = handle.await;
        }
    }

    pub fn pending_chats(&self) -> usize {
        self.tails.len()
    }
}
