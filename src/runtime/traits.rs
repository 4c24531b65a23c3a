//! Trait abstractions for runtime I/O
//!
//! These traits enable testing the executor with mock implementations.

use crate::state_machine::Formatting;
use crate::store::ChatId;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Outbound message delivery failed
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct TransportError {
    pub message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Outbound side of the chat transport
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Deliver `text` to the chat. No delivery confirmation beyond the
    /// transport accepting it.
    async fn send_message(
        &self,
        chat_id: ChatId,
        text: &str,
        formatting: Formatting,
    ) -> Result<(), TransportError>;
}

#[async_trait]
impl<T: ChatTransport + ?Sized> ChatTransport for Arc<T> {
    async fn send_message(
        &self,
        chat_id: ChatId,
        text: &str,
        formatting: Formatting,
    ) -> Result<(), TransportError> {
        (**self).send_message(chat_id, text, formatting).await
    }
}
