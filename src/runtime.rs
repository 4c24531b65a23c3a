//! Runtime for executing expense conversations
//!
//! One dispatcher owns the draft store and processes envelopes in arrival
//! order. Submissions run as background tasks and report back as events;
//! outbound messages go through per-chat ordered send tasks.

mod executor;
mod outbox;
pub mod traits;


pub use executor::ConversationRuntime;
pub use traits::*;

use crate::state_machine::Event;
use crate::store::ChatId;

/// Production runtime: Telegram out, HTTP submissions
pub type ProductionRuntime = ConversationRuntime<
    crate::telegram::TelegramClient,
    crate::submission::LoggingSubmitter<crate::submission::HttpExpenseSubmitter>,
>;

/// Capacity of the inbound channel shared by the ingestion sources
pub const INBOUND_CAPACITY: usize = 256;

/// An event addressed to one chat
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    pub chat_id: ChatId,
    pub event: Event,
}

impl Envelope {
    pub fn new(chat_id: ChatId, event: Event) -> Self {
        Self { chat_id, event }
    }
}
