//! Telegram chat transport
//!
//! Bot API client, inbound update decoding and long-poll ingestion. The
//! webhook side lives in `api`; both feed the runtime the same envelopes.

mod client;
pub mod commands;
mod polling;
pub mod types;

pub use client::{TelegramClient, TelegramError, DEFAULT_API_URL};
pub use polling::{run_polling, POLL_TIMEOUT_SECS};
pub use types::Update;

use crate::runtime::Envelope;

/// Decode an update into a runtime envelope. Updates without a text message
/// yield `None`.
pub fn envelope_from_update(update: Update) -> Option<Envelope> {
    let message = update.message?;
    let text = message.text?;
    let initiator_name = message.from.as_ref().and_then(types::User::display_name);

    Some(Envelope {
        chat_id: message.chat.id,
        event: commands::classify(text, initiator_name),
    })
}
