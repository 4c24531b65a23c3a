//! Webhook ingestion for Telegram
//!
//! Telegram pushes updates to `POST /webhook`; each is decoded and forwarded
//! to the runtime exactly as the long-poll loop would.

mod handlers;
mod types;

pub use handlers::create_router;
#[allow(unused_imports)] // Public API re-exports
pub use types::*;

use crate::runtime::Envelope;
use tokio::sync::mpsc;

/// Header Telegram uses to echo the secret given to `setWebhook`
pub const SECRET_HEADER: &str = "x-telegram-bot-api-secret-token";

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub inbound: mpsc::Sender<Envelope>,
    /// Expected secret token; `None` accepts every request
    pub secret: Option<String>,
}

impl AppState {
    pub fn new(inbound: mpsc::Sender<Envelope>, secret: Option<String>) -> Self {
        Self { inbound, secret }
    }
}
