//! Long-poll ingestion

use super::{envelope_from_update, TelegramClient};
use crate::runtime::Envelope;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Server-side wait per `getUpdates` call
pub const POLL_TIMEOUT_SECS: u32 = 30;

const INITIAL_BACKOFF: Duration = Duration::from_secs(1);
const MAX_BACKOFF: Duration = Duration::from_secs(30);

/// Pull updates until shutdown, forwarding text messages to the runtime.
/// Polling errors are logged and retried with backoff; they never end the loop.
pub async fn run_polling(
    client: Arc<TelegramClient>,
    inbound: mpsc::Sender<Envelope>,
    shutdown: CancellationToken,
    poll_timeout_secs: u32,
) {
    if let Err(e) = client.delete_webhook().await {
        tracing::warn!(error = %e, "Failed to clear webhook before polling");
    }

    tracing::info!("Polling for updates");

    let mut offset: Option<i64> = None;
    let mut backoff = INITIAL_BACKOFF;

    loop {
        let result = tokio::select! {
            () = shutdown.cancelled() => break,
            result = client.get_updates(offset, poll_timeout_secs) => result,
        };

        match result {
            Ok(updates) => {
                backoff = INITIAL_BACKOFF;
                for update in updates {
                    offset = Some(update.update_id + 1);
                    let Some(envelope) = envelope_from_update(update) else {
                        continue;
                    };
                    if inbound.send(envelope).await.is_err() {
                        tracing::info!("Runtime stopped, ending polling");
                        return;
                    }
                }
            }
            Err(e) => {
                tracing::error!(error = %e, retry_in_secs = backoff.as_secs(), "Polling error");
                tokio::select! {
                    () = shutdown.cancelled() => break,
                    () = tokio::time::sleep(backoff) => {}
                }
                backoff = (backoff * 2).min(MAX_BACKOFF);
            }
        }
    }

    tracing::info!("Polling stopped");
}
