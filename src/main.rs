//! Expense bot - guided expense capture over Telegram
//!
//! Each chat walks a small state machine (description, category, value) and
//! the finished expense is posted to an HTTP API.

mod api;
mod config;
mod prompts;
mod runtime;
mod state_machine;
mod store;
mod submission;
mod telegram;

use api::{create_router, AppState};
use config::{BotConfig, IngestionMode};
use runtime::{ProductionRuntime, INBOUND_CAPACITY};
use std::net::SocketAddr;
use std::sync::Arc;
use submission::{HttpExpenseSubmitter, LoggingSubmitter};
use telegram::{run_polling, TelegramClient, POLL_TIMEOUT_SECS};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "expense_bot=info,tower_http=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    // Configuration
    let config = match BotConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            eprintln!("Configuration error: {e}");
            std::process::exit(1);
        }
    };

    tracing::info!(
        mode = config.mode.as_str(),
        api_url = %config.api_url,
        draft_ttl_secs = ?config.draft_ttl.map(|t| t.as_secs()),
        "Starting expense bot"
    );

    let telegram = Arc::new(TelegramClient::new(&config.telegram_api_url, &config.token)?);
    let submitter = Arc::new(LoggingSubmitter::new(HttpExpenseSubmitter::new(&config.api_url)?));

    let shutdown = CancellationToken::new();
    let (inbound_tx, inbound_rx) = mpsc::channel(INBOUND_CAPACITY);

    let runtime = ProductionRuntime::new(
        Arc::clone(&telegram),
        submitter,
        inbound_rx,
        shutdown.clone(),
    )
    .with_draft_ttl(config.draft_ttl);
    let runtime_handle = tokio::spawn(runtime.run());

    tokio::spawn({
        let shutdown = shutdown.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Shutdown requested");
            }
            shutdown.cancel();
        }
    });

    match config.mode {
        IngestionMode::Polling => {
            run_polling(telegram, inbound_tx, shutdown.clone(), POLL_TIMEOUT_SECS).await;
        }
        IngestionMode::Webhook {
            port, ref secret, ..
        } => {
            let webhook_url = config.webhook_url().ok_or("webhook URL not configured")?;
            telegram.set_webhook(&webhook_url, secret.as_deref()).await?;
            tracing::info!(url = %webhook_url, "Webhook registered");

            let app = create_router(AppState::new(inbound_tx, secret.clone()));

            let addr = SocketAddr::from(([0, 0, 0, 0], port));
            tracing::info!("Webhook server listening on {}", addr);

            let listener = tokio::net::TcpListener::bind(addr).await?;
            axum::serve(listener, app)
                .with_graceful_shutdown(shutdown.clone().cancelled_owned())
                .await?;
        }
    }

    // Ingestion only stops on shutdown
    runtime_handle.await?;

    Ok(())
}
