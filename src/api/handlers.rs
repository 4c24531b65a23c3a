//! HTTP request handlers

use super::types::{ErrorResponse, HealthResponse};
use super::{AppState, SECRET_HEADER};
use crate::config::WEBHOOK_PATH;
use crate::telegram::{envelope_from_update, Update};
use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use subtle::ConstantTimeEq;
use tower_http::trace::TraceLayer;

/// Create the webhook router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route(WEBHOOK_PATH, post(receive_update))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// Accept one Telegram update. Updates the bot does not act on are still
/// acknowledged so Telegram does not redeliver them.
async fn receive_update(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<StatusCode, AppError> {
    if let Some(expected) = &state.secret {
        let provided = headers
            .get(SECRET_HEADER)
            .map(|v| v.as_bytes())
            .unwrap_or_default();
        if !bool::from(provided.ct_eq(expected.as_bytes())) {
            tracing::warn!("Webhook request with bad secret token");
            return Err(AppError::Unauthorized);
        }
    }

    let update: Update = serde_json::from_slice(&body)
        .map_err(|e| AppError::BadRequest(format!("Invalid update: {e}")))?;
    let update_id = update.update_id;

    let Some(envelope) = envelope_from_update(update) else {
        tracing::debug!(update_id, "Update without text message skipped");
        return Ok(StatusCode::OK);
    };

    state
        .inbound
        .send(envelope)
        .await
        .map_err(|_| AppError::Unavailable("Runtime is shutting down".to_string()))?;

    Ok(StatusCode::OK)
}

// ============================================================
// Error Handling
// ============================================================

#[derive(Debug)]
enum AppError {
    BadRequest(String),
    Unauthorized,
    Unavailable(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "Invalid secret token".to_string(),
            ),
            AppError::Unavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
        };

        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}
