//! Ask handler — relays a user message to the hosted assistant.

use axum::Json;
use axum::extract::State;
use tracing::{error, info};

use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::models::{AskRequest, AskResponse};

/// `POST /ask-ai` — run the assistant on the message and return its reply.
///
/// Blocks until the upstream run finishes; there is no streaming or partial
/// response.
pub async fn ask_handler(
    State(state): State<AppState>,
    Json(body): Json<AskRequest>,
) -> AppResult<Json<AskResponse>> {
    info!(structure_id = ?body.structure_id, "ask-ai request");

    let response = state
        .ask
        .ask(&body.message, body.structure_id.as_deref())
        .await
        .map_err(|e| {
            error!(error = %e, "ask-ai request failed");
            AppError::from(e)
        })?;

    Ok(Json(AskResponse { response }))
}
