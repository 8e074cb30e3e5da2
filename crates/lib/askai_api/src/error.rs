//! Application error types.

use askai_core::AskError;
use askai_core::registry::RegistryError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::models::ErrorResponse;

/// Convenience alias for handler return types.
pub type AppResult<T> = Result<T, AppError>;

/// Application-level errors with HTTP status mapping.
///
/// Every variant renders as `500` with an `{"error": …}` body, including an
/// unknown structure key, which the deployed gateway has always reported as a
/// server error.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Unknown structure_id: {0}")]
    InvalidStructure(String),

    #[error("Assistant error: {0}")]
    Assistant(String),

    #[error("Upstream error: {0}")]
    Upstream(String),
}

/// Errors raised while assembling [`crate::AppState`] at startup.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Structure registry: {0}")]
    Registry(#[from] RegistryError),

    #[error("Assistants client: {0}")]
    Client(#[from] AskError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = match &self {
            AppError::InvalidStructure(_) | AppError::Assistant(_) => self.to_string(),
            AppError::Upstream(_) => "Error while calling the assistant API".to_string(),
        };
        (self.status(), Json(ErrorResponse { error: message })).into_response()
    }
}

impl From<AskError> for AppError {
    fn from(e: AskError) -> Self {
        match e {
            AskError::InvalidStructure(key) => AppError::InvalidStructure(key),
            AskError::Upstream(msg) => AppError::Upstream(msg),
            AskError::RunFailed { .. } => AppError::Assistant("assistant run failed".into()),
            AskError::EmptyMessageList(_) | AskError::NoAssistantReply(_) => {
                AppError::Assistant("assistant produced no reply".into())
            }
            AskError::PollLimitExceeded { .. } => {
                AppError::Assistant("assistant did not finish in time".into())
            }
        }
    }
}
