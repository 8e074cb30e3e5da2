//! Request and response bodies.

use serde::{Deserialize, Serialize};

/// `POST /ask-ai` request body.
#[derive(Debug, Clone, Deserialize)]
pub struct AskRequest {
    pub message: String,
    /// Structure key selecting the assistant; omitted for the default one.
    #[serde(default)]
    pub structure_id: Option<String>,
}

/// `POST /ask-ai` success body.
#[derive(Debug, Clone, Serialize)]
pub struct AskResponse {
    pub response: String,
}

/// Error body shared by all failing endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// `GET /health` body.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}
