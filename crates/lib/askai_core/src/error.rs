//! Domain error types for the ask flow.

use thiserror::Error;

/// Errors produced while turning a user message into an assistant reply.
#[derive(Debug, Error)]
pub enum AskError {
    #[error("Unknown structure: {0}")]
    InvalidStructure(String),

    #[error("Assistant run {run_id} failed: {reason}")]
    RunFailed { run_id: String, reason: String },

    #[error("No messages found in thread {0}")]
    EmptyMessageList(String),

    #[error("No assistant reply found in thread {0}")]
    NoAssistantReply(String),

    #[error("Assistant run {run_id} still pending after {attempts} status checks")]
    PollLimitExceeded { run_id: String, attempts: u32 },

    #[error("Upstream error: {0}")]
    Upstream(String),
}

impl From<reqwest::Error> for AskError {
    fn from(e: reqwest::Error) -> Self {
        AskError::Upstream(e.to_string())
    }
}
