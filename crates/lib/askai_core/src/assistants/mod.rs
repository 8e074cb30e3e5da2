//! Upstream assistants API — threads, runs and messages.
//!
//! [`AssistantsApi`] is the seam between the ask flow and the hosted
//! provider. [`openai::OpenAiAssistants`] talks to the OpenAI Assistants API
//! over HTTP; tests substitute scripted fakes.

#[cfg(test)]
pub(crate) mod fake;
pub mod openai;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::AskError;

/// A conversation thread created upstream.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Thread {
    pub id: String,
}

/// Status of an upstream run as reported by the provider.
///
/// Only [`RunStatus::Completed`] and [`RunStatus::Failed`] are treated as
/// terminal; every other value keeps the poll loop going.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Queued,
    InProgress,
    RequiresAction,
    Cancelling,
    Cancelled,
    Expired,
    Incomplete,
    Completed,
    Failed,
    #[serde(other)]
    Unknown,
}

impl RunStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, RunStatus::Completed | RunStatus::Failed)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RunStatus::Queued => "queued",
            RunStatus::InProgress => "in_progress",
            RunStatus::RequiresAction => "requires_action",
            RunStatus::Cancelling => "cancelling",
            RunStatus::Cancelled => "cancelled",
            RunStatus::Expired => "expired",
            RunStatus::Incomplete => "incomplete",
            RunStatus::Completed => "completed",
            RunStatus::Failed => "failed",
            RunStatus::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error details attached to a failed run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RunError {
    pub code: String,
    pub message: String,
}

/// An upstream run (processing job) on a thread.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Run {
    pub id: String,
    pub thread_id: String,
    pub status: RunStatus,
    #[serde(default)]
    pub last_error: Option<RunError>,
}

impl Run {
    /// Human-readable failure reason for a failed run.
    pub fn failure_reason(&self) -> String {
        match &self.last_error {
            Some(e) => format!("{}: {}", e.code, e.message),
            None => format!("run ended with status {}", self.status),
        }
    }
}

/// Author of a thread message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

/// Text payload of a message content part.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TextContent {
    pub value: String,
}

/// One content part of a thread message. Non-text parts are kept as
/// [`MessageContent::Other`] and ignored when extracting text.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessageContent {
    Text { text: TextContent },
    #[serde(other)]
    Other,
}

/// A message stored in an upstream thread.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ThreadMessage {
    pub id: String,
    pub role: MessageRole,
    #[serde(default)]
    pub content: Vec<MessageContent>,
}

impl ThreadMessage {
    /// Concatenated text of all text parts, separated by newlines.
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(|part| match part {
                MessageContent::Text { text } => Some(text.value.as_str()),
                MessageContent::Other => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Operations the ask flow needs from the hosted assistants provider.
#[async_trait]
pub trait AssistantsApi: Send + Sync {
    /// Create a thread seeded with one user message.
    async fn create_thread(&self, message: &str) -> Result<Thread, AskError>;

    /// Start a run of `assistant_id` on the thread.
    async fn create_run(&self, thread_id: &str, assistant_id: &str) -> Result<Run, AskError>;

    /// Fetch the current state of a run.
    async fn retrieve_run(&self, thread_id: &str, run_id: &str) -> Result<Run, AskError>;

    /// List the thread's messages in provider order.
    async fn list_messages(&self, thread_id: &str) -> Result<Vec<ThreadMessage>, AskError>;
}
