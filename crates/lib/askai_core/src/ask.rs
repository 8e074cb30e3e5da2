//! The ask flow: one user message in, one assistant reply out.
//!
//! Every call creates a fresh upstream thread and run; nothing is cached or
//! shared between calls apart from the read-only registry and the client.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::assistants::{AssistantsApi, MessageRole, RunStatus, ThreadMessage};
use crate::error::AskError;
use crate::poll::PollPolicy;
use crate::registry::StructureRegistry;

/// Resolves an assistant, runs it on a new thread and returns its reply.
pub struct AskService {
    api: Arc<dyn AssistantsApi>,
    registry: Arc<StructureRegistry>,
    default_assistant: String,
    poll: PollPolicy,
}

impl AskService {
    pub fn new(
        api: Arc<dyn AssistantsApi>,
        registry: Arc<StructureRegistry>,
        default_assistant: impl Into<String>,
        poll: PollPolicy,
    ) -> Self {
        Self {
            api,
            registry,
            default_assistant: default_assistant.into(),
            poll,
        }
    }

    /// Send `message` to the assistant selected by `structure_key` (or the
    /// default assistant) and return the reply text.
    ///
    /// An unknown structure key fails before anything is sent upstream.
    pub async fn ask(&self, message: &str, structure_key: Option<&str>) -> Result<String, AskError> {
        let assistant_id = self.registry.resolve(structure_key, &self.default_assistant)?;

        let thread = self.api.create_thread(message).await?;
        info!(thread_id = %thread.id, "thread created");

        let run = self.api.create_run(&thread.id, assistant_id).await?;
        info!(thread_id = %thread.id, run_id = %run.id, assistant_id, status = %run.status, "run started");

        let run = self
            .poll
            .wait_for_terminal(self.api.as_ref(), &thread.id, run)
            .await?;

        if run.status == RunStatus::Failed {
            let reason = run.failure_reason();
            warn!(thread_id = %thread.id, run_id = %run.id, %reason, "run failed");
            return Err(AskError::RunFailed {
                run_id: run.id,
                reason,
            });
        }

        let messages = self.api.list_messages(&thread.id).await?;
        let reply = first_assistant_reply(&thread.id, &messages)?;
        debug!(thread_id = %thread.id, reply_len = reply.len(), "assistant reply received");
        Ok(reply)
    }
}

/// Text of the first assistant-authored message, in provider order.
fn first_assistant_reply(thread_id: &str, messages: &[ThreadMessage]) -> Result<String, AskError> {
    if messages.is_empty() {
        return Err(AskError::EmptyMessageList(thread_id.to_string()));
    }

    messages
        .iter()
        .find(|m| m.role == MessageRole::Assistant)
        .map(ThreadMessage::text)
        .ok_or_else(|| AskError::NoAssistantReply(thread_id.to_string()))
}
