//! Scripted in-memory [`AssistantsApi`] for tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;

use super::{
    AssistantsApi, MessageContent, MessageRole, Run, RunStatus, TextContent, Thread,
    ThreadMessage,
};
use crate::error::AskError;

pub fn text_message(id: &str, role: MessageRole, text: &str) -> ThreadMessage {
    ThreadMessage {
        id: id.into(),
        role,
        content: vec![MessageContent::Text {
            text: TextContent { value: text.into() },
        }],
    }
}

/// Replays a fixed sequence of run statuses and records every call.
pub struct ScriptedAssistants {
    initial_status: RunStatus,
    statuses: Mutex<VecDeque<RunStatus>>,
    messages: Vec<ThreadMessage>,
    fail_retrieve_after: Option<u32>,
    threads_created: AtomicU32,
    retrieve_calls: AtomicU32,
    list_calls: AtomicU32,
    thread_messages: Mutex<Vec<String>>,
    run_assistants: Mutex<Vec<String>>,
}

impl ScriptedAssistants {
    /// `statuses` are returned by successive `retrieve_run` calls.
    pub fn new(statuses: Vec<RunStatus>) -> Self {
        Self {
            initial_status: RunStatus::Queued,
            statuses: Mutex::new(statuses.into()),
            messages: Vec::new(),
            fail_retrieve_after: None,
            threads_created: AtomicU32::new(0),
            retrieve_calls: AtomicU32::new(0),
            list_calls: AtomicU32::new(0),
            thread_messages: Mutex::new(Vec::new()),
            run_assistants: Mutex::new(Vec::new()),
        }
    }

    pub fn with_initial_status(mut self, status: RunStatus) -> Self {
        self.initial_status = status;
        self
    }

    pub fn with_messages(mut self, messages: Vec<ThreadMessage>) -> Self {
        self.messages = messages;
        self
    }

    pub fn failing_retrieve_after(mut self, calls: u32) -> Self {
        self.fail_retrieve_after = Some(calls);
        self
    }

    pub fn threads_created(&self) -> u32 {
        self.threads_created.load(Ordering::SeqCst)
    }

    pub fn retrieve_calls(&self) -> u32 {
        self.retrieve_calls.load(Ordering::SeqCst)
    }

    pub fn list_calls(&self) -> u32 {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn thread_messages(&self) -> Vec<String> {
        self.thread_messages.lock().unwrap().clone()
    }

    pub fn run_assistants(&self) -> Vec<String> {
        self.run_assistants.lock().unwrap().clone()
    }
}

#[async_trait]
impl AssistantsApi for ScriptedAssistants {
    async fn create_thread(&self, message: &str) -> Result<Thread, AskError> {
        let n = self.threads_created.fetch_add(1, Ordering::SeqCst) + 1;
        self.thread_messages.lock().unwrap().push(message.to_string());
        Ok(Thread {
            id: format!("thread_{n}"),
        })
    }

    async fn create_run(&self, thread_id: &str, assistant_id: &str) -> Result<Run, AskError> {
        let n = {
            let mut assistants = self.run_assistants.lock().unwrap();
            assistants.push(assistant_id.to_string());
            assistants.len()
        };
        Ok(Run {
            id: format!("run_{n}"),
            thread_id: thread_id.to_string(),
            status: self.initial_status,
            last_error: None,
        })
    }

    async fn retrieve_run(&self, thread_id: &str, run_id: &str) -> Result<Run, AskError> {
        let n = self.retrieve_calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_retrieve_after.is_some_and(|limit| n > limit) {
            return Err(AskError::Upstream("connection reset".into()));
        }
        let status = self
            .statuses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| AskError::Upstream("status script exhausted".into()))?;
        Ok(Run {
            id: run_id.to_string(),
            thread_id: thread_id.to_string(),
            status,
            last_error: None,
        })
    }

    async fn list_messages(&self, _thread_id: &str) -> Result<Vec<ThreadMessage>, AskError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.messages.clone())
    }
}
