//! Fixed-interval run polling.

use std::time::Duration;

use tokio::time::sleep;
use tracing::debug;

use crate::assistants::{AssistantsApi, Run};
use crate::error::AskError;

/// Default wait between two run status checks.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// How a pending run is waited on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Wait before each status check.
    pub interval: Duration,
    /// Give up after this many status checks. `None` polls until the run
    /// reaches a terminal status, however long that takes.
    pub max_attempts: Option<u32>,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_attempts: None,
        }
    }
}

impl PollPolicy {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            max_attempts: None,
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    pub fn is_bounded(&self) -> bool {
        self.max_attempts.is_some()
    }

    /// Wait until `run` reaches a terminal status and return its final state.
    ///
    /// A run that is already terminal is returned without waiting. Each
    /// subsequent check sleeps for `interval` first.
    pub async fn wait_for_terminal(
        &self,
        api: &dyn AssistantsApi,
        thread_id: &str,
        mut run: Run,
    ) -> Result<Run, AskError> {
        let mut attempts: u32 = 0;

        while !run.status.is_terminal() {
            if let Some(max) = self.max_attempts
                && attempts >= max
            {
                return Err(AskError::PollLimitExceeded {
                    run_id: run.id,
                    attempts,
                });
            }

            sleep(self.interval).await;
            attempts += 1;

            run = api.retrieve_run(thread_id, &run.id).await?;
            debug!(thread_id, run_id = %run.id, status = %run.status, attempt = attempts, "polled run status");
        }

        Ok(run)
    }
}
