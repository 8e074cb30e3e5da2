//! API server configuration.

use std::path::PathBuf;
use std::time::Duration;

pub use askai_core::assistants::openai::DEFAULT_BASE_URL;
use askai_core::assistants::openai::OpenAiConfig;
use askai_core::poll::{DEFAULT_POLL_INTERVAL, PollPolicy};
use askai_core::registry::{RegistryError, StructureRegistry};

/// Assistant used when a request names no structure.
pub const DEFAULT_ASSISTANT_ID: &str = "asst_gW07pafBTwhLf8C0cnJfjNwD";

/// Configuration for the API server.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// Address to bind the HTTP listener (e.g. "0.0.0.0:3000").
    pub bind_addr: String,
    /// OpenAI API key. Not validated here; a bad key fails per request.
    pub openai_api_key: String,
    /// OpenAI API root.
    pub openai_base_url: String,
    /// Assistant used when no structure is requested.
    pub default_assistant_id: String,
    /// JSON structures table replacing the bundled one.
    pub structures_file: Option<PathBuf>,
    /// Wait between run status checks.
    pub poll_interval: Duration,
    /// Upper bound on status checks per request; `None` is unbounded.
    pub max_poll_attempts: Option<u32>,
    /// Timeout of each upstream HTTP call.
    pub request_timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:3000".into(),
            openai_api_key: String::new(),
            openai_base_url: DEFAULT_BASE_URL.into(),
            default_assistant_id: DEFAULT_ASSISTANT_ID.into(),
            structures_file: None,
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_poll_attempts: None,
            request_timeout: Duration::from_secs(60),
        }
    }
}

impl ApiConfig {
    pub fn openai(&self) -> OpenAiConfig {
        OpenAiConfig {
            api_key: self.openai_api_key.clone(),
            base_url: self.openai_base_url.clone(),
            request_timeout: self.request_timeout,
        }
    }

    pub fn poll_policy(&self) -> PollPolicy {
        let policy = PollPolicy::new(self.poll_interval);
        match self.max_poll_attempts {
            Some(max) => policy.with_max_attempts(max),
            None => policy,
        }
    }

    /// Load the structures file if one is configured, else the bundled table.
    pub fn load_registry(&self) -> Result<StructureRegistry, RegistryError> {
        match &self.structures_file {
            Some(path) => StructureRegistry::from_file(path),
            None => StructureRegistry::bundled(),
        }
    }
}
