//! askai gateway server binary.
//!
//! Serves `POST /ask-ai`, relaying each message to a hosted OpenAI assistant
//! and returning its reply.

use std::path::PathBuf;
use std::time::Duration;

use askai_api::config::{ApiConfig, DEFAULT_ASSISTANT_ID, DEFAULT_BASE_URL};
use clap::Parser;
use tracing::info;

/// CLI arguments for the gateway server.
#[derive(Parser, Debug)]
#[command(name = "askai_server", about = "askai assistant gateway", version)]
struct Args {
    /// Interface to listen on.
    #[arg(long, env = "ASKAI_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on.
    #[arg(long, env = "PORT", default_value_t = 3000)]
    port: u16,

    /// OpenAI API key. Not checked at startup; a missing key fails each request.
    #[arg(long, env = "OPENAI_API_KEY", default_value = "", hide_env_values = true)]
    openai_api_key: String,

    /// OpenAI API root URL.
    #[arg(long, env = "OPENAI_BASE_URL", default_value = DEFAULT_BASE_URL)]
    openai_base_url: String,

    /// Assistant used when a request names no structure.
    #[arg(long, env = "ASKAI_ASSISTANT_ID", default_value = DEFAULT_ASSISTANT_ID)]
    assistant_id: String,

    /// JSON file mapping structure keys to assistant IDs (replaces the bundled table).
    #[arg(long, env = "ASKAI_STRUCTURES_FILE")]
    structures: Option<PathBuf>,

    /// Seconds to wait between run status checks.
    #[arg(long, env = "ASKAI_POLL_INTERVAL_SECS", default_value_t = 10)]
    poll_interval_secs: u64,

    /// Give up on a run after this many status checks (unbounded if unset).
    #[arg(long, env = "ASKAI_MAX_POLL_ATTEMPTS")]
    max_poll_attempts: Option<u32>,

    /// Timeout in seconds for each upstream HTTP call.
    #[arg(long, env = "ASKAI_REQUEST_TIMEOUT_SECS", default_value_t = 60)]
    request_timeout_secs: u64,
}

impl Args {
    fn into_config(self) -> ApiConfig {
        ApiConfig {
            bind_addr: format!("{}:{}", self.host, self.port),
            openai_api_key: self.openai_api_key,
            openai_base_url: self.openai_base_url,
            default_assistant_id: self.assistant_id,
            structures_file: self.structures,
            poll_interval: Duration::from_secs(self.poll_interval_secs),
            max_poll_attempts: self.max_poll_attempts,
            request_timeout: Duration::from_secs(self.request_timeout_secs),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,askai_api=debug,askai_core=debug".into()),
        )
        .init();

    let config = Args::parse().into_config();

    info!(
        bind_addr = %config.bind_addr,
        openai_base_url = %config.openai_base_url,
        default_assistant = %config.default_assistant_id,
        poll_interval_secs = config.poll_interval.as_secs(),
        "starting askai_server"
    );

    let state = askai_api::AppState::from_config(config.clone())?;
    let app = askai_api::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!(addr = %listener.local_addr()?, "REST API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown signal received");
    }
}
