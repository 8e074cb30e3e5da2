//! # askai_api
//!
//! HTTP API library for askai.

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;

use std::sync::Arc;

use askai_core::AskService;
use askai_core::assistants::AssistantsApi;
use askai_core::assistants::openai::OpenAiAssistants;
use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::ApiConfig;
use crate::error::StartupError;
use crate::handlers::{ask, health};

pub const ROUTE_ASK_AI: &str = "/ask-ai";
pub const ROUTE_HEALTH: &str = "/health";

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// The ask flow, with its registry and upstream client.
    pub ask: Arc<AskService>,
    /// API configuration.
    pub config: ApiConfig,
}

impl AppState {
    /// Assemble state around an existing assistants client.
    pub fn with_api(config: ApiConfig, api: Arc<dyn AssistantsApi>) -> Result<Self, StartupError> {
        let registry = Arc::new(config.load_registry()?);
        info!(structures = registry.len(), "structure registry loaded");

        let poll = config.poll_policy();
        if !poll.is_bounded() {
            warn!(
                interval_secs = poll.interval.as_secs(),
                "run polling is unbounded; a run that never finishes keeps its request open"
            );
        }

        let ask = AskService::new(api, registry, config.default_assistant_id.clone(), poll);
        Ok(Self {
            ask: Arc::new(ask),
            config,
        })
    }

    /// Assemble state talking to the OpenAI Assistants API.
    pub fn from_config(config: ApiConfig) -> Result<Self, StartupError> {
        if config.openai_api_key.is_empty() {
            warn!("OPENAI_API_KEY is not set; upstream calls will fail authentication");
        }
        let api = Arc::new(OpenAiAssistants::new(&config.openai())?);
        Self::with_api(config, api)
    }
}

/// Builds the Axum router with all routes and shared state.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(ROUTE_ASK_AI, post(ask::ask_handler))
        .route(ROUTE_HEALTH, get(health::health_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
