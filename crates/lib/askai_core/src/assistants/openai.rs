//! OpenAI Assistants API client.
//!
//! Speaks the v2 Assistants endpoints (`/threads`, `/threads/{id}/runs`,
//! `/threads/{id}/messages`). The API key is not validated up front: a
//! missing or wrong key surfaces as an upstream 401 on the first call.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{Client, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::{AssistantsApi, Run, Thread, ThreadMessage};
use crate::error::AskError;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const ASSISTANTS_BETA_HEADER: &str = "openai-beta";
const ASSISTANTS_BETA_VALUE: &str = "assistants=v2";

/// Connection settings for the OpenAI Assistants API.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// Secret API key sent as a bearer token.
    pub api_key: String,
    /// API root, without trailing slash (e.g. `https://api.openai.com/v1`).
    pub base_url: String,
    /// Timeout applied to each individual HTTP call.
    pub request_timeout: Duration,
}

impl OpenAiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(60),
        }
    }
}

#[derive(Serialize)]
struct InitialMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct CreateThreadRequest<'a> {
    messages: [InitialMessage<'a>; 1],
}

#[derive(Serialize)]
struct CreateRunRequest<'a> {
    assistant_id: &'a str,
}

#[derive(serde::Deserialize)]
struct MessageList {
    data: Vec<ThreadMessage>,
}

/// [`AssistantsApi`] backed by the OpenAI HTTP API.
#[derive(Debug, Clone)]
pub struct OpenAiAssistants {
    client: Client,
    base_url: String,
}

impl OpenAiAssistants {
    /// Build a client with auth and beta headers preset.
    pub fn new(config: &OpenAiConfig) -> Result<Self, AskError> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.api_key))
            .map_err(|_| AskError::Upstream("API key contains invalid header characters".into()))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(
            ASSISTANTS_BETA_HEADER,
            HeaderValue::from_static(ASSISTANTS_BETA_VALUE),
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Decode a successful JSON response, or turn a non-2xx into an upstream error.
async fn decode<T: DeserializeOwned>(resp: Response, what: &str) -> Result<T, AskError> {
    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp
            .text()
            .await
            .unwrap_or_else(|_| "<no body>".to_string());
        return Err(AskError::Upstream(format!("OpenAI {what} failed: {status} {body}")));
    }

    resp.json()
        .await
        .map_err(|e| AskError::Upstream(format!("OpenAI {what} response parse error: {e}")))
}

#[async_trait]
impl AssistantsApi for OpenAiAssistants {
    async fn create_thread(&self, message: &str) -> Result<Thread, AskError> {
        let body = CreateThreadRequest {
            messages: [InitialMessage {
                role: "user",
                content: message,
            }],
        };
        let resp = self.client.post(self.url("/threads")).json(&body).send().await?;
        decode(resp, "create thread").await
    }

    async fn create_run(&self, thread_id: &str, assistant_id: &str) -> Result<Run, AskError> {
        let resp = self
            .client
            .post(self.url(&format!("/threads/{thread_id}/runs")))
            .json(&CreateRunRequest { assistant_id })
            .send()
            .await?;
        decode(resp, "create run").await
    }

    async fn retrieve_run(&self, thread_id: &str, run_id: &str) -> Result<Run, AskError> {
        let resp = self
            .client
            .get(self.url(&format!("/threads/{thread_id}/runs/{run_id}")))
            .send()
            .await?;
        decode(resp, "retrieve run").await
    }

    async fn list_messages(&self, thread_id: &str) -> Result<Vec<ThreadMessage>, AskError> {
        let resp = self
            .client
            .get(self.url(&format!("/threads/{thread_id}/messages")))
            .send()
            .await?;
        let list: MessageList = decode(resp, "list messages").await?;
        debug!(thread_id, count = list.data.len(), "listed thread messages");
        Ok(list.data)
    }
}

#[cfg(test)]
mod tests {
    use mockito::Matcher;
    use serde_json::json;

    use super::*;
    use crate::assistants::{MessageRole, RunStatus};

    fn client_for(server: &mockito::Server) -> OpenAiAssistants {
        let config = OpenAiConfig {
            base_url: server.url(),
            ..OpenAiConfig::new("sk-test")
        };
        OpenAiAssistants::new(&config).unwrap()
    }

    #[tokio::test]
    async fn create_thread_sends_user_message_with_auth_headers() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/threads")
            .match_header("authorization", "Bearer sk-test")
            .match_header("openai-beta", "assistants=v2")
            .match_body(Matcher::Json(json!({
                "messages": [{ "role": "user", "content": "Hello" }]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id":"thread_1","object":"thread","created_at":1}"#)
            .create_async()
            .await;

        let thread = client_for(&server).create_thread("Hello").await.unwrap();

        assert_eq!(thread.id, "thread_1");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn create_run_binds_assistant() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/threads/thread_1/runs")
            .match_body(Matcher::Json(json!({ "assistant_id": "asst_XYZ" })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id":"run_1","thread_id":"thread_1","status":"queued"}"#)
            .create_async()
            .await;

        let run = client_for(&server)
            .create_run("thread_1", "asst_XYZ")
            .await
            .unwrap();

        assert_eq!(run.id, "run_1");
        assert_eq!(run.status, RunStatus::Queued);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn retrieve_run_reads_status() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/threads/thread_1/runs/run_1")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id":"run_1","thread_id":"thread_1","status":"in_progress"}"#)
            .create_async()
            .await;

        let run = client_for(&server)
            .retrieve_run("thread_1", "run_1")
            .await
            .unwrap();

        assert_eq!(run.status, RunStatus::InProgress);
    }

    #[tokio::test]
    async fn list_messages_returns_data_in_provider_order() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/threads/thread_1/messages")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "object": "list",
                    "data": [
                        { "id": "msg_2", "role": "assistant",
                          "content": [{ "type": "text", "text": { "value": "Hi there", "annotations": [] } }] },
                        { "id": "msg_1", "role": "user",
                          "content": [{ "type": "text", "text": { "value": "Hello", "annotations": [] } }] }
                    ],
                    "has_more": false
                })
                .to_string(),
            )
            .create_async()
            .await;

        let messages = client_for(&server).list_messages("thread_1").await.unwrap();

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, MessageRole::Assistant);
        assert_eq!(messages[0].text(), "Hi there");
        assert_eq!(messages[1].role, MessageRole::User);
    }

    #[tokio::test]
    async fn non_success_status_is_upstream_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/threads")
            .with_status(401)
            .with_body(r#"{"error":{"message":"Incorrect API key provided"}}"#)
            .create_async()
            .await;

        let err = client_for(&server).create_thread("Hello").await.unwrap_err();

        match err {
            AskError::Upstream(msg) => {
                assert!(msg.contains("401"), "unexpected message: {msg}");
                assert!(msg.contains("create thread"));
            }
            other => panic!("expected upstream error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_body_is_upstream_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/threads/thread_1/runs/run_1")
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let err = client_for(&server)
            .retrieve_run("thread_1", "run_1")
            .await
            .unwrap_err();

        assert!(matches!(err, AskError::Upstream(_)));
    }

    #[test]
    fn trailing_slash_in_base_url_is_ignored() {
        let config = OpenAiConfig {
            base_url: "http://localhost:9999/v1/".into(),
            ..OpenAiConfig::new("sk-test")
        };
        let client = OpenAiAssistants::new(&config).unwrap();
        assert_eq!(client.url("/threads"), "http://localhost:9999/v1/threads");
    }
}
