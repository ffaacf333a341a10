//! Zep Cloud v2 client
//!
//! Implements [`MemoryService`] over HTTP. Authentication uses the
//! `Authorization: Api-Key <key>` header; the key is read from the environment
//! variable named in [`MemoryConfig::api_key_env`].

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::env;
use std::time::Duration;
use tracing::{debug, info};

use crate::config::MemoryConfig;

use super::MemoryService;
use super::error::{MemoryError, Result};
use super::types::{
    GraphSearchQuery, GraphSearchResults, Message, NewUser, Thread, User, UserUpdate,
};

const API_PREFIX: &str = "api/v2";

/// HTTP client for the hosted memory service
#[derive(Debug, Clone)]
pub struct ZepClient {
    client: Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Serialize)]
struct CreateThreadRequest<'a> {
    thread_id: &'a str,
    user_id: &'a str,
}

#[derive(Debug, Serialize)]
struct AddMessagesRequest<'a> {
    messages: &'a [Message],
}

#[derive(Debug, Serialize)]
struct AddGraphDataRequest<'a> {
    user_id: &'a str,
    #[serde(rename = "type")]
    data_type: &'static str,
    data: &'a str,
}

impl ZepClient {
    /// Build a client from configuration, reading the API key from the environment
    ///
    /// Fails with [`MemoryError::Config`] when the key variable is unset or empty.
    pub fn from_config(config: &MemoryConfig) -> Result<Self> {
        let api_key = env::var(&config.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                MemoryError::Config(format!("API key env var '{}' not set", config.api_key_env))
            })?;

        let client = Self::new(&config.base_url, api_key, config.timeout_secs)?;
        info!("Memory service client initialized for {}", client.base_url);
        Ok(client)
    }

    /// Build a client with an explicit key
    pub fn new(base_url: &str, api_key: impl Into<String>, timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| MemoryError::Config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    /// Absolute URL for an API path; each segment is percent-encoded
    fn endpoint(&self, segments: &[&str]) -> String {
        let mut url = format!("{}/{}", self.base_url, API_PREFIX);
        for segment in segments {
            url.push('/');
            url.push_str(&urlencoding::encode(segment));
        }
        url
    }

    /// Attach credentials, send, and map non-success statuses to errors
    async fn send(&self, request: RequestBuilder, resource: &str) -> Result<Response> {
        let response = request
            .header("Authorization", format!("Api-Key {}", self.api_key))
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            debug!("Memory service reports {resource} not found");
            return Err(MemoryError::NotFound(resource.to_string()));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MemoryError::Api {
                status: status.as_u16(),
                message: error_message(&body, status),
            });
        }

        Ok(response)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        resource: &str,
    ) -> Result<T> {
        let response = self.send(request, resource).await?;
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes)
            .map_err(|e| MemoryError::Parse(format!("Unexpected {resource} response: {e}")))
    }
}

/// Pull a human-readable message out of an error body
fn error_message(body: &str, status: StatusCode) -> String {
    let from_json = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(String::from));

    match from_json {
        Some(message) => message,
        None if !body.trim().is_empty() => body.trim().to_string(),
        None => status
            .canonical_reason()
            .unwrap_or("Unknown error")
            .to_string(),
    }
}

#[async_trait]
impl MemoryService for ZepClient {
    async fn get_user(&self, user_id: &str) -> Result<User> {
        let request = self.client.get(self.endpoint(&["users", user_id]));
        self.send_json(request, &format!("user {user_id}")).await
    }

    async fn add_user(&self, user: &NewUser) -> Result<()> {
        let request = self.client.post(self.endpoint(&["users"])).json(user);
        self.send(request, &format!("user {}", user.user_id)).await?;
        Ok(())
    }

    async fn update_user(&self, user_id: &str, update: &UserUpdate) -> Result<()> {
        let request = self
            .client
            .patch(self.endpoint(&["users", user_id]))
            .json(update);
        self.send(request, &format!("user {user_id}")).await?;
        Ok(())
    }

    async fn get_user_threads(&self, user_id: &str) -> Result<Vec<Thread>> {
        let request = self.client.get(self.endpoint(&["users", user_id, "threads"]));
        self.send_json(request, &format!("threads of user {user_id}"))
            .await
    }

    async fn get_thread(&self, thread_id: &str) -> Result<()> {
        let request = self.client.get(self.endpoint(&["threads", thread_id]));
        self.send(request, &format!("thread {thread_id}")).await?;
        Ok(())
    }

    async fn create_thread(&self, thread_id: &str, user_id: &str) -> Result<()> {
        let body = CreateThreadRequest { thread_id, user_id };
        let request = self.client.post(self.endpoint(&["threads"])).json(&body);
        self.send(request, &format!("thread {thread_id}")).await?;
        Ok(())
    }

    async fn add_messages(&self, thread_id: &str, messages: &[Message]) -> Result<()> {
        let body = AddMessagesRequest { messages };
        let request = self
            .client
            .post(self.endpoint(&["threads", thread_id, "messages"]))
            .json(&body);
        self.send(request, &format!("thread {thread_id}")).await?;
        Ok(())
    }

    async fn delete_thread(&self, thread_id: &str) -> Result<()> {
        let request = self.client.delete(self.endpoint(&["threads", thread_id]));
        self.send(request, &format!("thread {thread_id}")).await?;
        Ok(())
    }

    async fn search_graph(&self, query: &GraphSearchQuery) -> Result<GraphSearchResults> {
        let request = self
            .client
            .post(self.endpoint(&["graph", "search"]))
            .json(query);
        self.send_json(request, &format!("graph of user {}", query.user_id))
            .await
    }

    async fn add_graph_data(&self, user_id: &str, data: &str) -> Result<()> {
        let body = AddGraphDataRequest {
            user_id,
            data_type: "text",
            data,
        };
        let request = self.client.post(self.endpoint(&["graph"])).json(&body);
        self.send(request, &format!("graph of user {user_id}")).await?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "zep"
    }
}
