//! Request and response envelopes exchanged with the web client (camelCase)

use serde::{Deserialize, Serialize};

use crate::facts::{EntityBuckets, Fact};
use crate::memory::types::{Metadata, Thread, User};

/// `?userId=` query
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserQuery {
    pub user_id: Option<String>,
}

/// `?threadId=` query
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadQuery {
    pub thread_id: Option<String>,
}

/// Profile fields mirrored from the memory service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            user_id: user.user_id,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            metadata: user.metadata,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadSummary {
    pub thread_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

impl From<Thread> for ThreadSummary {
    fn from(thread: Thread) -> Self {
        Self {
            thread_id: thread.thread_id,
            created_at: thread.created_at,
            metadata: thread.metadata,
        }
    }
}

/// Response of `GET /zep/user`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserMemoryResponse {
    pub user_id: String,
    pub is_new: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<UserProfile>,
    pub facts: Vec<String>,
    pub threads: Vec<ThreadSummary>,
    /// Profile context for seeding the agent; omitted when empty
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub context: String,
}

impl UserMemoryResponse {
    /// Result for a user the memory service does not know yet
    pub fn new_user(user_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            is_new: true,
            user: None,
            facts: Vec::new(),
            threads: Vec::new(),
            context: String::new(),
        }
    }
}

/// A message as sent by the web client; the role is normalized later
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IncomingMessage {
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub metadata: Option<Metadata>,
}

/// Body of `POST /zep/user`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertUserRequest {
    pub user_id: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub metadata: Option<Metadata>,
    pub thread_id: Option<String>,
    pub messages: Option<Vec<IncomingMessage>>,
    pub facts: Option<Vec<String>>,
}

/// Response of `POST /zep/user`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertUserResponse {
    pub success: bool,
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<String>,
    /// Whether supplied facts reached the knowledge graph; absent when none were supplied
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facts_persisted: Option<bool>,
}

/// Response of `DELETE /zep/user`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteThreadResponse {
    pub success: bool,
}

/// Response of `GET /zep-context`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContextResponse {
    pub context: String,
    pub facts: Vec<Fact>,
    pub entities: EntityBuckets,
}

impl ContextResponse {
    /// All-empty shape returned whenever context is unavailable
    pub fn empty() -> Self {
        Self::default()
    }
}
