//! Wire types for the memory service API
//!
//! These mirror the JSON the service sends and accepts (snake_case). Every
//! response type is deserialized explicitly so shape mismatches fail at the
//! client boundary instead of leaking loosely-typed values downstream.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Free-form metadata object attached to users, threads, and messages
pub type Metadata = Map<String, Value>;

/// A user record owned by the memory service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub user_id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub metadata: Option<Metadata>,
}

/// Payload for creating a user
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NewUser {
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    pub metadata: Metadata,
}

/// Partial update of a user's mutable profile fields
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

impl UserUpdate {
    /// True when no field would change
    pub fn is_empty(&self) -> bool {
        self.email.is_none()
            && self.first_name.is_none()
            && self.last_name.is_none()
            && self.metadata.is_none()
    }
}

/// A conversation thread
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Thread {
    pub thread_id: String,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub metadata: Option<Metadata>,
}

/// Speaker of a message; the service accepts exactly these two
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// `"user"` maps to [`Role::User`]; anything else is the assistant
    pub fn normalize(role: &str) -> Self {
        if role == "user" { Role::User } else { Role::Assistant }
    }
}

/// A message appended to a thread
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    pub metadata: Metadata,
}

/// What a graph search returns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchScope {
    Edges,
    Nodes,
}

/// Knowledge-graph search request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphSearchQuery {
    pub user_id: String,
    pub query: String,
    pub limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<SearchScope>,
}

/// Knowledge-graph search response
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GraphSearchResults {
    #[serde(default)]
    pub edges: Vec<GraphEdge>,
}

impl GraphSearchResults {
    /// Fact strings of all edges that carry one, in result order
    pub fn facts(&self) -> Vec<String> {
        self.edges.iter().filter_map(|e| e.fact.clone()).collect()
    }
}

/// A relationship edge; `fact` is the natural-language assertion
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GraphEdge {
    #[serde(default)]
    pub uuid: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub fact: Option<String>,
}
