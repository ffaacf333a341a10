//! Memory service trait
//!
//! Abstracts the hosted user / thread / graph API so request handlers receive
//! an injected implementation rather than reaching for a global client.

use async_trait::async_trait;

use super::error::Result;
use super::types::{GraphSearchQuery, GraphSearchResults, Message, NewUser, Thread, User, UserUpdate};

/// Operations the gateway needs from the hosted memory service
///
/// Implementations report a missing user or thread as
/// [`MemoryError::NotFound`](super::MemoryError::NotFound).
#[async_trait]
pub trait MemoryService: Send + Sync {
    /// Fetch a user by id
    async fn get_user(&self, user_id: &str) -> Result<User>;

    /// Create a user
    async fn add_user(&self, user: &NewUser) -> Result<()>;

    /// Update a user's profile fields
    async fn update_user(&self, user_id: &str, update: &UserUpdate) -> Result<()>;

    /// List a user's threads
    async fn get_user_threads(&self, user_id: &str) -> Result<Vec<Thread>>;

    /// Succeeds when the thread exists
    async fn get_thread(&self, thread_id: &str) -> Result<()>;

    /// Create a thread owned by a user
    async fn create_thread(&self, thread_id: &str, user_id: &str) -> Result<()>;

    /// Append messages to a thread
    async fn add_messages(&self, thread_id: &str, messages: &[Message]) -> Result<()>;

    /// Delete a thread
    async fn delete_thread(&self, thread_id: &str) -> Result<()>;

    /// Search a user's knowledge graph
    async fn search_graph(&self, query: &GraphSearchQuery) -> Result<GraphSearchResults>;

    /// Add a text blob to a user's knowledge graph
    async fn add_graph_data(&self, user_id: &str, data: &str) -> Result<()>;

    /// Provider name for logging
    fn name(&self) -> &'static str;
}
