//! User, thread, and fact operations against the memory service

use tracing::{debug, info, warn};

use crate::config::MemoryConfig;
use crate::memory::{
    GraphSearchQuery, MemoryService, Message, NewUser, Role, UserUpdate,
};

use super::context::profile_context;
use super::error::GatewayError;
use super::types::{
    DeleteThreadResponse, IncomingMessage, ThreadSummary, UpsertUserRequest, UpsertUserResponse,
    UserMemoryResponse, UserProfile,
};

/// Return the parameter if present and non-empty
pub fn required(value: Option<String>, name: &'static str) -> Result<String, GatewayError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or(GatewayError::MissingParameter(name))
}

/// Load a user's profile, threads, and known facts
///
/// An unknown user is reported as new rather than as an error. Threads and
/// facts are best-effort: their failures are logged and yield empty lists.
pub async fn fetch_user(
    memory: &dyn MemoryService,
    config: &MemoryConfig,
    user_id: &str,
) -> Result<UserMemoryResponse, GatewayError> {
    let user = match memory.get_user(user_id).await {
        Ok(user) => user,
        Err(e) if e.is_not_found() => {
            debug!(user_id, "User not found, reporting as new");
            return Ok(UserMemoryResponse::new_user(user_id));
        }
        Err(e) => return Err(e.into()),
    };

    let threads = match memory.get_user_threads(user_id).await {
        Ok(threads) => threads.into_iter().map(ThreadSummary::from).collect(),
        Err(e) => {
            warn!(user_id, error = %e, "Failed to list threads");
            Vec::new()
        }
    };

    let query = GraphSearchQuery {
        user_id: user_id.to_string(),
        query: config.profile_query.clone(),
        limit: config.profile_limit,
        scope: None,
    };
    let facts = match memory.search_graph(&query).await {
        Ok(results) => results.facts(),
        Err(e) => {
            warn!(user_id, error = %e, "Graph search unavailable");
            Vec::new()
        }
    };

    let profile = UserProfile::from(user);
    let context = profile_context(Some(&profile), &facts);

    Ok(UserMemoryResponse {
        user_id: user_id.to_string(),
        is_new: false,
        user: Some(profile),
        facts,
        threads,
        context,
    })
}

/// Create or update a user, then append messages and facts if supplied
///
/// Appending facts is best-effort: a failure is logged and reported through
/// `factsPersisted: false` without failing the request.
pub async fn upsert_user(
    memory: &dyn MemoryService,
    user_id: &str,
    request: UpsertUserRequest,
) -> Result<UpsertUserResponse, GatewayError> {
    let UpsertUserRequest {
        email,
        first_name,
        last_name,
        metadata,
        thread_id,
        messages,
        facts,
        ..
    } = request;

    let update = UserUpdate {
        email,
        first_name,
        last_name,
        metadata,
    };
    save_profile(memory, user_id, update).await?;

    let messages = messages.unwrap_or_default();
    if let Some(thread_id) = thread_id.as_deref().filter(|t| !t.is_empty()) {
        if !messages.is_empty() {
            append_messages(memory, user_id, thread_id, &messages).await?;
        }
    }

    let facts = facts.unwrap_or_default();
    let facts_persisted = if facts.is_empty() {
        None
    } else {
        Some(append_facts(memory, user_id, &facts).await)
    };

    Ok(UpsertUserResponse {
        success: true,
        user_id: user_id.to_string(),
        thread_id,
        facts_persisted,
    })
}

async fn save_profile(
    memory: &dyn MemoryService,
    user_id: &str,
    update: UserUpdate,
) -> Result<(), GatewayError> {
    match memory.get_user(user_id).await {
        Ok(_) => {
            if !update.is_empty() {
                memory.update_user(user_id, &update).await?;
                debug!(user_id, "Updated user profile");
            }
            Ok(())
        }
        Err(e) if e.is_not_found() => {
            let new_user = NewUser {
                user_id: user_id.to_string(),
                email: update.email,
                first_name: update.first_name,
                last_name: update.last_name,
                metadata: update.metadata.unwrap_or_default(),
            };
            memory.add_user(&new_user).await?;
            info!(user_id, "Created user");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

async fn append_messages(
    memory: &dyn MemoryService,
    user_id: &str,
    thread_id: &str,
    messages: &[IncomingMessage],
) -> Result<(), GatewayError> {
    match memory.get_thread(thread_id).await {
        Ok(()) => {}
        Err(e) if e.is_not_found() => {
            memory.create_thread(thread_id, user_id).await?;
            info!(user_id, thread_id, "Created thread");
        }
        Err(e) => {
            // The append below reports any real failure
            warn!(thread_id, error = %e, "Thread lookup failed, appending anyway");
        }
    }

    let messages: Vec<Message> = messages.iter().map(normalize_message).collect();
    memory.add_messages(thread_id, &messages).await?;
    debug!(thread_id, count = messages.len(), "Appended messages");
    Ok(())
}

fn normalize_message(message: &IncomingMessage) -> Message {
    Message {
        role: Role::normalize(&message.role),
        content: message.content.clone(),
        metadata: message.metadata.clone().unwrap_or_default(),
    }
}

async fn append_facts(memory: &dyn MemoryService, user_id: &str, facts: &[String]) -> bool {
    match memory.add_graph_data(user_id, &facts.join("\n")).await {
        Ok(()) => {
            debug!(user_id, count = facts.len(), "Added facts to graph");
            true
        }
        Err(e) => {
            warn!(user_id, error = %e, "Graph add not available, facts not persisted");
            false
        }
    }
}

/// Delete a thread
pub async fn delete_thread(
    memory: &dyn MemoryService,
    thread_id: &str,
) -> Result<DeleteThreadResponse, GatewayError> {
    memory.delete_thread(thread_id).await?;
    info!(thread_id, "Deleted thread");
    Ok(DeleteThreadResponse { success: true })
}
