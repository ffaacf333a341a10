use axum::{
    Json,
    extract::{Query, State, rejection::JsonRejection},
};
use std::sync::Arc;

use crate::server::AppState;

use super::context::fetch_context;
use super::error::GatewayError;
use super::types::{
    ContextResponse, DeleteThreadResponse, ThreadQuery, UpsertUserRequest, UpsertUserResponse,
    UserMemoryResponse, UserQuery,
};
use super::user::{delete_thread, fetch_user, required, upsert_user};

/// GET /zep-context - categorized fact context for a user
pub async fn context_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<UserQuery>,
) -> Json<ContextResponse> {
    let context = fetch_context(
        state.memory.as_deref(),
        &state.config.memory,
        query.user_id.as_deref(),
    )
    .await;
    Json(context)
}

/// GET /zep/user - profile, threads, and facts for a user
pub async fn get_user_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<UserQuery>,
) -> Result<Json<UserMemoryResponse>, GatewayError> {
    let user_id = required(query.user_id, "userId")?;
    let memory = state.memory()?;
    let response = fetch_user(memory, &state.config.memory, &user_id).await?;
    Ok(Json(response))
}

/// POST /zep/user - create or update a user, append messages and facts
pub async fn post_user_handler(
    State(state): State<Arc<AppState>>,
    body: Result<Json<UpsertUserRequest>, JsonRejection>,
) -> Result<Json<UpsertUserResponse>, GatewayError> {
    let Json(request) = body.map_err(|e| GatewayError::InvalidBody(e.body_text()))?;
    let user_id = required(request.user_id.clone(), "userId")?;
    let memory = state.memory()?;
    let response = upsert_user(memory, &user_id, request).await?;
    Ok(Json(response))
}

/// DELETE /zep/user - delete a thread
pub async fn delete_user_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ThreadQuery>,
) -> Result<Json<DeleteThreadResponse>, GatewayError> {
    let thread_id = required(query.thread_id, "threadId")?;
    let memory = state.memory()?;
    let response = delete_thread(memory, &thread_id).await?;
    Ok(Json(response))
}
