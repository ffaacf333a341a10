//! Agent bridge
//!
//! Relays the web client's agent protocol traffic to a single configured
//! agent process and streams the reply back.

mod error;
mod forward;
mod target;

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Method, Response},
    response::IntoResponse,
};
use std::sync::Arc;

use crate::server::AppState;

pub use error::AgentError;
pub use forward::{HOP_BY_HOP_HEADERS, end_to_end_headers, forward};
pub use target::{AgentRegistry, AgentTarget};

/// POST /copilotkit - forward to the default agent
pub async fn copilotkit_handler(
    State(state): State<Arc<AppState>>,
    method: Method,
    headers: HeaderMap,
    body: Body,
) -> Response<Body> {
    let agent = state.agents.default_agent();
    tracing::debug!(agent = %agent.name, url = %agent.url, "Forwarding agent request");

    match forward(&state.client, &agent.url, method, headers, body).await {
        Ok(response) => response,
        Err(e) => e.into_response(),
    }
}
