//! Gateway errors and their HTTP mapping
//!
//! Every failure is rendered as `{"error": "<message>"}`:
//! - missing parameters and malformed bodies: 400
//! - memory service not configured or failing: 500

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use crate::memory::MemoryError;

#[derive(Error, Debug)]
pub enum GatewayError {
    /// A required query or body parameter was absent or empty
    #[error("{0} required")]
    MissingParameter(&'static str),

    /// The request body could not be parsed
    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    /// No memory service credential is configured
    #[error("Memory service not configured")]
    NotConfigured,

    /// The memory service call failed
    #[error(transparent)]
    Upstream(#[from] MemoryError),
}

impl GatewayError {
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::MissingParameter(_) | GatewayError::InvalidBody(_) => {
                StatusCode::BAD_REQUEST
            }
            GatewayError::NotConfigured | GatewayError::Upstream(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message returned to the client; upstream API messages pass through as-is
    pub fn client_message(&self) -> String {
        match self {
            GatewayError::Upstream(MemoryError::Api { message, .. }) => message.clone(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error_message = %self, "Memory gateway request failed");
        }
        let body = serde_json::json!({ "error": self.client_message() });
        (status, Json(body)).into_response()
    }
}
