use axum::{
    body::Body,
    http::{Response, StatusCode},
    response::IntoResponse,
};
use thiserror::Error;
use tracing::error;

/// Errors raised while bridging to the agent process
#[derive(Error, Debug, Clone)]
pub enum AgentError {
    /// Configured agent URL is unusable
    #[error("Invalid agent URL: {0}")]
    InvalidUrl(String),

    /// Inbound request could not be read
    #[error("Request error: {0}")]
    Request(String),

    /// Connection, timeout, or other transport failure
    #[error("Agent unreachable: {0}")]
    Unreachable(String),

    /// Agent response could not be relayed
    #[error("Response error: {0}")]
    Response(String),
}

impl AgentError {
    pub fn status(&self) -> StatusCode {
        match self {
            AgentError::Request(_) => StatusCode::BAD_REQUEST,
            AgentError::InvalidUrl(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AgentError::Unreachable(_) | AgentError::Response(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// Error category reported in the response body
    pub fn category(&self) -> &'static str {
        match self {
            AgentError::InvalidUrl(_) => "invalid_agent_config",
            AgentError::Request(_) => "invalid_request",
            AgentError::Unreachable(_) => "agent_unreachable",
            AgentError::Response(_) => "agent_response_error",
        }
    }
}

impl IntoResponse for AgentError {
    fn into_response(self) -> Response<Body> {
        error!(error_type = self.category(), error_message = %self, "Agent bridge failed");

        let body = serde_json::json!({
            "error": {
                "type": self.category(),
                "message": self.to_string(),
            }
        });

        Response::builder()
            .status(self.status())
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap_or_else(|_| {
                let mut response = Response::new(Body::empty());
                *response.status_mut() = StatusCode::BAD_GATEWAY;
                response
            })
    }
}
