//! HTTP server
//!
//! Hosts the memory gateway and the agent bridge on one axum router.

use axum::{
    Json, Router,
    http::{HeaderValue, Method},
    routing::{get, post},
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::agent::{AgentRegistry, copilotkit_handler};
use crate::config::Config;
use crate::error::{KennelError, Result};
use crate::gateway::{GatewayError, handlers};
use crate::memory::{MemoryService, ZepClient};

/// Shared application state for all handlers
///
/// Immutable after startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// HTTP client for agent requests
    pub client: reqwest::Client,
    /// Hosted memory service, absent when no credential is configured
    pub memory: Option<Arc<dyn MemoryService>>,
    /// Agent routing table
    pub agents: AgentRegistry,
}

impl AppState {
    /// The configured memory service
    pub fn memory(&self) -> std::result::Result<&dyn MemoryService, GatewayError> {
        self.memory.as_deref().ok_or(GatewayError::NotConfigured)
    }
}

/// The gateway server
pub struct Server {
    config: Config,
    memory: Option<Arc<dyn MemoryService>>,
}

impl Server {
    /// Create a server, connecting the memory service from configuration
    ///
    /// A missing credential is not fatal: memory routes degrade instead.
    pub fn new(config: Config) -> Self {
        let memory = match ZepClient::from_config(&config.memory) {
            Ok(client) => Some(Arc::new(client) as Arc<dyn MemoryService>),
            Err(e) => {
                tracing::warn!("Memory service disabled: {e}");
                None
            }
        };
        Self::with_memory(config, memory)
    }

    /// Create a server with an explicit memory service
    pub fn with_memory(config: Config, memory: Option<Arc<dyn MemoryService>>) -> Self {
        Self { config, memory }
    }

    /// Build the shared state for the router
    pub fn state(&self) -> Result<Arc<AppState>> {
        // No total deadline: agent event streams may run indefinitely
        let idle = Duration::from_secs(self.config.server.timeout_secs);
        let client = reqwest::Client::builder()
            .connect_timeout(idle)
            .read_timeout(idle)
            .build()
            .map_err(|e| KennelError::Server(format!("Failed to create HTTP client: {e}")))?;

        let agents = AgentRegistry::from_config(&self.config.agent)
            .map_err(|e| KennelError::Agent(e.to_string()))?;

        Ok(Arc::new(AppState {
            config: self.config.clone(),
            client,
            memory: self.memory.clone(),
            agents,
        }))
    }

    /// Start the server and listen for requests
    pub async fn serve(&self) -> Result<()> {
        let state = self.state()?;

        let addr: SocketAddr = self
            .config
            .server
            .listen_addr
            .parse()
            .map_err(|e| KennelError::Config(format!("Invalid listen address: {e}")))?;

        tracing::info!("Starting kennel on {addr}");
        match &state.memory {
            Some(memory) => tracing::info!("Memory service: {}", memory.name()),
            None => tracing::info!("Memory service: not configured"),
        }
        let agent = state.agents.default_agent();
        tracing::info!("Agent '{}' at {}", agent.name, agent.url);

        let app = create_router(state);

        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| KennelError::Server(format!("Failed to bind to {addr}: {e}")))?;

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| KennelError::Server(format!("Server error: {e}")))?;

        tracing::info!("Server shut down gracefully");
        Ok(())
    }
}

/// Create the router with all routes configured
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = build_cors(&state.config.server.allowed_origins);

    Router::new()
        .route("/health", get(health_handler))
        .route("/zep-context", get(handlers::context_handler))
        .route(
            "/zep/user",
            get(handlers::get_user_handler)
                .post(handlers::post_user_handler)
                .delete(handlers::delete_user_handler),
        )
        .route("/copilotkit", post(copilotkit_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

fn build_cors(origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers(Any);

    if origins.is_empty() {
        cors.allow_origin(Any)
    } else {
        let parsed: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|o| match o.parse() {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!("Ignoring invalid CORS origin '{o}'");
                    None
                }
            })
            .collect();
        cors.allow_origin(parsed)
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn create_test_state() -> Arc<AppState> {
        Server::with_memory(Config::default(), None).state().unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_check() {
        let app = create_router(create_test_state());

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_user_without_memory_service() {
        let app = create_router(create_test_state());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/zep/user?userId=u1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await["error"],
            "Memory service not configured"
        );
    }

    #[tokio::test]
    async fn test_missing_user_id_checked_first() {
        let app = create_router(create_test_state());

        let response = app
            .oneshot(Request::builder().uri("/zep/user").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "userId required");
    }

    #[tokio::test]
    async fn test_context_without_memory_service_is_empty() {
        let app = create_router(create_test_state());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/zep-context?userId=u1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["context"], "");
        assert_eq!(json["facts"], serde_json::json!([]));
        assert_eq!(json["entities"]["breeds"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_unknown_route_not_found() {
        let app = create_router(create_test_state());

        let response = app
            .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_state_rejects_bad_agent_url() {
        let mut config = Config::default();
        config.agent.url = "ftp://agent.example.com".to_string();

        let result = Server::with_memory(config, None).state();
        assert!(matches!(result, Err(KennelError::Agent(_))));
    }

    #[test]
    fn test_build_cors_accepts_origins() {
        let _ = build_cors(&[]);
        let _ = build_cors(&["https://example.com".to_string(), "\n".to_string()]);
    }
}
