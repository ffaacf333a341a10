use serde::Deserialize;
use std::path::Path;

use crate::error::{KennelError, Result};

/// Environment variable overriding [`AgentConfig::url`]
pub const AGENT_URL_ENV: &str = "AGENT_URL";

/// Environment variable overriding [`ServerConfig::listen_addr`]
pub const LISTEN_ADDR_ENV: &str = "KENNEL_LISTEN_ADDR";

/// Main configuration structure for Kennel
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Hosted memory service configuration
    #[serde(default)]
    pub memory: MemoryConfig,
    /// External agent process configuration
    #[serde(default)]
    pub agent: AgentConfig,
}

impl Config {
    /// Read and parse a TOML config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            KennelError::Config(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        toml::from_str(&content)
            .map_err(|e| KennelError::Config(format!("Failed to parse config: {e}")))
    }

    /// Apply overrides from the process environment
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary lookup; empty values are ignored
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = lookup(AGENT_URL_ENV) {
            tracing::debug!("Agent URL overridden from {AGENT_URL_ENV}");
            self.agent.url = url;
        }
        if let Some(addr) = lookup(LISTEN_ADDR_ENV) {
            tracing::debug!("Listen address overridden from {LISTEN_ADDR_ENV}");
            self.server.listen_addr = addr;
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Address to listen on (e.g., "127.0.0.1:8787")
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
    /// Agent connect and idle-read timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Origins allowed by CORS (empty = any)
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            timeout_secs: default_timeout_secs(),
            allowed_origins: Vec::new(),
        }
    }
}

fn default_listen_addr() -> String {
    "127.0.0.1:8787".to_string()
}

fn default_timeout_secs() -> u64 {
    300
}

/// Hosted memory service configuration
#[derive(Debug, Clone, Deserialize)]
pub struct MemoryConfig {
    /// API base URL
    #[serde(default = "default_memory_base_url")]
    pub base_url: String,
    /// Environment variable name for the API key
    #[serde(default = "default_memory_api_key_env")]
    pub api_key_env: String,
    /// Request timeout in seconds
    #[serde(default = "default_memory_timeout_secs")]
    pub timeout_secs: u64,
    /// Namespace prepended to user ids for the context endpoint
    #[serde(default = "default_context_user_prefix")]
    pub context_user_prefix: String,
    /// Graph query used to build the fact context
    #[serde(default = "default_context_query")]
    pub context_query: String,
    /// Maximum edges fetched for the fact context
    #[serde(default = "default_context_limit")]
    pub context_limit: u32,
    /// Graph query used when fetching a user's profile
    #[serde(default = "default_profile_query")]
    pub profile_query: String,
    /// Maximum facts returned with a user's profile
    #[serde(default = "default_profile_limit")]
    pub profile_limit: u32,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            base_url: default_memory_base_url(),
            api_key_env: default_memory_api_key_env(),
            timeout_secs: default_memory_timeout_secs(),
            context_user_prefix: default_context_user_prefix(),
            context_query: default_context_query(),
            context_limit: default_context_limit(),
            profile_query: default_profile_query(),
            profile_limit: default_profile_limit(),
        }
    }
}

fn default_memory_base_url() -> String {
    "https://api.getzep.com".to_string()
}

fn default_memory_api_key_env() -> String {
    "ZEP_API_KEY".to_string()
}

fn default_memory_timeout_secs() -> u64 {
    30
}

fn default_context_user_prefix() -> String {
    "puppyinsurance_".to_string()
}

fn default_context_query() -> String {
    "dog breed name age health insurance plan coverage preferences".to_string()
}

fn default_context_limit() -> u32 {
    15
}

fn default_profile_query() -> String {
    "user interests preferences relocation destinations budget".to_string()
}

fn default_profile_limit() -> u32 {
    20
}

/// External agent process configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AgentConfig {
    /// Name the agent is registered under
    #[serde(default = "default_agent_name")]
    pub name: String,
    /// Base URL of the agent process (AG-UI served at its root)
    #[serde(default = "default_agent_url")]
    pub url: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            url: default_agent_url(),
        }
    }
}

fn default_agent_name() -> String {
    "atlas".to_string()
}

fn default_agent_url() -> String {
    "https://relocation-quest-v3-agent-production.up.railway.app".to_string()
}
