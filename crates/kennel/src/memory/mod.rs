//! Hosted memory service client
//!
//! The gateway talks to the memory service only through the [`MemoryService`]
//! trait. [`ZepClient`] is the production implementation over the Zep Cloud v2
//! HTTP API.

mod client;
mod error;
mod service;
pub mod types;

pub use client::ZepClient;
pub use error::{MemoryError, Result};
pub use service::MemoryService;
pub use types::{
    GraphEdge, GraphSearchQuery, GraphSearchResults, Message, NewUser, Role, SearchScope,
    Thread, User, UserUpdate,
};
