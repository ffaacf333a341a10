//! Kennel - memory gateway and agent bridge
//!
//! Serves the backend of a conversational advisory site: per-user memory
//! backed by a hosted memory service, a categorized fact context, and a
//! streaming bridge to the agent process.

pub mod agent;
pub mod config;
pub mod error;
pub mod facts;
pub mod gateway;
pub mod memory;
pub mod server;

pub use error::KennelError;
