//! Memory gateway
//!
//! Maps the web client's user / thread / fact requests onto the hosted memory
//! service and normalizes results into a uniform JSON envelope:
//! - missing parameters are client errors (400)
//! - unknown users are reported as new, not as errors
//! - memory service failures are server errors (500)
//! - appending facts is best-effort and never fails the request

mod context;
mod error;
pub mod handlers;
mod types;
mod user;

pub use context::{fetch_context, profile_context};
pub use error::GatewayError;
pub use types::{
    ContextResponse, DeleteThreadResponse, IncomingMessage, ThreadQuery, ThreadSummary,
    UpsertUserRequest, UpsertUserResponse, UserMemoryResponse, UserProfile, UserQuery,
};
pub use user::{delete_thread, fetch_user, required, upsert_user};
