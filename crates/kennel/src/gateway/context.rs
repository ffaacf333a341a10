//! Context strings used to seed agent conversations

use serde_json::Value;
use tracing::{debug, warn};

use crate::config::MemoryConfig;
use crate::facts::{build_summary, extract_facts};
use crate::memory::{GraphSearchQuery, MemoryService, SearchScope};

use super::types::{ContextResponse, UserProfile};

/// Maximum number of known facts included in a profile context
const PROFILE_CONTEXT_FACTS: usize = 10;

/// Build the categorized fact context for a user
///
/// Never fails: a missing id, an unconfigured memory service, or any search
/// failure yields [`ContextResponse::empty`].
pub async fn fetch_context(
    memory: Option<&dyn MemoryService>,
    config: &MemoryConfig,
    user_id: Option<&str>,
) -> ContextResponse {
    let (Some(memory), Some(user_id)) = (memory, user_id.filter(|id| !id.trim().is_empty()))
    else {
        return ContextResponse::empty();
    };

    let query = GraphSearchQuery {
        user_id: format!("{}{}", config.context_user_prefix, user_id),
        query: config.context_query.clone(),
        limit: config.context_limit,
        scope: Some(SearchScope::Edges),
    };

    let results = match memory.search_graph(&query).await {
        Ok(results) => results,
        Err(e) => {
            warn!(user_id, error = %e, "Graph search failed");
            return ContextResponse::empty();
        }
    };

    let facts = extract_facts(results.facts());
    let entities = build_summary(&facts);
    debug!(user_id, facts = facts.len(), "Built fact context");

    ContextResponse {
        context: entities.render(),
        facts,
        entities,
    }
}

/// Summarize a profile and its known facts as newline-separated lines
///
/// Recognized metadata keys: `persona`, `budget`, `priorities`, and
/// `interestedDestinations`. Empty values are skipped.
pub fn profile_context(user: Option<&UserProfile>, facts: &[String]) -> String {
    let mut parts = Vec::new();

    if let Some(user) = user {
        if let Some(first) = non_empty(user.first_name.as_deref()) {
            match non_empty(user.last_name.as_deref()) {
                Some(last) => parts.push(format!("User Name: {first} {last}")),
                None => parts.push(format!("User Name: {first}")),
            }
        }
        if let Some(email) = non_empty(user.email.as_deref()) {
            parts.push(format!("Email: {email}"));
        }
        if let Some(meta) = &user.metadata {
            let fields = [
                ("persona", "Persona"),
                ("budget", "Budget"),
                ("priorities", "Priorities"),
                ("interestedDestinations", "Interested In"),
            ];
            for (key, label) in fields {
                if let Some(value) = meta.get(key).and_then(display_value) {
                    parts.push(format!("{label}: {value}"));
                }
            }
        }
    }

    if !facts.is_empty() {
        let known: Vec<&str> = facts
            .iter()
            .take(PROFILE_CONTEXT_FACTS)
            .map(String::as_str)
            .collect();
        parts.push(format!("Known Facts: {}", known.join("; ")));
    }

    parts.join("\n")
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Render a metadata value; arrays are joined with ", "
fn display_value(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::Array(items) => {
            let rendered: Vec<String> = items.iter().filter_map(display_value).collect();
            Some(rendered.join(", "))
        }
        other => Some(other.to_string()),
    }
}
