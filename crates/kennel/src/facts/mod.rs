//! Fact extraction pipeline
//!
//! Turns raw knowledge-graph facts about a user ("The user's dog is named
//! Biscuit") into categorized, cleaned entries and a compact summary that can
//! seed an agent conversation.

mod categorize;
mod clean;
mod summary;

pub use categorize::{CATEGORY_RULES, Category, CategoryRule, categorize, categorize_with};
pub use clean::{SUBJECT_PREFIXES, VERB_PREFIXES, clean_fact};
pub use summary::{EntityBuckets, build_summary};

use serde::{Deserialize, Serialize};

/// A single fact with its derived category and display text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fact {
    /// Raw text as returned by the knowledge graph
    pub fact: String,
    /// Category assigned by [`categorize`]
    #[serde(rename = "type")]
    pub category: Category,
    /// Text with leading subject and verb phrases removed
    pub clean: String,
}

impl Fact {
    /// Categorize and clean a raw fact
    pub fn new(raw: impl Into<String>) -> Self {
        let fact = raw.into();
        let category = categorize(&fact);
        let clean = clean_fact(&fact);
        Self {
            fact,
            category,
            clean,
        }
    }
}

/// Categorize every raw fact, preserving input order
pub fn extract_facts<I, S>(raw: I) -> Vec<Fact>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    raw.into_iter().map(Fact::new).collect()
}
