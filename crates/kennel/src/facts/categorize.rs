//! Keyword-driven fact categorization
//!
//! Categories are assigned by case-insensitive substring matching against an
//! ordered rule table. The first rule with a matching keyword wins; facts that
//! match nothing fall back to [`Category::Uncategorized`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification assigned to a fact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "dog_breed")]
    Breed,
    #[serde(rename = "dog_name")]
    Name,
    #[serde(rename = "dog_age")]
    Age,
    #[serde(rename = "health")]
    Health,
    #[serde(rename = "insurance")]
    Insurance,
    #[serde(rename = "fact")]
    Uncategorized,
}

impl Category {
    /// Wire name used in API responses
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Breed => "dog_breed",
            Category::Name => "dog_name",
            Category::Age => "dog_age",
            Category::Health => "health",
            Category::Insurance => "insurance",
            Category::Uncategorized => "fact",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A category together with the lowercase keywords that select it
#[derive(Debug, Clone, Copy)]
pub struct CategoryRule {
    pub category: Category,
    pub keywords: &'static [&'static str],
}

/// Rules in priority order. Keywords must be lowercase.
pub const CATEGORY_RULES: &[CategoryRule] = &[
    CategoryRule {
        category: Category::Breed,
        keywords: &[
            "labrador",
            "retriever",
            "bulldog",
            "poodle",
            "shepherd",
            "beagle",
            "boxer",
            "terrier",
            "spaniel",
            "husky",
            "breed",
            "mixed breed",
        ],
    },
    CategoryRule {
        category: Category::Name,
        keywords: &["named", "dog's name", "called", "puppy named", "dog is"],
    },
    CategoryRule {
        category: Category::Age,
        keywords: &[
            "year old",
            "years old",
            "months old",
            "puppy",
            "senior",
            "age",
        ],
    },
    CategoryRule {
        category: Category::Health,
        keywords: &[
            "health",
            "condition",
            "hip",
            "dysplasia",
            "allergy",
            "breathing",
            "heart",
            "surgery",
            "vet",
        ],
    },
    CategoryRule {
        category: Category::Insurance,
        keywords: &[
            "plan",
            "coverage",
            "premium",
            "quote",
            "basic",
            "standard",
            "comprehensive",
            "deductible",
        ],
    },
];

/// Categorize a fact against [`CATEGORY_RULES`]
pub fn categorize(fact: &str) -> Category {
    categorize_with(fact, CATEGORY_RULES)
}

/// Categorize a fact against an arbitrary ordered rule table
pub fn categorize_with(fact: &str, rules: &[CategoryRule]) -> Category {
    let lower = fact.to_lowercase();
    rules
        .iter()
        .find(|rule| rule.keywords.iter().any(|k| lower.contains(k)))
        .map(|rule| rule.category)
        .unwrap_or(Category::Uncategorized)
}
