//! Entity buckets and the rendered context summary

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{Category, Fact};

/// Deduplicated, first-seen-ordered cleaned facts per category
///
/// Uncategorized facts are not bucketed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityBuckets {
    pub breeds: Vec<String>,
    pub names: Vec<String>,
    pub ages: Vec<String>,
    pub health: Vec<String>,
    pub insurance: Vec<String>,
}

impl EntityBuckets {
    /// Add a fact's cleaned text to its bucket unless already present
    pub fn insert(&mut self, fact: &Fact) {
        let Some(bucket) = self.bucket_mut(fact.category) else {
            return;
        };
        if !bucket.contains(&fact.clean) {
            bucket.push(fact.clean.clone());
        }
    }

    fn bucket_mut(&mut self, category: Category) -> Option<&mut Vec<String>> {
        match category {
            Category::Breed => Some(&mut self.breeds),
            Category::Name => Some(&mut self.names),
            Category::Age => Some(&mut self.ages),
            Category::Health => Some(&mut self.health),
            Category::Insurance => Some(&mut self.insurance),
            Category::Uncategorized => None,
        }
    }

    /// Buckets paired with their display labels, in render order
    pub fn labeled(&self) -> [(&'static str, &[String]); 5] {
        [
            ("Dog Breed", self.breeds.as_slice()),
            ("Dog Name", self.names.as_slice()),
            ("Dog Age", self.ages.as_slice()),
            ("Health Notes", self.health.as_slice()),
            ("Insurance Interest", self.insurance.as_slice()),
        ]
    }

    pub fn is_empty(&self) -> bool {
        self.labeled().iter().all(|(_, items)| items.is_empty())
    }

    /// Render one `Label: a, b` line per non-empty bucket, joined by newlines
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for EntityBuckets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (label, items) in self.labeled() {
            if items.is_empty() {
                continue;
            }
            if !first {
                f.write_str("\n")?;
            }
            write!(f, "{label}: {}", items.join(", "))?;
            first = false;
        }
        Ok(())
    }
}

/// Group cleaned facts into buckets
pub fn build_summary(facts: &[Fact]) -> EntityBuckets {
    let mut buckets = EntityBuckets::default();
    for fact in facts {
        buckets.insert(fact);
    }
    buckets
}
