//! Display cleanup for facts

/// Leading subject phrases removed from facts. Lowercase, trailing space included.
pub const SUBJECT_PREFIXES: &[&str] = &[
    "the user's ",
    "the user ",
    "user ",
    "they ",
    "he ",
    "she ",
    "their dog ",
];

/// Leading auxiliary-verb phrases removed after the subject.
pub const VERB_PREFIXES: &[&str] = &["is ", "are ", "has ", "have ", "wants ", "prefers "];

/// Strip leading subject and verb phrases and trim whitespace.
///
/// Matching is case-insensitive and anchored at the start. Stripping repeats
/// until no prefix applies, so `clean_fact(clean_fact(s)) == clean_fact(s)`.
pub fn clean_fact(fact: &str) -> String {
    let mut rest = fact.trim_start();
    while let Some(stripped) =
        strip_any(rest, SUBJECT_PREFIXES).or_else(|| strip_any(rest, VERB_PREFIXES))
    {
        rest = stripped.trim_start();
    }
    rest.trim_end().to_string()
}

fn strip_any<'a>(text: &'a str, prefixes: &[&str]) -> Option<&'a str> {
    prefixes.iter().find_map(|prefix| strip_prefix_ignore_case(text, prefix))
}

fn strip_prefix_ignore_case<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let head = text.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        text.get(prefix.len()..)
    } else {
        None
    }
}
