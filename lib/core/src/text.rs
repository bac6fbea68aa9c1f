//! Fuzzy text matching for catalog search
//!
//! Scores are in range [0.0, 1.0] where 1.0 means a full match.

use std::collections::BTreeSet;

/// Token-set similarity between a query and a track's "name artists" text.
///
/// Both sides are lower-cased and split into word sets. The shared words
/// are compared against each side's full (sorted) word list with normalized
/// Levenshtein similarity, and the best of the three comparisons wins. A
/// query whose words all appear in the haystack scores 1.0 regardless of
/// order or extra haystack words.
pub fn match_score(query: &str, haystack: &str) -> f64 {
    let query_tokens = tokenize(query);
    let haystack_tokens = tokenize(haystack);
    if query_tokens.is_empty() || haystack_tokens.is_empty() {
        return 0.0;
    }

    let shared = join(query_tokens.intersection(&haystack_tokens));
    let query_only = join(query_tokens.difference(&haystack_tokens));
    let haystack_only = join(haystack_tokens.difference(&query_tokens));

    let with_query = combine(&shared, &query_only);
    let with_haystack = combine(&shared, &haystack_only);

    let mut best = strsim::normalized_levenshtein(&with_query, &with_haystack);
    if !shared.is_empty() {
        best = best
            .max(strsim::normalized_levenshtein(&shared, &with_query))
            .max(strsim::normalized_levenshtein(&shared, &with_haystack));
    }
    best
}

/// Lower-case word tokens; anything that is not alphanumeric separates words
fn tokenize(text: &str) -> BTreeSet<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn join<'a>(tokens: impl Iterator<Item = &'a String>) -> String {
    tokens.map(String::as_str).collect::<Vec<_>>().join(" ")
}

fn combine(shared: &str, rest: &str) -> String {
    match (shared.is_empty(), rest.is_empty()) {
        (true, _) => rest.to_string(),
        (_, true) => shared.to_string(),
        _ => format!("{} {}", shared, rest),
    }
}
