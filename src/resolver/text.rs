//! Title normalization and similarity scoring for the fuzzy-search tier.

use std::collections::HashSet;

/// Filler words stripped from market titles before searching: articles,
/// auxiliaries, sport nouns, and connective fluff that confuse free-text
/// search more than they narrow it.
const STOP_WORDS: &[&str] = &[
    "will",
    "the",
    "a",
    "an",
    "win",
    "professional",
    "football",
    "basketball",
    "hockey",
    "baseball",
    "game",
    "against",
    "their",
    "on",
    "at",
    "by",
    "vs",
];

fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.iter().any(|stop| word.eq_ignore_ascii_case(stop))
}

/// Strip stop words and punctuation from a market title and collapse
/// whitespace, preserving the case of what remains.
///
/// `"Will the Dallas Cowboys win the professional football game against
/// the Washington Commanders on December 25, 2025?"` becomes
/// `"Dallas Cowboys Washington Commanders December 25 2025"`.
pub fn normalize_title(title: &str) -> String {
    title
        .split_whitespace()
        .map(|word| word.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|word| !word.is_empty() && !is_stop_word(word))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Lowercased word set for similarity comparison
pub fn tokenize(text: &str) -> HashSet<String> {
    text.split_whitespace()
        .map(|word| word.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|word| !word.is_empty())
        .map(|word| word.to_ascii_lowercase())
        .collect()
}

/// Jaccard similarity between two token sets, in [0, 1].
///
/// Two empty sets score 0 so that degenerate titles never pass a positive
/// acceptance floor.
pub fn jaccard_similarity(left: &HashSet<String>, right: &HashSet<String>) -> f64 {
    let intersection = left.intersection(right).count();
    let union = left.len() + right.len() - intersection;
    if union == 0 {
        return 0.0;
    }
    intersection as f64 / union as f64
}

/// Similarity between two raw titles, tokenizing both
pub fn title_similarity(left: &str, right: &str) -> f64 {
    jaccard_similarity(&tokenize(left), &tokenize(right))
}
