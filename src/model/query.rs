//! Research query representation and term extraction

use std::collections::HashSet;

/// Common English words that carry no signal for lexical matching
const STOP_WORDS: &[&str] = &[
    "about", "after", "all", "also", "and", "any", "are", "been", "being", "but", "can",
    "could", "did", "does", "doing", "each", "few", "for", "from", "had", "has", "have",
    "her", "here", "him", "his", "how", "into", "its", "just", "more", "most", "not",
    "now", "once", "only", "other", "our", "out", "over", "own", "same", "she", "should",
    "some", "such", "than", "that", "the", "their", "them", "then", "there", "these",
    "they", "this", "those", "through", "too", "under", "very", "was", "were", "what",
    "when", "where", "which", "while", "who", "whom", "why", "will", "with", "would",
    "you", "your",
];

/// A research query and its extracted terms
///
/// Terms are lowercased, stripped of punctuation, filtered against a stop-word
/// list, and deduplicated while preserving their first-occurrence order. The
/// query is created once at run start and never mutated.
#[derive(Debug, Clone)]
pub struct Query {
    raw: String,
    terms: Vec<String>,
}

impl Query {
    /// Tokenizes a raw query string into matchable terms
    pub fn new(raw: &str) -> Self {
        let mut seen = HashSet::new();
        let mut terms = Vec::new();

        for word in raw.split_whitespace() {
            let cleaned: String = word
                .to_lowercase()
                .chars()
                .filter(|c| c.is_alphanumeric())
                .collect();

            if cleaned.chars().count() <= 2 {
                continue;
            }
            if STOP_WORDS.contains(&cleaned.as_str()) {
                continue;
            }
            if seen.insert(cleaned.clone()) {
                terms.push(cleaned);
            }
        }

        Self {
            raw: raw.trim().to_string(),
            terms,
        }
    }

    /// The original query string as entered
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The extracted search terms, in first-occurrence order
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// Returns true if at least one term survived extraction
    pub fn has_terms(&self) -> bool {
        !self.terms.is_empty()
    }

    /// Returns true if the (already lowercased) text contains any query term
    pub fn matches(&self, lowercased_text: &str) -> bool {
        self.terms
            .iter()
            .any(|term| lowercased_text.contains(term.as_str()))
    }
}
