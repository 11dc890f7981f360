//! Ordered keyword classifier.
//!
//! Categories are checked in declaration order and the first category with
//! any keyword occurring as a substring of the normalized text wins. The
//! order matters: "what is my" (SystemInfo) shadows Query's "what", and the
//! bare "hi" (Greeting) matches inside words such as "this" or "machine".

use jarvis_core::types::{ClassificationResult, IntentCategory};

/// Keyword table, in precedence order.
const KEYWORD_TABLE: [(IntentCategory, &[&str]); 5] = [
    (
        IntentCategory::Greeting,
        &["hello", "hi", "hey jarvis", "good morning", "good evening"],
    ),
    (
        IntentCategory::SystemInfo,
        &["what is my", "tell me", "show me", "get", "system"],
    ),
    (
        IntentCategory::FileOperation,
        &["open", "read", "write", "delete", "file"],
    ),
    (
        IntentCategory::Control,
        &["shutdown", "restart", "sleep", "lock"],
    ),
    (
        IntentCategory::Query,
        &["how", "what", "why", "when", "where"],
    ),
];

/// Lower-case and trim free text before keyword matching.
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Maps free text to an `IntentCategory`. Stateless and total.
#[derive(Debug, Default, Clone, Copy)]
pub struct IntentClassifier;

impl IntentClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Classify an utterance. Empty input normalizes to `""` and yields `Unknown`.
    pub fn classify(&self, text: &str) -> ClassificationResult {
        let normalized = normalize(text);
        let intent = self.detect_intent(&normalized);
        let entities = self.extract_entities(&normalized);
        tracing::debug!(%intent, text = %normalized, "Utterance classified");
        ClassificationResult::new(normalized, intent, entities)
    }

    /// First category (in table order) with a keyword contained in `normalized`.
    pub fn detect_intent(&self, normalized: &str) -> IntentCategory {
        KEYWORD_TABLE
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| normalized.contains(k)))
            .map(|(intent, _)| *intent)
            .unwrap_or(IntentCategory::Unknown)
    }

    /// Entity extraction hook. Returns nothing yet.
    pub fn extract_entities(&self, _normalized: &str) -> Vec<String> {
        Vec::new()
    }

    /// The keyword list for a category, or an empty slice for `Unknown`.
    pub fn keywords(intent: IntentCategory) -> &'static [&'static str] {
        KEYWORD_TABLE
            .iter()
            .find(|(i, _)| *i == intent)
            .map(|(_, k)| *k)
            .unwrap_or(&[])
    }
}
