//! Vocabulary entries embedded in the flashcard page.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Key holding the headword (simplified characters)
pub const HEADWORD_KEY: &str = "s";

/// Key holding the English meaning
pub const MEANING_KEY: &str = "m";

/// A single vocabulary entry.
///
/// Entries are kept as raw JSON objects so that keys this tool does not
/// know about survive a rewrite untouched and in their original order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VocabEntry(Map<String, Value>);

impl VocabEntry {
    /// Build an entry from a headword and meaning
    pub fn new(headword: impl Into<String>, meaning: impl Into<String>) -> Self {
        let mut map = Map::new();
        map.insert(HEADWORD_KEY.to_string(), Value::String(headword.into()));
        map.insert(MEANING_KEY.to_string(), Value::String(meaning.into()));
        Self(map)
    }

    /// The headword, or an empty string if the entry has none
    pub fn headword(&self) -> &str {
        self.0
            .get(HEADWORD_KEY)
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    /// The meaning; absent or non-string meanings read as empty
    pub fn meaning(&self) -> &str {
        self.0
            .get(MEANING_KEY)
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    /// Replace the meaning, keeping the key in place if it already exists
    pub fn set_meaning(&mut self, meaning: impl Into<String>) {
        self.0
            .insert(MEANING_KEY.to_string(), Value::String(meaning.into()));
    }

    /// Access a field that is not modelled explicitly
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }
}

/// Parse the embedded JSON array of entries
pub fn parse_entries(json: &str) -> serde_json::Result<Vec<VocabEntry>> {
    serde_json::from_str(json)
}

/// Serialize entries back to compact JSON (no spaces, literal non-ASCII)
pub fn serialize_entries(entries: &[VocabEntry]) -> serde_json::Result<String> {
    serde_json::to_string(entries)
}
