//! Example sentences collected across HSK levels.

use std::collections::HashSet;

use serde_json::{Map, Value};

/// Key holding the Chinese sentence in a level file record
pub const SENTENCE_KEY: &str = "zh";

/// Headword → sentence map, deduplicated by first-seen headword.
///
/// Iteration follows insertion order, so the level listed first wins and
/// words are processed in the order they appear on disk.
#[derive(Debug, Clone, Default)]
pub struct SentenceMap {
    entries: Vec<(String, String)>,
    seen: HashSet<String>,
}

impl SentenceMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a sentence unless the headword is already present.
    ///
    /// The sentence is trimmed; empty sentences are ignored so a later level
    /// can still supply one. Returns true if the entry was added.
    pub fn insert(&mut self, headword: &str, sentence: &str) -> bool {
        let sentence = sentence.trim();
        if sentence.is_empty() || self.seen.contains(headword) {
            return false;
        }
        self.seen.insert(headword.to_string());
        self.entries
            .push((headword.to_string(), sentence.to_string()));
        true
    }

    /// Merge one level file (a JSON object keyed by headword).
    ///
    /// Returns how many new headwords were added.
    pub fn merge_level(&mut self, level: &Map<String, Value>) -> usize {
        let mut added = 0;
        for (headword, record) in level {
            let sentence = record
                .get(SENTENCE_KEY)
                .and_then(Value::as_str)
                .unwrap_or_default();
            if self.insert(headword, sentence) {
                added += 1;
            }
        }
        added
    }

    pub fn get(&self, headword: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(word, _)| word == headword)
            .map(|(_, sentence)| sentence.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(word, sentence)| (word.as_str(), sentence.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
