//! Canonical default paths and names for the flashcard repo layout.
//!
//! Single source of truth - import this instead of hardcoding paths.
//! All paths are relative to the project root.
//!
//! | Path | Used by |
//! |------|---------|
//! | `docs/flashcards.html` | clean |
//! | `docs/examples-hsk{1..6}.json` | generate |
//! | `sentence_audio/` | generate, upload |

use std::path::PathBuf;

/// Config directory searched for in the current directory and its parents
pub const CONFIG_DIR: &str = ".flashdeck";

/// Config file name inside [`CONFIG_DIR`]
pub const CONFIG_FILE: &str = "config.yaml";

/// Flashcard page holding the inline HSK1 vocabulary
pub const FLASHCARDS_HTML: &str = "docs/flashcards.html";

/// Generated sentence audio
pub const SENTENCE_AUDIO_DIR: &str = "sentence_audio";

/// Number of HSK levels with example sentence files
pub const HSK_LEVELS: u32 = 6;

/// Example sentence file for one HSK level
pub fn examples_file(level: u32) -> PathBuf {
    PathBuf::from(format!("docs/examples-hsk{}.json", level))
}

/// Example sentence files for all levels, lowest first
pub fn examples_files() -> Vec<PathBuf> {
    (1..=HSK_LEVELS).map(examples_file).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_examples_files_in_level_order() {
        let files = examples_files();
        assert_eq!(files.len(), 6);
        assert_eq!(files[0], PathBuf::from("docs/examples-hsk1.json"));
        assert_eq!(files[5], PathBuf::from("docs/examples-hsk6.json"));
    }
}
