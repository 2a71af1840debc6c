//! Domain types for the flashcard tools.
//!
//! - Vocab: entries embedded in the flashcard page
//! - Sentence: example sentences merged across HSK levels
//! - Artifact: audio files and the archives that ship them

pub mod artifact;
pub mod sentence;
pub mod vocab;

// Re-export commonly used types
pub use artifact::{partition, ArchiveBundle, AudioArtifact};
pub use sentence::SentenceMap;
pub use vocab::VocabEntry;
