//! flashdeck - Maintenance tools for the HSK flashcard deck
//!
//! Three independent batch jobs that share nothing but files on disk:
//!
//! - **clean**: strips annotation noise from the HSK1 meanings inlined in
//!   the flashcard page and applies one-shot template patches
//! - **generate**: synthesizes one MP3 per example sentence with edge-tts,
//!   skipping words that already have audio
//! - **upload**: zips the MP3s into fixed-size archives and publishes them
//!   to a GitHub release with `gh`
//!
//! # Modules
//!
//! - `adapters`: External tools (edge-tts, gh)
//! - `core`: Cleanup rules, page rewrite, generation and upload
//! - `domain`: Data structures (VocabEntry, SentenceMap, artifacts)
//! - `config`: Config file discovery and defaults
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Clean the inline HSK1 meanings
//! flashdeck clean
//!
//! # Generate sentence audio (safe to interrupt and rerun)
//! flashdeck generate
//!
//! # Publish it
//! flashdeck upload
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;

// Re-export main types at crate root for convenience
pub use adapters::{ReleasePublisher, SpeechSynthesizer, VoiceSettings};
pub use config::ResolvedConfig;
pub use crate::core::{DocumentRewriter, MeaningCleaner};
pub use domain::{ArchiveBundle, AudioArtifact, SentenceMap, VocabEntry};
