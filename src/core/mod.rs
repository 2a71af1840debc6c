//! Core batch logic.
//!
//! This module contains:
//! - Cleaner: ordered meaning-cleanup rules and overrides
//! - Embed: locating and splicing the vocabulary array in the page
//! - Patch: one-shot literal template patches
//! - Document: the page rewrite combining the three above
//! - Generator: sentence audio synthesis
//! - Uploader: archive packaging and release publishing

pub mod cleaner;
pub mod document;
pub mod embed;
pub mod generator;
pub mod patch;
pub mod uploader;

// Re-export commonly used types
pub use cleaner::{MeaningCleaner, Rule};
pub use document::{DocumentRewriter, MeaningChange, RewriteReport};
pub use embed::{locate_array, splice, EmbedError, EmbeddedSpan};
pub use generator::{GenerationSummary, GeneratorSettings};
pub use patch::{builtin_patches, LiteralPatch, PatchOutcome};
pub use uploader::{ReleaseSpec, UploadError, UploadSettings, UploadSummary};
