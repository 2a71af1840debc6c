//! Adapter interfaces for external command-line tools.
//!
//! The tools never reimplement speech synthesis or release hosting; they
//! shell out to `edge-tts` and `gh`. The traits here are the seams that
//! let tests swap those binaries for in-memory fakes.

pub mod edge_tts;
pub mod github;

use std::path::Path;
use std::process::Output;

use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, warn};

pub use edge_tts::EdgeTts;
pub use github::GhCli;

/// Voice and speaking rate for a synthesis call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceSettings {
    /// Neural voice name, e.g. `zh-CN-XiaoxiaoNeural`
    pub voice: String,

    /// Relative rate, e.g. `+0%`, `+10%`, `-10%`
    pub rate: String,
}

/// Text-to-speech backend
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Human-readable backend name
    fn name(&self) -> &str;

    /// Synthesize `text` and return the encoded audio bytes
    async fn synthesize(&self, text: &str, voice: &VoiceSettings) -> Result<Vec<u8>>;
}

/// Release hosting backend
#[async_trait]
pub trait ReleasePublisher: Send + Sync {
    /// Human-readable backend name
    fn name(&self) -> &str;

    /// Whether the release exists. A failed lookup reads as "absent".
    async fn release_exists(&self, tag: &str) -> Result<bool>;

    /// Create a release
    async fn create_release(&self, tag: &str, title: &str, notes: &str) -> Result<()>;

    /// Upload one asset, replacing an existing asset of the same name if `clobber`
    async fn upload_asset(&self, tag: &str, file: &Path, clobber: bool) -> Result<()>;
}

/// Log captured stdout/stderr of a finished command
pub(crate) fn log_output(output: &Output) {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    if !stdout.trim().is_empty() {
        debug!("{}", stdout.trim());
    }
    if !stderr.trim().is_empty() {
        warn!("{}", stderr.trim());
    }
}
