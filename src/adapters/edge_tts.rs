//! edge-tts adapter for neural speech synthesis.
//!
//! Runs the `edge-tts` CLI (`pip install edge-tts`) once per sentence,
//! writing the MP3 to a temp file and reading it back.

use std::process::Stdio;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::process::Command;
use tokio::time::timeout;

use super::{SpeechSynthesizer, VoiceSettings};

/// Default synthesis timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// edge-tts adapter using subprocess mode
pub struct EdgeTts {
    /// Path to the edge-tts binary (default: "edge-tts")
    binary_path: String,

    /// Per-call timeout
    call_timeout: Duration,
}

impl Default for EdgeTts {
    fn default() -> Self {
        Self::new()
    }
}

impl EdgeTts {
    pub fn new() -> Self {
        Self::with_binary_path("edge-tts")
    }

    /// Create an adapter with a custom binary path
    pub fn with_binary_path(binary_path: impl Into<String>) -> Self {
        Self {
            binary_path: binary_path.into(),
            call_timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, call_timeout: Duration) -> Self {
        self.call_timeout = call_timeout;
        self
    }

    /// Arguments for one call. The rate is passed as `--rate=<r>` so that
    /// negative rates are not mistaken for flags.
    fn args(text: &str, voice: &VoiceSettings, media_path: &str) -> Vec<String> {
        vec![
            "--voice".to_string(),
            voice.voice.clone(),
            format!("--rate={}", voice.rate),
            "--text".to_string(),
            text.to_string(),
            "--write-media".to_string(),
            media_path.to_string(),
        ]
    }
}

#[async_trait]
impl SpeechSynthesizer for EdgeTts {
    fn name(&self) -> &str {
        "edge-tts"
    }

    async fn synthesize(&self, text: &str, voice: &VoiceSettings) -> Result<Vec<u8>> {
        let media = tempfile::Builder::new()
            .prefix("flashdeck-tts-")
            .suffix(".mp3")
            .tempfile()
            .context("Failed to create temp file for edge-tts output")?;
        let media_path = media.path().to_string_lossy().to_string();

        let child = Command::new(&self.binary_path)
            .args(Self::args(text, voice, &media_path))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("Failed to spawn {}", self.binary_path))?;

        let output = timeout(self.call_timeout, child.wait_with_output())
            .await
            .with_context(|| format!("edge-tts timed out after {:?}", self.call_timeout))?
            .context("Failed to wait for edge-tts process")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let exit_code = output.status.code().unwrap_or(-1);
            anyhow::bail!("edge-tts failed with exit code {}: {}", exit_code, stderr.trim());
        }

        let bytes = tokio::fs::read(media.path())
            .await
            .context("Failed to read edge-tts output")?;
        if bytes.is_empty() {
            anyhow::bail!("edge-tts produced no audio");
        }

        Ok(bytes)
    }
}
