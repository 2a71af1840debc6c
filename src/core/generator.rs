//! Sentence audio generation.
//!
//! Collects example sentences from the per-level files, then synthesizes one
//! MP3 per headword. Existing files are skipped, so an interrupted run can
//! simply be started again.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use serde_json::{Map, Value};
use tracing::{error, info, warn};

use crate::adapters::{SpeechSynthesizer, VoiceSettings};
use crate::domain::artifact::{AudioArtifact, AUDIO_EXTENSION};
use crate::domain::SentenceMap;

/// Settings for one generation run
#[derive(Debug, Clone)]
pub struct GeneratorSettings {
    /// Level files in priority order
    pub level_files: Vec<PathBuf>,

    /// Directory receiving `<word>_sentence.mp3`
    pub out_dir: PathBuf,

    pub voice: VoiceSettings,

    /// Pause after each synthesis call
    pub delay: Duration,

    /// Report progress every N words
    pub progress_every: usize,

    /// Stop after this many new files
    pub limit: Option<usize>,
}

/// Counts reported at the end of a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerationSummary {
    /// Unique headwords with a sentence
    pub total: usize,
    pub generated: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl GenerationSummary {
    pub fn processed(&self) -> usize {
        self.generated + self.skipped + self.failed
    }
}

/// Load and merge level files.
///
/// Missing files are skipped with a warning; malformed files are an error.
pub fn collect_sentences(level_files: &[PathBuf]) -> Result<SentenceMap> {
    let mut sentences = SentenceMap::new();

    for path in level_files {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!("{} not found, skipping", path.display());
                continue;
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", path.display()))
            }
        };

        let level: Map<String, Value> = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        let added = sentences.merge_level(&level);
        info!("{}: {} new sentences", path.display(), added);
    }

    Ok(sentences)
}

/// Write bytes to a `.part` file and rename into place
async fn write_atomic(artifact: &AudioArtifact, bytes: &[u8]) -> Result<()> {
    let partial = artifact.partial_path();
    tokio::fs::write(&partial, bytes)
        .await
        .with_context(|| format!("Failed to write {}", partial.display()))?;
    tokio::fs::rename(&partial, &artifact.path)
        .await
        .with_context(|| format!("Failed to move audio into {}", artifact.path.display()))?;
    Ok(())
}

fn log_progress(summary: &GenerationSummary) {
    let n = summary.processed();
    let pct = if summary.total == 0 {
        100.0
    } else {
        n as f64 / summary.total as f64 * 100.0
    };
    info!(
        "  {}/{} ({:.0}%)  skipped={}  failed={}",
        n, summary.total, pct, summary.skipped, summary.failed
    );
}

/// Synthesize audio for every sentence that has no file yet
pub async fn generate(
    sentences: &SentenceMap,
    settings: &GeneratorSettings,
    synthesizer: &dyn SpeechSynthesizer,
) -> Result<GenerationSummary> {
    tokio::fs::create_dir_all(&settings.out_dir)
        .await
        .with_context(|| format!("Failed to create {}", settings.out_dir.display()))?;

    let mut summary = GenerationSummary {
        total: sentences.len(),
        ..Default::default()
    };
    let progress_every = settings.progress_every.max(1);

    info!(
        "Generating audio for {} sentences using {} ({})",
        summary.total,
        settings.voice.voice,
        synthesizer.name()
    );
    info!("Output dir: {}", settings.out_dir.display());

    for (word, sentence) in sentences.iter() {
        if settings.limit.is_some_and(|limit| summary.generated >= limit) {
            info!("Limit of {} new files reached", summary.generated);
            if summary.processed() % progress_every != 0 {
                log_progress(&summary);
            }
            break;
        }

        let synthesized = match AudioArtifact::for_headword(&settings.out_dir, word, AUDIO_EXTENSION) {
            None => {
                error!("  ERROR {}: headword cannot be used as a file name", word);
                summary.failed += 1;
                false
            }
            Some(artifact) if artifact.exists() => {
                summary.skipped += 1;
                false
            }
            Some(artifact) => {
                match synthesize_one(&artifact, sentence, settings, synthesizer).await {
                    Ok(()) => summary.generated += 1,
                    Err(e) => {
                        error!("  ERROR {}: {:#}", word, e);
                        summary.failed += 1;
                    }
                }
                true
            }
        };

        let n = summary.processed();
        if n % progress_every == 0 || n == summary.total {
            log_progress(&summary);
        }

        if synthesized && !settings.delay.is_zero() {
            tokio::time::sleep(settings.delay).await;
        }
    }

    Ok(summary)
}

async fn synthesize_one(
    artifact: &AudioArtifact,
    sentence: &str,
    settings: &GeneratorSettings,
    synthesizer: &dyn SpeechSynthesizer,
) -> Result<()> {
    let bytes = synthesizer.synthesize(sentence, &settings.voice).await?;
    if let Err(e) = write_atomic(artifact, &bytes).await {
        let _ = tokio::fs::remove_file(artifact.partial_path()).await;
        return Err(e);
    }
    Ok(())
}

/// Collect sentences and generate audio in one step
pub async fn run(
    settings: &GeneratorSettings,
    synthesizer: &dyn SpeechSynthesizer,
) -> Result<GenerationSummary> {
    let sentences = collect_sentences(&settings.level_files)?;
    generate(&sentences, settings, synthesizer).await
}
