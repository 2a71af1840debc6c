//! Sentence audio CLI commands.
//!
//! - `flashdeck generate` - Synthesize one MP3 per example sentence
//! - `flashdeck upload` - Zip the MP3s and publish them to a GitHub release

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use crate::adapters::{EdgeTts, GhCli};
use crate::config::ResolvedConfig;
use crate::core::generator::{self, GeneratorSettings};
use crate::core::uploader::{self, download_base_url, ReleaseSpec, UploadSettings};

/// Options for `flashdeck generate`
#[derive(Args, Debug, Default)]
pub struct GenerateArgs {
    /// Neural voice (e.g. zh-CN-YunxiNeural for a male voice)
    #[arg(long, env = "FLASHDECK_TTS_VOICE")]
    pub voice: Option<String>,

    /// Speech rate, e.g. "+10%" or "-10%"
    #[arg(long, env = "FLASHDECK_TTS_RATE", allow_hyphen_values = true)]
    pub rate: Option<String>,

    /// Output directory for MP3 files
    #[arg(short, long)]
    pub out_dir: Option<PathBuf>,

    /// Level file (repeatable, earlier files win on duplicate words)
    #[arg(long = "level-file")]
    pub level_files: Vec<PathBuf>,

    /// Delay between synthesis calls in milliseconds
    #[arg(long)]
    pub delay_ms: Option<u64>,

    /// Stop after generating N new files
    #[arg(long)]
    pub limit: Option<usize>,
}

/// Options for `flashdeck upload`
#[derive(Args, Debug, Default)]
pub struct UploadArgs {
    /// Directory holding generated MP3 files
    #[arg(short, long)]
    pub audio_dir: Option<PathBuf>,

    /// GitHub repository (owner/name)
    #[arg(long, env = "FLASHDECK_RELEASE_REPO")]
    pub repo: Option<String>,

    /// Release tag
    #[arg(long)]
    pub tag: Option<String>,

    /// Release title (used only when the release is created)
    #[arg(long)]
    pub title: Option<String>,

    /// Maximum files per archive
    #[arg(long)]
    pub chunk_size: Option<usize>,

    /// Build archives and show planned commands without uploading
    #[arg(long)]
    pub dry_run: bool,
}

/// Merge CLI options over the resolved configuration
pub fn generator_settings(config: &ResolvedConfig, args: &GenerateArgs) -> GeneratorSettings {
    let speech = &config.speech;
    let mut voice = speech.voice_settings();
    if let Some(v) = &args.voice {
        voice.voice = v.clone();
    }
    if let Some(r) = &args.rate {
        voice.rate = r.clone();
    }

    GeneratorSettings {
        level_files: if args.level_files.is_empty() {
            speech.level_files.clone()
        } else {
            args.level_files.clone()
        },
        out_dir: args.out_dir.clone().unwrap_or_else(|| speech.out_dir.clone()),
        voice,
        delay: args
            .delay_ms
            .map(std::time::Duration::from_millis)
            .unwrap_or_else(|| speech.delay()),
        progress_every: speech.progress_every,
        limit: args.limit,
    }
}

/// Merge CLI options over the resolved configuration
pub fn upload_settings(config: &ResolvedConfig, args: &UploadArgs) -> UploadSettings {
    let upload = &config.upload;
    UploadSettings {
        audio_dir: args.audio_dir.clone().unwrap_or_else(|| upload.audio_dir.clone()),
        extension: upload.extension.clone(),
        chunk_size: args.chunk_size.unwrap_or(upload.chunk_size),
        archive_prefix: upload.archive_prefix.clone(),
        staging_dir: upload.staging_dir.clone(),
        release: ReleaseSpec {
            tag: args.tag.clone().unwrap_or_else(|| upload.tag.clone()),
            title: args.title.clone().unwrap_or_else(|| upload.title.clone()),
            notes: upload.notes.clone(),
        },
    }
}

/// Generate sentence audio
pub async fn execute_generate(config: &ResolvedConfig, args: GenerateArgs) -> Result<()> {
    let settings = generator_settings(config, &args);
    let synthesizer =
        EdgeTts::with_binary_path(&config.speech.binary).with_timeout(config.speech.timeout());

    let summary = generator::run(&settings, &synthesizer).await?;

    println!();
    println!(
        "Done! {} generated, {} skipped (already existed), {} failed.",
        summary.generated, summary.skipped, summary.failed
    );
    println!();
    println!(
        "Next step: flashdeck upload --audio-dir {}",
        settings.out_dir.display()
    );

    Ok(())
}

/// Package and publish sentence audio
pub async fn execute_upload(config: &ResolvedConfig, args: UploadArgs) -> Result<()> {
    let settings = upload_settings(config, &args);
    let repo = args.repo.clone().unwrap_or_else(|| config.upload.repo.clone());

    if args.dry_run {
        return dry_run_upload(&settings, &repo);
    }

    let publisher = GhCli::with_binary_path(&config.upload.binary, &repo);
    let summary = uploader::run(&settings, &publisher).await?;

    println!();
    println!(
        "✓ Uploaded {} files in {} archive(s) to '{}'{}",
        summary.files,
        summary.archives.len(),
        settings.release.tag,
        if summary.release_created { " (new release)" } else { "" }
    );
    println!("Sentence audio base URL:");
    println!("  {}", download_base_url(&repo, &settings.release.tag));

    Ok(())
}

fn dry_run_upload(settings: &UploadSettings, repo: &str) -> Result<()> {
    let files = uploader::collect_audio_files(&settings.audio_dir, &settings.extension)?;
    let archives = uploader::build_archives(
        &files,
        settings.chunk_size,
        &settings.archive_prefix,
        &settings.staging_dir,
    )?;

    let tag = &settings.release.tag;
    println!();
    println!("[dry run] {} files in {} archive(s)", files.len(), archives.len());
    println!("  gh release view {} --repo {}", tag, repo);
    println!(
        "  gh release create {} --repo {} --title {:?} --notes {:?}  (if missing)",
        tag, repo, settings.release.title, settings.release.notes
    );
    for archive in &archives {
        println!(
            "  gh release upload {} {} --repo {} --clobber",
            tag,
            archive.path.display(),
            repo
        );
    }
    println!("Archives left in {}", settings.staging_dir.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{resolve, ConfigFile};

    #[test]
    fn test_generate_args_override_config() {
        let config = resolve(ConfigFile::default(), None, None);
        let args = GenerateArgs {
            voice: Some("zh-CN-YunxiNeural".to_string()),
            rate: Some("-10%".to_string()),
            level_files: vec![PathBuf::from("a.json")],
            delay_ms: Some(0),
            ..Default::default()
        };

        let settings = generator_settings(&config, &args);
        assert_eq!(settings.voice.voice, "zh-CN-YunxiNeural");
        assert_eq!(settings.voice.rate, "-10%");
        assert_eq!(settings.level_files, vec![PathBuf::from("a.json")]);
        assert!(settings.delay.is_zero());
        assert_eq!(settings.out_dir, PathBuf::from("sentence_audio"));
    }

    #[test]
    fn test_upload_defaults_from_config() {
        let config = resolve(ConfigFile::default(), None, None);
        let settings = upload_settings(&config, &UploadArgs::default());

        assert_eq!(settings.chunk_size, 800);
        assert_eq!(settings.release.tag, "sentence-audio-v1");
        assert_eq!(settings.extension, "mp3");
    }
}
