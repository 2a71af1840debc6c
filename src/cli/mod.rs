//! Command-line interface for flashdeck.
//!
//! Provides commands for cleaning the inline HSK1 meanings, generating
//! sentence audio, uploading it to a release, and showing configuration.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::config::{self, ResolvedConfig};
use crate::core::{builtin_patches, DocumentRewriter, MeaningCleaner};

pub mod audio;

/// flashdeck - Maintenance tools for the HSK flashcard deck
#[derive(Parser, Debug)]
#[command(name = "flashdeck")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file (defaults to .flashdeck/config.yaml in this or a parent directory)
    #[arg(long, global = true, env = "FLASHDECK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log per-command output and other debug detail
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Clean HSK1 meanings embedded in the flashcard page and apply template patches
    Clean {
        /// Flashcard page to rewrite
        #[arg(short, long)]
        document: Option<PathBuf>,

        /// Assignment marker in front of the vocabulary array
        #[arg(long)]
        marker: Option<String>,

        /// Skip the literal template patches
        #[arg(long)]
        skip_patches: bool,

        /// Report changes without writing the page
        #[arg(long)]
        dry_run: bool,
    },

    /// Generate sentence audio for every HSK example sentence
    Generate {
        #[command(flatten)]
        args: audio::GenerateArgs,
    },

    /// Zip generated audio and upload it to a GitHub release
    Upload {
        #[command(flatten)]
        args: audio::UploadArgs,
    },

    /// Show resolved configuration (debug)
    Config,
}

impl Cli {
    /// Default log filter when RUST_LOG is unset
    pub fn default_log_filter(&self) -> &'static str {
        if self.verbose {
            "flashdeck=debug,info"
        } else {
            "info"
        }
    }

    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        let config = match &self.config {
            Some(path) => config::load_config_from(path)?,
            None => config::load_config()?,
        };

        match self.command {
            Commands::Clean {
                document,
                marker,
                skip_patches,
                dry_run,
            } => clean_document(&config, document, marker, skip_patches, dry_run).await,
            Commands::Generate { args } => audio::execute_generate(&config, args).await,
            Commands::Upload { args } => audio::execute_upload(&config, args).await,
            Commands::Config => show_config(&config),
        }
    }
}

/// Rewrite the flashcard page in place
async fn clean_document(
    config: &ResolvedConfig,
    document: Option<PathBuf>,
    marker: Option<String>,
    skip_patches: bool,
    dry_run: bool,
) -> Result<()> {
    let path = document.unwrap_or_else(|| config.clean.document.clone());
    let marker = marker.unwrap_or_else(|| config.clean.marker.clone());

    let mut content = tokio::fs::read_to_string(&path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let cleaner = MeaningCleaner::new()
        .context("Failed to compile cleanup rules")?
        .with_overrides(config.clean.overrides.clone());
    let patches = if skip_patches {
        Vec::new()
    } else {
        builtin_patches()
    };
    let rewriter = DocumentRewriter::new(cleaner, marker).with_patches(patches);

    let report = rewriter.rewrite(&mut content);

    println!();
    for description in &report.patches_applied {
        println!("Patch applied: {}", description);
    }
    for description in &report.patches_skipped {
        println!("Patch already applied or not found: {}", description);
    }
    match &report.meaning_error {
        Some(e) => println!("Meaning cleanup skipped ({}): already applied or not applicable", e),
        None => println!("{} HSK1 meanings cleaned", report.changes.len()),
    }

    if !report.modified() {
        println!("\nNothing to write, {} unchanged", path.display());
        return Ok(());
    }

    if dry_run {
        println!("\n[dry run] {} not written", path.display());
        return Ok(());
    }

    tokio::fs::write(&path, &content)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!("\nDone! Now run:");
    println!("  git add {}", path.display());
    println!("  git commit -m \"Clean HSK1 meanings\"");
    println!("  git push");

    Ok(())
}

/// Show resolved configuration
fn show_config(cfg: &ResolvedConfig) -> Result<()> {
    println!("flashdeck configuration");
    println!("═══════════════════════════════════════════════════════════════");
    println!();
    println!(
        "Config file: {}",
        cfg.config_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none - using defaults)".to_string())
    );
    println!();
    println!("Clean:");
    println!("  Document:  {}", cfg.clean.document.display());
    println!("  Marker:    {}", cfg.clean.marker);
    if !cfg.clean.overrides.is_empty() {
        println!("  Extra overrides:");
        for (word, meaning) in &cfg.clean.overrides {
            println!("    {}: {}", word, meaning);
        }
    }
    println!();
    println!("Speech:");
    println!("  Voice:     {}", cfg.speech.voice);
    println!("  Rate:      {}", cfg.speech.rate);
    println!("  Output:    {}", cfg.speech.out_dir.display());
    println!("  Delay:     {}ms", cfg.speech.delay_ms);
    println!("  Timeout:   {}s", cfg.speech.timeout_seconds);
    println!("  Binary:    {}", cfg.speech.binary);
    println!("  Level files:");
    for file in &cfg.speech.level_files {
        println!("    {}", file.display());
    }
    println!();
    println!("Upload:");
    println!("  Audio dir: {}", cfg.upload.audio_dir.display());
    println!("  Repo:      {}", cfg.upload.repo);
    println!("  Tag:       {}", cfg.upload.tag);
    println!("  Title:     {}", cfg.upload.title);
    println!("  Chunk:     {} files per archive", cfg.upload.chunk_size);
    println!("  Staging:   {}", cfg.upload.staging_dir.display());
    println!("  Binary:    {}", cfg.upload.binary);

    Ok(())
}
