//! Packaging sentence audio into zip archives and publishing them as
//! release assets.
//!
//! Every step is fail-fast: a failed archive or publish command aborts the
//! run. The only tolerated failure is the release lookup, which is expected
//! to fail the first time.

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;
use tracing::info;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::adapters::ReleasePublisher;
use crate::domain::artifact::{partition, ArchiveBundle};

/// Errors that stop an upload before anything is published
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("{0} not found. Run `flashdeck generate` first.")]
    AudioDirMissing(PathBuf),

    #[error("No .{extension} files in {dir}")]
    NoAudioFiles { dir: PathBuf, extension: String },

    #[error("Invalid file pattern: {0}")]
    Pattern(#[from] glob::PatternError),
}

/// Release identity and text
#[derive(Debug, Clone)]
pub struct ReleaseSpec {
    pub tag: String,
    pub title: String,
    pub notes: String,
}

/// Settings for one upload run
#[derive(Debug, Clone)]
pub struct UploadSettings {
    /// Directory holding generated audio
    pub audio_dir: PathBuf,

    /// Audio file extension to collect
    pub extension: String,

    /// Maximum files per archive
    pub chunk_size: usize,

    /// Archive names are `<prefix>_part<N>.zip`
    pub archive_prefix: String,

    /// Where archives are written before upload
    pub staging_dir: PathBuf,

    pub release: ReleaseSpec,
}

/// A built archive on disk
#[derive(Debug, Clone)]
pub struct BuiltArchive {
    pub bundle: ArchiveBundle,
    pub path: PathBuf,
    pub size_bytes: u64,
}

/// Outcome of an upload run
#[derive(Debug, Clone, Default)]
pub struct UploadSummary {
    pub files: usize,
    pub archives: Vec<String>,
    pub release_created: bool,
}

/// Sorted list of audio files in `dir`.
///
/// Fails if the directory is absent or holds no matching files.
pub fn collect_audio_files(dir: &Path, extension: &str) -> Result<Vec<PathBuf>, UploadError> {
    if !dir.is_dir() {
        return Err(UploadError::AudioDirMissing(dir.to_path_buf()));
    }

    let pattern = format!(
        "{}/*.{}",
        glob::Pattern::escape(&dir.to_string_lossy()),
        glob::Pattern::escape(extension)
    );
    let mut files: Vec<PathBuf> = glob::glob(&pattern)?
        .filter_map(|entry| entry.ok())
        .filter(|path| path.is_file())
        .collect();
    files.sort();

    if files.is_empty() {
        return Err(UploadError::NoAudioFiles {
            dir: dir.to_path_buf(),
            extension: extension.to_string(),
        });
    }
    Ok(files)
}

/// Write one deflate-compressed archive with entries stored by bare file name
pub fn write_archive(bundle: &ArchiveBundle, dest: &Path) -> Result<u64> {
    let file = File::create(dest)
        .with_context(|| format!("Failed to create {}", dest.display()))?;
    let mut zip = ZipWriter::new(BufWriter::new(file));
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    for path in &bundle.files {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .with_context(|| format!("No file name in {}", path.display()))?;
        zip.start_file(name, options)
            .with_context(|| format!("Failed to add {} to {}", path.display(), bundle.name))?;
        let mut source = File::open(path)
            .with_context(|| format!("Failed to open {}", path.display()))?;
        io::copy(&mut source, &mut zip)
            .with_context(|| format!("Failed to compress {}", path.display()))?;
    }

    zip.finish()
        .with_context(|| format!("Failed to finish {}", bundle.name))?
        .into_inner()
        .map_err(|e| e.into_error())
        .with_context(|| format!("Failed to flush {}", bundle.name))?;

    let size_bytes = std::fs::metadata(dest)
        .with_context(|| format!("Failed to stat {}", dest.display()))?
        .len();
    Ok(size_bytes)
}

/// Partition files and write one archive per chunk into `staging_dir`
pub fn build_archives(
    files: &[PathBuf],
    chunk_size: usize,
    prefix: &str,
    staging_dir: &Path,
) -> Result<Vec<BuiltArchive>> {
    std::fs::create_dir_all(staging_dir)
        .with_context(|| format!("Failed to create {}", staging_dir.display()))?;

    let mut built = Vec::new();
    for bundle in partition(files, chunk_size, prefix) {
        info!("Creating {} ({} files)...", bundle.name, bundle.files.len());
        let path = staging_dir.join(&bundle.name);
        let size_bytes = write_archive(&bundle, &path)?;
        info!(
            "  {}: {:.1} MB",
            bundle.name,
            size_bytes as f64 / 1024.0 / 1024.0
        );
        built.push(BuiltArchive {
            bundle,
            path,
            size_bytes,
        });
    }
    Ok(built)
}

/// Make sure the release exists. Returns true if it was created.
pub async fn ensure_release(
    publisher: &dyn ReleasePublisher,
    release: &ReleaseSpec,
) -> Result<bool> {
    if publisher.release_exists(&release.tag).await? {
        info!("Release '{}' already exists, uploading to it", release.tag);
        return Ok(false);
    }

    info!("Creating release '{}'", release.tag);
    publisher
        .create_release(&release.tag, &release.title, &release.notes)
        .await
        .with_context(|| format!("Failed to create release '{}'", release.tag))?;
    Ok(true)
}

/// Remove local archives after upload
pub fn remove_archives(archives: &[BuiltArchive]) -> Result<()> {
    for archive in archives {
        std::fs::remove_file(&archive.path)
            .with_context(|| format!("Failed to remove {}", archive.path.display()))?;
    }
    Ok(())
}

/// Collect, archive, publish and clean up
pub async fn run(
    settings: &UploadSettings,
    publisher: &dyn ReleasePublisher,
) -> Result<UploadSummary> {
    let files = collect_audio_files(&settings.audio_dir, &settings.extension)?;
    info!(
        "Found {} .{} files in {}, publishing with {}",
        files.len(),
        settings.extension,
        settings.audio_dir.display(),
        publisher.name()
    );

    let archives = build_archives(
        &files,
        settings.chunk_size,
        &settings.archive_prefix,
        &settings.staging_dir,
    )?;

    let release_created = ensure_release(publisher, &settings.release).await?;

    for archive in &archives {
        info!("Uploading {}...", archive.bundle.name);
        publisher
            .upload_asset(&settings.release.tag, &archive.path, true)
            .await
            .with_context(|| format!("Failed to upload {}", archive.bundle.name))?;
    }

    remove_archives(&archives)?;

    Ok(UploadSummary {
        files: files.len(),
        archives: archives.into_iter().map(|a| a.bundle.name).collect(),
        release_created,
    })
}

/// Public download base for assets of a GitHub release
pub fn download_base_url(repo: &str, tag: &str) -> String {
    format!("https://github.com/{}/releases/download/{}/", repo, tag)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_dir() {
        let temp = TempDir::new().unwrap();
        let err = collect_audio_files(&temp.path().join("nope"), "mp3").unwrap_err();
        assert!(matches!(err, UploadError::AudioDirMissing(_)));
    }

    #[test]
    fn test_empty_dir() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("notes.txt"), "x").unwrap();

        let err = collect_audio_files(temp.path(), "mp3").unwrap_err();
        assert!(matches!(err, UploadError::NoAudioFiles { .. }));
    }

    #[test]
    fn test_collect_sorted_and_filtered() {
        let temp = TempDir::new().unwrap();
        for name in ["b_sentence.mp3", "a_sentence.mp3", "c.txt", "d.mp3.part"] {
            std::fs::write(temp.path().join(name), "x").unwrap();
        }

        let files = collect_audio_files(temp.path(), "mp3").unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a_sentence.mp3", "b_sentence.mp3"]);
    }

    #[test]
    fn test_archive_is_complete_on_disk() {
        let temp = TempDir::new().unwrap();
        let files: Vec<PathBuf> = (0..3)
            .map(|i| {
                let path = temp.path().join(format!("{i}_sentence.mp3"));
                std::fs::write(&path, vec![i as u8; 4096]).unwrap();
                path
            })
            .collect();
        let bundle = partition(&files, 10, "sentence_audio").remove(0);
        let dest = temp.path().join(&bundle.name);

        let size = write_archive(&bundle, &dest).unwrap();

        assert_eq!(size, std::fs::metadata(&dest).unwrap().len());
        let archive = zip::ZipArchive::new(File::open(&dest).unwrap()).unwrap();
        assert_eq!(archive.len(), 3);
    }

    #[test]
    fn test_download_base_url() {
        assert_eq!(
            download_base_url("HMJason/HSK-Flashcards", "sentence-audio-v1"),
            "https://github.com/HMJason/HSK-Flashcards/releases/download/sentence-audio-v1/"
        );
    }
}
