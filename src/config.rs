//! Configuration for the flashcard tools.
//!
//! Configuration sources (highest priority first):
//! 1. Command-line flags (some also read from environment variables)
//! 2. Config file (.flashdeck/config.yaml, or the file named by FLASHDECK_CONFIG)
//! 3. Defaults (see [`paths`])
//!
//! Config file discovery:
//! - Searches current directory and parents for .flashdeck/config.yaml
//! - Relative paths resolve against the project root (the parent of .flashdeck/)
//!
//! The resolved configuration is passed explicitly into each command; there
//! is no global state.

pub mod paths;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::adapters::VoiceSettings;
use crate::core::embed::DEFAULT_MARKER;
use crate::domain::artifact::AUDIO_EXTENSION;

/// Environment variable naming an explicit config file
pub const CONFIG_ENV: &str = "FLASHDECK_CONFIG";

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub clean: CleanSection,
    #[serde(default)]
    pub speech: SpeechSection,
    #[serde(default)]
    pub upload: UploadSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CleanSection {
    pub document: Option<String>,
    pub marker: Option<String>,
    /// Extra headword → meaning overrides
    #[serde(default)]
    pub overrides: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SpeechSection {
    pub voice: Option<String>,
    pub rate: Option<String>,
    pub out_dir: Option<String>,
    pub level_files: Option<Vec<String>>,
    pub delay_ms: Option<u64>,
    pub progress_every: Option<usize>,
    pub timeout_seconds: Option<u64>,
    pub binary: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UploadSection {
    pub audio_dir: Option<String>,
    pub repo: Option<String>,
    pub tag: Option<String>,
    pub title: Option<String>,
    pub notes: Option<String>,
    pub chunk_size: Option<usize>,
    pub archive_prefix: Option<String>,
    pub staging_dir: Option<String>,
    pub binary: Option<String>,
}

/// Resolved meaning-cleaner settings
#[derive(Debug, Clone)]
pub struct CleanConfig {
    pub document: PathBuf,
    pub marker: String,
    pub overrides: BTreeMap<String, String>,
}

/// Resolved audio-generation settings
#[derive(Debug, Clone)]
pub struct SpeechConfig {
    pub voice: String,
    pub rate: String,
    pub out_dir: PathBuf,
    pub level_files: Vec<PathBuf>,
    pub delay_ms: u64,
    pub progress_every: usize,
    pub timeout_seconds: u64,
    pub binary: String,
}

impl SpeechConfig {
    pub fn voice_settings(&self) -> VoiceSettings {
        VoiceSettings {
            voice: self.voice.clone(),
            rate: self.rate.clone(),
        }
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

/// Resolved upload settings
#[derive(Debug, Clone)]
pub struct UploadConfig {
    pub audio_dir: PathBuf,
    pub extension: String,
    pub repo: String,
    pub tag: String,
    pub title: String,
    pub notes: String,
    pub chunk_size: usize,
    pub archive_prefix: String,
    pub staging_dir: PathBuf,
    pub binary: String,
}

/// Resolved configuration with paths anchored at the project root
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Project root (None: paths stay relative to the working directory)
    pub root: Option<PathBuf>,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
    pub clean: CleanConfig,
    pub speech: SpeechConfig,
    pub upload: UploadConfig,
}

pub const DEFAULT_VOICE: &str = "zh-CN-XiaoxiaoNeural";
pub const DEFAULT_RATE: &str = "+0%";
pub const DEFAULT_DELAY_MS: u64 = 50;
pub const DEFAULT_PROGRESS_EVERY: usize = 100;
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 60;
pub const DEFAULT_REPO: &str = "HMJason/HSK-Flashcards";
pub const DEFAULT_TAG: &str = "sentence-audio-v1";
pub const DEFAULT_TITLE: &str = "Example Sentence Audio (edge-tts zh-CN-XiaoxiaoNeural)";
pub const DEFAULT_NOTES: &str = "Pre-generated Mandarin sentence audio using edge-tts zh-CN-XiaoxiaoNeural. One MP3 per HSK example sentence.";
/// Files per archive (keeps archives around 40 MB)
pub const DEFAULT_CHUNK_SIZE: usize = 800;

/// Find config file by searching current directory and parents
fn find_config_file() -> Option<PathBuf> {
    let mut current = std::env::current_dir().ok()?;

    loop {
        let config_path = current.join(paths::CONFIG_DIR).join(paths::CONFIG_FILE);
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Resolve a path that may be relative to the project root
fn resolve_path(base: Option<&Path>, path_str: &str) -> PathBuf {
    let path = PathBuf::from(path_str);
    match base {
        Some(base) if !path.is_absolute() => base.join(path),
        _ => path,
    }
}

/// Project root for a config file: the parent of `.flashdeck/`
fn project_root(config_path: &Path) -> PathBuf {
    config_path
        .parent() // .flashdeck/
        .and_then(|p| p.parent()) // project root
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Merge a parsed config file over the defaults
pub fn resolve(file: ConfigFile, root: Option<PathBuf>, config_file: Option<PathBuf>) -> ResolvedConfig {
    let base = root.as_deref();
    let ConfigFile {
        clean,
        speech,
        upload,
        ..
    } = file;

    let clean = CleanConfig {
        document: resolve_path(base, clean.document.as_deref().unwrap_or(paths::FLASHCARDS_HTML)),
        marker: clean.marker.unwrap_or_else(|| DEFAULT_MARKER.to_string()),
        overrides: clean.overrides,
    };

    let level_files = match speech.level_files {
        Some(files) => files.iter().map(|f| resolve_path(base, f)).collect(),
        None => paths::examples_files()
            .iter()
            .map(|f| resolve_path(base, &f.to_string_lossy()))
            .collect(),
    };

    let speech = SpeechConfig {
        voice: speech.voice.unwrap_or_else(|| DEFAULT_VOICE.to_string()),
        rate: speech.rate.unwrap_or_else(|| DEFAULT_RATE.to_string()),
        out_dir: resolve_path(base, speech.out_dir.as_deref().unwrap_or(paths::SENTENCE_AUDIO_DIR)),
        level_files,
        delay_ms: speech.delay_ms.unwrap_or(DEFAULT_DELAY_MS),
        progress_every: speech.progress_every.unwrap_or(DEFAULT_PROGRESS_EVERY),
        timeout_seconds: speech.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS),
        binary: speech.binary.unwrap_or_else(|| "edge-tts".to_string()),
    };

    let upload = UploadConfig {
        audio_dir: resolve_path(base, upload.audio_dir.as_deref().unwrap_or(paths::SENTENCE_AUDIO_DIR)),
        extension: AUDIO_EXTENSION.to_string(),
        repo: upload.repo.unwrap_or_else(|| DEFAULT_REPO.to_string()),
        tag: upload.tag.unwrap_or_else(|| DEFAULT_TAG.to_string()),
        title: upload.title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
        notes: upload.notes.unwrap_or_else(|| DEFAULT_NOTES.to_string()),
        chunk_size: upload.chunk_size.unwrap_or(DEFAULT_CHUNK_SIZE),
        archive_prefix: upload
            .archive_prefix
            .unwrap_or_else(|| paths::SENTENCE_AUDIO_DIR.to_string()),
        staging_dir: resolve_path(base, upload.staging_dir.as_deref().unwrap_or(".")),
        binary: upload.binary.unwrap_or_else(|| "gh".to_string()),
    };

    ResolvedConfig {
        root,
        config_file,
        clean,
        speech,
        upload,
    }
}

/// Load configuration from all sources
pub fn load_config() -> Result<ResolvedConfig> {
    let config_file = std::env::var_os(CONFIG_ENV)
        .map(PathBuf::from)
        .or_else(find_config_file);

    match config_file {
        Some(path) => load_config_from(&path),
        None => Ok(resolve(ConfigFile::default(), None, None)),
    }
}

/// Load configuration from an explicit file
pub fn load_config_from(path: &Path) -> Result<ResolvedConfig> {
    let file = load_config_file(path)?;
    Ok(resolve(file, Some(project_root(path)), Some(path.to_path_buf())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_without_file() {
        let config = resolve(ConfigFile::default(), None, None);

        assert!(config.config_file.is_none());
        assert_eq!(config.clean.document, PathBuf::from("docs/flashcards.html"));
        assert_eq!(config.clean.marker, "const h1=");
        assert_eq!(config.speech.voice, "zh-CN-XiaoxiaoNeural");
        assert_eq!(config.speech.rate, "+0%");
        assert_eq!(config.speech.level_files.len(), 6);
        assert_eq!(config.speech.delay(), Duration::from_millis(50));
        assert_eq!(config.upload.chunk_size, 800);
        assert_eq!(config.upload.tag, "sentence-audio-v1");
        assert_eq!(config.upload.archive_prefix, "sentence_audio");
    }

    #[test]
    fn test_config_file_parsing() {
        let temp = TempDir::new().unwrap();
        let config_dir = temp.path().join(".flashdeck");
        std::fs::create_dir_all(&config_dir).unwrap();

        let config_path = config_dir.join("config.yaml");
        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(
            file,
            r#"
version: "1"
clean:
  overrides:
    们: "plural marker"
speech:
  voice: zh-CN-YunxiNeural
  rate: "+10%"
  level_files: [data/hsk1.json, /abs/hsk2.json]
upload:
  chunk_size: 100
  repo: someone/cards
"#
        )
        .unwrap();

        let config = load_config_from(&config_path).unwrap();
        assert_eq!(config.root.as_deref(), Some(temp.path()));
        assert_eq!(config.speech.voice, "zh-CN-YunxiNeural");
        assert_eq!(config.speech.rate, "+10%");
        assert_eq!(
            config.speech.level_files,
            vec![temp.path().join("data/hsk1.json"), PathBuf::from("/abs/hsk2.json")]
        );
        assert_eq!(config.speech.out_dir, temp.path().join("sentence_audio"));
        assert_eq!(config.upload.chunk_size, 100);
        assert_eq!(config.upload.repo, "someone/cards");
        assert_eq!(
            config.clean.overrides.get("们"),
            Some(&"plural marker".to_string())
        );
    }

    #[test]
    fn test_invalid_config_file() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("config.yaml");
        std::fs::write(&config_path, "speech: 42").unwrap();

        assert!(load_config_from(&config_path).is_err());
    }

    #[test]
    fn test_resolve_relative_path() {
        let base = PathBuf::from("/home/user/project");

        assert_eq!(
            resolve_path(Some(&base), "sentence_audio"),
            PathBuf::from("/home/user/project/sentence_audio")
        );
        assert_eq!(
            resolve_path(Some(&base), "/absolute/path"),
            PathBuf::from("/absolute/path")
        );
        assert_eq!(resolve_path(None, "docs"), PathBuf::from("docs"));
    }
}
