//! On-disk artifacts: sentence audio files and the archives that carry them.

use std::path::{Path, PathBuf};

/// Suffix appended to the headword in audio file names
pub const SENTENCE_SUFFIX: &str = "_sentence";

/// Default audio file extension
pub const AUDIO_EXTENSION: &str = "mp3";

/// A synthesized sentence audio file for one headword
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioArtifact {
    /// Headword the audio belongs to
    pub headword: String,

    /// Full path of the audio file
    pub path: PathBuf,
}

impl AudioArtifact {
    /// Resolve the deterministic artifact path for a headword.
    ///
    /// Returns `None` if the headword cannot be used as a file name
    /// without colliding with another headword or escaping `out_dir`.
    pub fn for_headword(out_dir: &Path, headword: &str, extension: &str) -> Option<Self> {
        if !is_file_safe(headword) {
            return None;
        }
        let file_name = format!("{}{}.{}", headword, SENTENCE_SUFFIX, extension);
        Some(Self {
            headword: headword.to_string(),
            path: out_dir.join(file_name),
        })
    }

    /// Existence is the idempotence marker
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Temporary path written before the final rename
    pub fn partial_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".part");
        PathBuf::from(name)
    }
}

fn is_file_safe(headword: &str) -> bool {
    !headword.is_empty()
        && headword != "."
        && headword != ".."
        && !headword.contains(['/', '\\', '\0'])
}

/// A fixed-capacity group of audio files packed into one archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveBundle {
    /// Archive file name, e.g. `sentence_audio_part1.zip`
    pub name: String,

    /// Files packed into this archive
    pub files: Vec<PathBuf>,
}

impl ArchiveBundle {
    pub fn archive_name(prefix: &str, index: usize) -> String {
        format!("{}_part{}.zip", prefix, index)
    }
}

/// Split a (sorted) file list into bundles of at most `chunk_size` files.
///
/// A `chunk_size` of zero is treated as one.
pub fn partition(files: &[PathBuf], chunk_size: usize, prefix: &str) -> Vec<ArchiveBundle> {
    files
        .chunks(chunk_size.max(1))
        .enumerate()
        .map(|(i, chunk)| ArchiveBundle {
            name: ArchiveBundle::archive_name(prefix, i + 1),
            files: chunk.to_vec(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_name() {
        let artifact = AudioArtifact::for_headword(Path::new("out"), "爱", "mp3").unwrap();
        assert_eq!(artifact.path, PathBuf::from("out/爱_sentence.mp3"));
        assert_eq!(artifact.partial_path(), PathBuf::from("out/爱_sentence.mp3.part"));
    }

    #[test]
    fn test_unsafe_headwords_rejected() {
        let out = Path::new("out");
        assert!(AudioArtifact::for_headword(out, "", "mp3").is_none());
        assert!(AudioArtifact::for_headword(out, "..", "mp3").is_none());
        assert!(AudioArtifact::for_headword(out, "a/b", "mp3").is_none());
        assert!(AudioArtifact::for_headword(out, "a\\b", "mp3").is_none());
    }

    #[test]
    fn test_partition_counts() {
        let files: Vec<PathBuf> = (0..7).map(|i| PathBuf::from(format!("{i}.mp3"))).collect();
        let bundles = partition(&files, 3, "sentence_audio");

        assert_eq!(bundles.len(), 3);
        assert_eq!(bundles[0].name, "sentence_audio_part1.zip");
        assert_eq!(bundles[2].files, vec![PathBuf::from("6.mp3")]);
    }

    #[test]
    fn test_partition_empty() {
        assert!(partition(&[], 800, "x").is_empty());
    }
}
