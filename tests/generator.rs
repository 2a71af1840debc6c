//! Sentence Audio Generation Integration Tests
//!
//! Runs the generator against an in-memory synthesizer to check dedup,
//! skip-on-rerun and failure handling.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use flashdeck::core::generator::{self, GeneratorSettings};
use flashdeck::{SpeechSynthesizer, VoiceSettings};
use tempfile::TempDir;
use tracing_subscriber::fmt::MakeWriter;

/// Synthesizer that records calls and fails on sentences containing "FAIL"
#[derive(Default)]
struct FakeSynthesizer {
    calls: Mutex<Vec<String>>,
}

impl FakeSynthesizer {
    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SpeechSynthesizer for FakeSynthesizer {
    fn name(&self) -> &str {
        "fake"
    }

    async fn synthesize(&self, text: &str, voice: &VoiceSettings) -> Result<Vec<u8>> {
        self.calls.lock().unwrap().push(text.to_string());
        if text.contains("FAIL") {
            anyhow::bail!("service unavailable");
        }
        Ok(format!("{}|{}|{}", voice.voice, voice.rate, text).into_bytes())
    }
}

/// Shared buffer collecting formatted log lines
#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).to_string()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogBuffer {
    type Writer = LogBuffer;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

fn write_level(dir: &Path, name: &str, json: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, json).unwrap();
    path
}

fn settings(temp: &TempDir, level_files: Vec<PathBuf>) -> GeneratorSettings {
    GeneratorSettings {
        level_files,
        out_dir: temp.path().join("sentence_audio"),
        voice: VoiceSettings {
            voice: "zh-CN-XiaoxiaoNeural".to_string(),
            rate: "+0%".to_string(),
        },
        delay: Duration::ZERO,
        progress_every: 100,
        limit: None,
    }
}

fn standard_levels(temp: &TempDir) -> Vec<PathBuf> {
    let hsk1 = write_level(
        temp.path(),
        "examples-hsk1.json",
        r#"{"爱":{"zh":"我爱我的家。","en":"I love my family."},"八":{"zh":"我有八本书。"}}"#,
    );
    let hsk2 = write_level(
        temp.path(),
        "examples-hsk2.json",
        r#"{"爱":{"zh":"他爱她。"},"唱歌":{"zh":"她喜欢唱歌。"},"空":{"zh":"  "}}"#,
    );
    vec![hsk1, temp.path().join("examples-hsk3.json"), hsk2]
}

#[tokio::test]
async fn test_first_level_sentence_wins() {
    let temp = TempDir::new().unwrap();
    let settings = settings(&temp, standard_levels(&temp));
    let synth = FakeSynthesizer::default();

    let summary = generator::run(&settings, &synth).await.unwrap();

    assert_eq!(summary.total, 3);
    assert_eq!(summary.generated, 3);
    assert_eq!(
        synth.calls(),
        vec!["我爱我的家。", "我有八本书。", "她喜欢唱歌。"]
    );

    let audio = std::fs::read_to_string(settings.out_dir.join("爱_sentence.mp3")).unwrap();
    assert_eq!(audio, "zh-CN-XiaoxiaoNeural|+0%|我爱我的家。");
}

#[tokio::test]
async fn test_second_run_skips_everything() {
    let temp = TempDir::new().unwrap();
    let settings = settings(&temp, standard_levels(&temp));

    let first = FakeSynthesizer::default();
    generator::run(&settings, &first).await.unwrap();
    let before = std::fs::read(settings.out_dir.join("八_sentence.mp3")).unwrap();

    let second = FakeSynthesizer::default();
    let summary = generator::run(&settings, &second).await.unwrap();

    assert_eq!(summary.generated, 0);
    assert_eq!(summary.skipped, 3);
    assert_eq!(summary.failed, 0);
    assert!(second.calls().is_empty());

    let after = std::fs::read(settings.out_dir.join("八_sentence.mp3")).unwrap();
    assert_eq!(before, after);
    assert_eq!(std::fs::read_dir(&settings.out_dir).unwrap().count(), 3);
}

#[tokio::test]
async fn test_failures_are_counted_and_skipped() {
    let temp = TempDir::new().unwrap();
    let level = write_level(
        temp.path(),
        "examples-hsk1.json",
        r#"{"一":{"zh":"一 FAIL"},"二":{"zh":"二。"},"a/b":{"zh":"bad name"}}"#,
    );
    let settings = settings(&temp, vec![level]);
    let synth = FakeSynthesizer::default();

    let summary = generator::run(&settings, &synth).await.unwrap();

    assert_eq!(summary.generated, 1);
    assert_eq!(summary.failed, 2);
    assert!(!settings.out_dir.join("一_sentence.mp3").exists());
    assert!(!settings.out_dir.join("一_sentence.mp3.part").exists());
    assert!(settings.out_dir.join("二_sentence.mp3").exists());

    // A failed word is retried on the next run, the finished one is not
    let rerun = FakeSynthesizer::default();
    let summary = generator::run(&settings, &rerun).await.unwrap();
    assert_eq!(summary.skipped, 1);
    assert_eq!(rerun.calls(), vec!["一 FAIL"]);
}

#[tokio::test]
async fn test_limit_caps_new_files() {
    let temp = TempDir::new().unwrap();
    let mut settings = settings(&temp, standard_levels(&temp));
    settings.limit = Some(2);
    let synth = FakeSynthesizer::default();

    let summary = generator::run(&settings, &synth).await.unwrap();

    assert_eq!(summary.generated, 2);
    assert_eq!(synth.calls().len(), 2);
}

#[tokio::test]
async fn test_limit_still_reports_final_progress() {
    let logs = LogBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(logs.clone())
        .with_ansi(false)
        .with_target(false)
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let temp = TempDir::new().unwrap();
    let mut settings = settings(&temp, standard_levels(&temp));
    settings.limit = Some(1);
    let synth = FakeSynthesizer::default();

    let summary = generator::run(&settings, &synth).await.unwrap();

    assert_eq!(summary.generated, 1);
    let output = logs.contents();
    assert!(output.contains("Limit of 1 new files reached"), "{output}");
    assert!(output.contains("1/3 (33%)  skipped=0  failed=0"), "{output}");
}

#[tokio::test]
async fn test_no_level_files_is_not_fatal() {
    let temp = TempDir::new().unwrap();
    let settings = settings(&temp, vec![temp.path().join("missing.json")]);
    let synth = FakeSynthesizer::default();

    let summary = generator::run(&settings, &synth).await.unwrap();

    assert_eq!(summary.total, 0);
    assert!(settings.out_dir.is_dir());
}
