//! GitHub release adapter using the `gh` CLI.
//!
//! Requires `gh` to be installed and authenticated. Every command is echoed
//! as `$ gh ...` before it runs.

use std::path::Path;
use std::process::Output;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::process::Command;
use tracing::info;

use super::{log_output, ReleasePublisher};

/// `gh release` adapter bound to one repository
pub struct GhCli {
    /// Path to the gh binary (default: "gh")
    binary_path: String,

    /// `owner/name` of the repository hosting the release
    repo: String,
}

impl GhCli {
    pub fn new(repo: impl Into<String>) -> Self {
        Self::with_binary_path("gh", repo)
    }

    /// Create an adapter with a custom binary path
    pub fn with_binary_path(binary_path: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            binary_path: binary_path.into(),
            repo: repo.into(),
        }
    }

    fn view_args(&self, tag: &str) -> Vec<String> {
        vec![
            "release".into(),
            "view".into(),
            tag.into(),
            "--repo".into(),
            self.repo.clone(),
        ]
    }

    fn create_args(&self, tag: &str, title: &str, notes: &str) -> Vec<String> {
        vec![
            "release".into(),
            "create".into(),
            tag.into(),
            "--repo".into(),
            self.repo.clone(),
            "--title".into(),
            title.into(),
            "--notes".into(),
            notes.into(),
        ]
    }

    fn upload_args(&self, tag: &str, file: &Path, clobber: bool) -> Vec<String> {
        let mut args = vec![
            "release".into(),
            "upload".into(),
            tag.into(),
            file.to_string_lossy().to_string(),
            "--repo".into(),
            self.repo.clone(),
        ];
        if clobber {
            args.push("--clobber".into());
        }
        args
    }

    /// Run gh and return its output regardless of exit status
    async fn run(&self, args: &[String]) -> Result<Output> {
        info!("$ {} {}", self.binary_path, args.join(" "));

        let output = Command::new(&self.binary_path)
            .args(args)
            .output()
            .await
            .with_context(|| format!("Failed to run {}", self.binary_path))?;

        log_output(&output);
        Ok(output)
    }

    /// Run gh and fail on a non-zero exit status
    async fn run_checked(&self, args: &[String]) -> Result<Output> {
        let output = self.run(args).await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let exit_code = output.status.code().unwrap_or(-1);
            anyhow::bail!(
                "`{} {}` failed with exit code {}: {}",
                self.binary_path,
                args.join(" "),
                exit_code,
                stderr.trim()
            );
        }
        Ok(output)
    }
}

#[async_trait]
impl ReleasePublisher for GhCli {
    fn name(&self) -> &str {
        "gh"
    }

    async fn release_exists(&self, tag: &str) -> Result<bool> {
        let output = self.run(&self.view_args(tag)).await?;
        Ok(output.status.success())
    }

    async fn create_release(&self, tag: &str, title: &str, notes: &str) -> Result<()> {
        self.run_checked(&self.create_args(tag, title, notes)).await?;
        Ok(())
    }

    async fn upload_asset(&self, tag: &str, file: &Path, clobber: bool) -> Result<()> {
        self.run_checked(&self.upload_args(tag, file, clobber)).await?;
        Ok(())
    }
}
