//! External pandoc converter
//!
//! Availability is probed once per process and cached: the first conversion
//! looks for a working pandoc binary, optionally runs the configured install
//! command, and records the outcome. Later calls never probe again.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use super::ConvertError;
use super::postprocess::clean_pandoc_markdown;
use crate::config::PandocConfig;

const PANDOC_BINARY: &str = "pandoc";
const VERSION_PROBE_TIMEOUT: Duration = Duration::from_secs(10);
const INSTALL_TIMEOUT: Duration = Duration::from_secs(600);

/// What is known about pandoc in this process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Not probed yet
    Unknown,
    Available,
    Unavailable,
}

/// HTML to markdown through a `pandoc --from=html --to=markdown` child process
#[derive(Debug)]
pub struct PandocConverter {
    config: PandocConfig,
    probe: OnceCell<Option<PathBuf>>,
}

impl PandocConverter {
    #[must_use]
    pub fn new(config: PandocConfig) -> Self {
        Self {
            config,
            probe: OnceCell::new(),
        }
    }

    #[must_use]
    pub fn capability(&self) -> Capability {
        match self.probe.get() {
            None => Capability::Unknown,
            Some(Some(_)) => Capability::Available,
            Some(None) => Capability::Unavailable,
        }
    }

    /// Probe on first use; cached afterwards, including a negative result
    pub async fn ensure_available(&self) -> Option<&Path> {
        self.probe.get_or_init(|| self.detect()).await.as_deref()
    }

    async fn detect(&self) -> Option<PathBuf> {
        if !self.config.enabled() {
            debug!("pandoc disabled by configuration");
            return None;
        }

        if let Some(path) = self.locate().await {
            info!("Using pandoc at {}", path.display());
            return Some(path);
        }

        let Some(command) = self.config.install_command() else {
            info!("pandoc not found; using built-in converter");
            return None;
        };

        info!("pandoc not found; running install command");
        run_install_command(command).await;

        let located = self.locate().await;
        match &located {
            Some(path) => info!("Installed pandoc at {}", path.display()),
            None => warn!("pandoc still unavailable after install command; using built-in converter"),
        }
        located
    }

    async fn locate(&self) -> Option<PathBuf> {
        let candidate = match self.config.executable() {
            Some(path) => path.to_path_buf(),
            None => which::which(PANDOC_BINARY).ok()?,
        };
        responds_to_version(&candidate).await.then_some(candidate)
    }

    /// Convert HTML with pandoc and clean up its output
    ///
    /// # Errors
    ///
    /// `Unavailable` when no working pandoc exists, otherwise the spawn, I/O,
    /// timeout or exit-status failure of this particular run.
    pub async fn convert(&self, html: &str) -> Result<String, ConvertError> {
        let executable = self
            .ensure_available()
            .await
            .ok_or(ConvertError::Unavailable)?;

        let markdown = run_pandoc(executable, html, self.config.timeout()).await?;
        Ok(clean_pandoc_markdown(&markdown))
    }
}

async fn responds_to_version(executable: &Path) -> bool {
    let probe = Command::new(executable)
        .arg("--version")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .status();

    match tokio::time::timeout(VERSION_PROBE_TIMEOUT, probe).await {
        Ok(Ok(status)) => status.success(),
        Ok(Err(e)) => {
            debug!("pandoc probe at {} failed: {}", executable.display(), e);
            false
        }
        Err(_) => {
            warn!("pandoc probe at {} timed out", executable.display());
            false
        }
    }
}

async fn run_install_command(command: &str) {
    let mut shell = if cfg!(windows) {
        let mut cmd = Command::new("cmd");
        cmd.arg("/C");
        cmd
    } else {
        let mut cmd = Command::new("sh");
        cmd.arg("-c");
        cmd
    };

    let run = shell
        .arg(command)
        .stdin(Stdio::null())
        .kill_on_drop(true)
        .output();

    match tokio::time::timeout(INSTALL_TIMEOUT, run).await {
        Ok(Ok(output)) if output.status.success() => debug!("pandoc install command succeeded"),
        Ok(Ok(output)) => warn!(
            "pandoc install command exited with {}: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        ),
        Ok(Err(e)) => warn!("Failed to run pandoc install command: {}", e),
        Err(_) => warn!("pandoc install command timed out after {:?}", INSTALL_TIMEOUT),
    }
}

async fn run_pandoc(executable: &Path, html: &str, limit: Duration) -> Result<String, ConvertError> {
    let mut child = Command::new(executable)
        .args(["--from=html", "--to=markdown"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(ConvertError::Spawn)?;

    let mut stdin = child
        .stdin
        .take()
        .ok_or_else(|| ConvertError::Failed("pandoc stdin was not captured".to_string()))?;

    // Feed stdin concurrently so a large document cannot deadlock against a
    // full stdout pipe
    let input = html.to_owned();
    let writer = tokio::spawn(async move {
        stdin.write_all(input.as_bytes()).await?;
        stdin.shutdown().await
    });

    let output = match tokio::time::timeout(limit, child.wait_with_output()).await {
        Ok(result) => result.map_err(ConvertError::Io)?,
        Err(_) => {
            writer.abort();
            return Err(ConvertError::Timeout(limit));
        }
    };

    match writer.await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => debug!("Writing to pandoc stdin failed: {}", e),
        Err(e) => debug!("pandoc stdin writer task failed: {}", e),
    }

    if !output.status.success() {
        return Err(ConvertError::Failed(format!(
            "pandoc exited with {}: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn disabled() -> PandocConfig {
        PandocConfig {
            enabled: false,
            ..PandocConfig::default()
        }
    }

    #[tokio::test]
    async fn capability_starts_unknown() {
        let pandoc = PandocConverter::new(PandocConfig::default());
        assert_eq!(pandoc.capability(), Capability::Unknown);
    }

    #[tokio::test]
    async fn disabled_pandoc_is_unavailable_and_cached() {
        let pandoc = PandocConverter::new(disabled());
        let result = pandoc.convert("<p>hi</p>").await;
        assert!(matches!(result, Err(ConvertError::Unavailable)));
        assert_eq!(pandoc.capability(), Capability::Unavailable);

        // Second call hits the cache
        assert!(pandoc.ensure_available().await.is_none());
    }

    #[tokio::test]
    async fn missing_explicit_binary_is_unavailable() {
        let pandoc = PandocConverter::new(PandocConfig {
            executable: Some(PathBuf::from("/nonexistent/markscrape/pandoc")),
            ..PandocConfig::default()
        });
        assert!(pandoc.ensure_available().await.is_none());
        assert_eq!(pandoc.capability(), Capability::Unavailable);
    }
}
