//! Host integration: clipboard, browser and downloads
//!
//! The controller talks to the host through [`HostActions`] so tests can
//! record side effects instead of touching the desktop.

use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::thread::JoinHandle;
use std::time::Duration;

use arboard::Clipboard;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;

use super::osc52::Osc52Clipboard;
use crate::core::HostError;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

/// File name a cited document is saved under
///
/// Whitespace runs become `_`; path separators are replaced so the name
/// stays inside the download directory.
pub fn download_filename(source: &str) -> String {
    let name = WHITESPACE.replace_all(source.trim(), "_");
    let name = name.replace(['/', '\\'], "_");
    let name = if name.is_empty() { "document".to_string() } else { name };
    format!("{}.pdf", name)
}

/// Spawn `cmd arg` detached from the terminal; a background thread waits on
/// the child so it does not linger as a zombie
fn spawn_reaped(cmd: &str, arg: &str) -> Result<JoinHandle<Option<ExitStatus>>, HostError> {
    let mut child = Command::new(cmd)
        .arg(arg)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| HostError::OpenLink(format!("{}: {}", cmd, e)))?;

    let cmd = cmd.to_string();
    Ok(std::thread::spawn(move || match child.wait() {
        Ok(status) => {
            if !status.success() {
                tracing::debug!(cmd = %cmd, %status, "link opener exited with failure");
            }
            Some(status)
        }
        Err(e) => {
            tracing::debug!(cmd = %cmd, error = %e, "failed to wait on link opener");
            None
        }
    }))
}

/// Side effects the UI can ask of the host
#[async_trait]
pub trait HostActions: Send + Sync {
    /// Place text on the clipboard
    fn copy_text(&self, text: &str) -> Result<(), HostError>;

    /// Open a link in the default browser
    fn open_link(&self, url: &str) -> Result<(), HostError>;

    /// Fetch `url` and store it at `dest`, returning the written path
    async fn download(&self, url: &str, dest: &Path) -> Result<PathBuf, HostError>;
}

/// The real desktop
pub struct SystemHost {
    client: reqwest::Client,
}

impl SystemHost {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .unwrap_or_default();
        Self { client }
    }

    fn open_command() -> &'static str {
        if cfg!(target_os = "macos") {
            "open"
        } else if cfg!(target_os = "windows") {
            "explorer"
        } else {
            "xdg-open"
        }
    }
}

impl Default for SystemHost {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HostActions for SystemHost {
    fn copy_text(&self, text: &str) -> Result<(), HostError> {
        let native = Clipboard::new().and_then(|mut clipboard| clipboard.set_text(text));
        match native {
            Ok(()) => Ok(()),
            Err(e) => {
                tracing::debug!(error = %e, "native clipboard unavailable, trying OSC 52");
                if !Osc52Clipboard::is_likely_supported() {
                    return Err(HostError::Clipboard(e.to_string()));
                }
                Osc52Clipboard::write_text(text)
                    .map_err(|io| HostError::Clipboard(io.to_string()))
            }
        }
    }

    fn open_link(&self, url: &str) -> Result<(), HostError> {
        spawn_reaped(Self::open_command(), url).map(|_| ())
    }

    async fn download(&self, url: &str, dest: &Path) -> Result<PathBuf, HostError> {
        tracing::info!(url, dest = %dest.display(), "downloading cited document");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| HostError::Download(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(HostError::Download(format!("server returned {}", status)));
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|e| HostError::Download(e.to_string()))?;

        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(dest, &bytes).await?;
        Ok(dest.to_path_buf())
    }
}
