//! Command file watching
//!
//! The watcher subscribes to the command file's directory, reads whatever
//! was appended on every change, and forwards the text to the engine task.
//! Watching the directory rather than the file keeps the subscription alive
//! when a writer deletes and recreates the file.

pub mod command_file;
pub mod tail;

pub use tail::{CommandFileTail, ReadOutcome};

use anyhow::{bail, Context, Result};
use notify::{recommended_watcher, EventKind, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::app::config::WatcherConfig;
use crate::app::events::EngineEvent;

/// Tails the command file and feeds the engine
pub struct CommandFileWatcher {
    path: PathBuf,
    config: WatcherConfig,
}

impl CommandFileWatcher {
    pub fn new(path: PathBuf, config: WatcherConfig) -> Self {
        Self { path, config }
    }

    /// Watch until the engine goes away
    ///
    /// Returns an error when the file can't be watched or reopened; the
    /// dialog keeps running without command-file updates in that case.
    /// Aborting the task drops the subscription and closes the handle.
    pub async fn run(self, tx: mpsc::Sender<EngineEvent>) -> Result<()> {
        let (fs_tx, mut fs_rx) = mpsc::unbounded_channel();
        let mut watcher = recommended_watcher(move |res: notify::Result<notify::Event>| {
            let _ = fs_tx.send(res);
        })
        .context("Failed to create file watcher")?;

        let watch_dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        watcher
            .watch(watch_dir, RecursiveMode::NonRecursive)
            .with_context(|| format!("Failed to watch {}", watch_dir.display()))?;

        info!(path = %self.path.display(), "Command file watcher started");

        let mut tail = CommandFileTail::open(&self.path)?;
        if !self.forward(&mut tail, &tx).await? {
            return Ok(());
        }

        while let Some(res) = fs_rx.recv().await {
            match res {
                Ok(event) if self.concerns(&event) => {
                    if !self.forward(&mut tail, &tx).await? {
                        break;
                    }
                }
                Ok(_) => {}
                Err(e) => warn!(error = %e, watcher = "command_file", "File watcher error"),
            }
        }

        info!(watcher = "command_file", "Command file watcher shutting down");
        Ok(())
    }

    /// Whether a file-system event touches the command file
    fn concerns(&self, event: &notify::Event) -> bool {
        if matches!(event.kind, EventKind::Access(_)) {
            return false;
        }
        let name = self.path.file_name();
        event
            .paths
            .iter()
            .any(|path| path.file_name().is_some() && path.file_name() == name)
    }

    /// Read new text and send it; `false` once the engine has gone away
    async fn forward(
        &self,
        tail: &mut CommandFileTail,
        tx: &mpsc::Sender<EngineEvent>,
    ) -> Result<bool> {
        loop {
            match tail.read_available() {
                Ok(ReadOutcome::Data { text, modified }) => {
                    debug!("Read {} bytes from command file", text.len());
                    return Ok(tx.send(EngineEvent::Chunk { text, modified }).await.is_ok());
                }
                Ok(ReadOutcome::Idle) => return Ok(true),
                Ok(ReadOutcome::Rotated) => {
                    info!(path = %self.path.display(), "Command file replaced, reopening");
                }
                Err(e) => warn!("Command file read failed, reopening: {:#}", e),
            }
            *tail = self.reopen().await?;
        }
    }

    /// Reopen the file with exponential backoff
    async fn reopen(&self) -> Result<CommandFileTail> {
        for attempt in 0..self.config.reopen_max_attempts {
            tokio::time::sleep(self.config.reopen_delay(attempt)).await;
            match CommandFileTail::open(&self.path) {
                Ok(tail) => {
                    debug!(attempt, "Command file reopened");
                    return Ok(tail);
                }
                Err(e) => debug!(attempt, "Reopen failed: {:#}", e),
            }
        }
        bail!(
            "Giving up on command file {} after {} attempts",
            self.path.display(),
            self.config.reopen_max_attempts
        )
    }
}
