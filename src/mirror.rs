//! Live mirror — background re-display of the last published artifact.
//!
//! A single long-lived task polls the artifact by byte size. On a size change
//! it re-reads the content, re-shapes it through the shared table shaper, and
//! prints the table. The mirror is a best-effort display, never a source of
//! truth: a missing artifact or a torn read is silently skipped for that
//! tick, and the loop never terminates on error.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::artifact::ArtifactStore;
use crate::table::Table;

/// Reference poll interval of the demo.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Polling state over an artifact store: the last observed size in bytes,
/// 0 until the artifact is first seen.
pub struct Mirror {
    store: Arc<dyn ArtifactStore>,
    last_size: u64,
}

impl Mirror {
    pub fn new(store: Arc<dyn ArtifactStore>) -> Self {
        Self {
            store,
            last_size: 0,
        }
    }

    /// One poll step. Returns the re-shaped table when the artifact size
    /// changed since the last successful emit, `None` otherwise.
    ///
    /// Every failure mode (missing artifact, read error, zero-row content)
    /// is swallowed here and leaves the tracked size untouched, so the next
    /// complete write is still detected.
    pub fn poll_if_changed(&mut self) -> Option<Table> {
        let size = match self.store.size() {
            Ok(Some(size)) => size,
            Ok(None) => return None,
            Err(e) => {
                log::debug!("[MIRROR] Size probe failed: {}", e);
                return None;
            }
        };
        if size == self.last_size {
            return None;
        }

        let content = match self.store.read() {
            Ok(content) => content,
            Err(e) => {
                log::debug!("[MIRROR] Read failed, retrying next tick: {}", e);
                return None;
            }
        };
        let table = match Table::from_artifact_text(&content) {
            Ok(table) => table,
            Err(_) => {
                log::debug!("[MIRROR] Artifact has no rows yet, retrying next tick");
                return None;
            }
        };

        self.last_size = size;
        Some(table)
    }

    /// Spawn the polling loop on the async runtime.
    ///
    /// The loop runs until the returned handle signals shutdown (or the
    /// process exits). Dropping the handle also stops the loop.
    pub fn spawn(mut self, interval: Duration) -> MirrorHandle {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        if let Some(table) = self.poll_if_changed() {
                            log::info!(
                                "[MIRROR] Artifact changed ({} bytes) — re-rendering",
                                self.last_size
                            );
                            println!("{table}");
                        }
                    }
                    _ = shutdown_rx.changed() => break,
                }
            }
        });
        MirrorHandle {
            shutdown: shutdown_tx,
            task,
        }
    }
}

/// Handle for tearing the mirror down at process shutdown.
pub struct MirrorHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl MirrorHandle {
    /// Signal the loop to stop and wait for it to finish.
    pub async fn stop(self) {
        let _ = self.shutdown.send(true);
        let _ = self.task.await;
    }
}
