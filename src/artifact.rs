//! Durable artifact — the hand-off point between the request path and the
//! live mirror.
//!
//! The artifact is a plain UTF-8 text file with last-write-wins semantics and
//! no locking. The `ArtifactStore` seam keeps the storage backing swappable
//! and the mirror testable without touching the real output path.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::page::PageResult;

/// Storage seam for the durable artifact.
///
/// One writer (the request path) by convention; one polling reader (the
/// mirror) tolerant of torn reads. No transactional guarantee is provided
/// beyond what the backing storage offers.
pub trait ArtifactStore: Send + Sync {
    /// Replace the artifact content entirely. Never appends.
    fn write(&self, text: &str) -> io::Result<()>;

    /// Current artifact size in bytes, or `None` if it does not exist yet.
    fn size(&self) -> io::Result<Option<u64>>;

    /// Full artifact content.
    fn read(&self) -> io::Result<String>;
}

/// File-backed artifact store.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ArtifactStore for FileStore {
    fn write(&self, text: &str) -> io::Result<()> {
        fs::write(&self.path, text)
    }

    fn size(&self) -> io::Result<Option<u64>> {
        match fs::metadata(&self.path) {
            Ok(meta) => Ok(Some(meta.len())),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn read(&self) -> io::Result<String> {
        fs::read_to_string(&self.path)
    }
}

/// Publish a page result: canonical text form, full overwrite of any prior
/// content.
pub fn publish(store: &dyn ArtifactStore, page: &PageResult) -> io::Result<()> {
    let text = page.to_text();
    store.write(&text)?;
    log::info!(
        "[ARTIFACT] Published {} lines ({} bytes)",
        page.lines().len(),
        text.len()
    );
    Ok(())
}
