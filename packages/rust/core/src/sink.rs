//! Artifact persistence behind an injectable sink.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::debug;

use pagegen_shared::{PageGenError, Result};

/// Checksum record for one persisted artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactMeta {
    pub filename: String,
    pub sha256: String,
    pub size_bytes: u64,
}

impl ArtifactMeta {
    pub fn for_content(filename: &str, content: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(content.as_bytes());
        Self {
            filename: filename.to_string(),
            sha256: format!("{:x}", hasher.finalize()),
            size_bytes: content.len() as u64,
        }
    }
}

/// Destination for generated pages.
pub trait ArtifactSink: Send + Sync {
    /// Write `content` to `path`, overwriting and creating parent directories.
    fn write(&self, path: &Path, content: &str) -> Result<()>;

    /// Delete an artifact written earlier. Removing a missing path is not an error.
    fn remove(&self, path: &Path) -> Result<()>;
}

/// Writes to the local filesystem atomically (temp file, then rename).
#[derive(Debug, Default, Clone, Copy)]
pub struct FsSink;

impl ArtifactSink for FsSink {
    fn write(&self, path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| PageGenError::io(parent, e))?;
        }

        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| PageGenError::io(path, std::io::ErrorKind::InvalidInput.into()))?;
        let temp = path.with_file_name(format!(".{filename}.tmp"));

        std::fs::write(&temp, content).map_err(|e| PageGenError::io(&temp, e))?;
        std::fs::rename(&temp, path).map_err(|e| PageGenError::io(path, e))?;

        debug!(path = %path.display(), bytes = content.len(), "artifact written");
        Ok(())
    }

    fn remove(&self, path: &Path) -> Result<()> {
        match std::fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(PageGenError::io(path, e)),
        }
    }
}

/// Keeps written artifacts in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    files: Mutex<BTreeMap<PathBuf, String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Content last written to `path`.
    pub fn get(&self, path: &Path) -> Option<String> {
        self.files.lock().ok()?.get(path).cloned()
    }

    pub fn paths(&self) -> Vec<PathBuf> {
        self.files
            .lock()
            .map(|files| files.keys().cloned().collect())
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.paths().is_empty()
    }
}

impl ArtifactSink for MemorySink {
    fn write(&self, path: &Path, content: &str) -> Result<()> {
        let mut files = self
            .files
            .lock()
            .map_err(|_| PageGenError::io(path, std::io::Error::other("memory sink poisoned")))?;
        files.insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn remove(&self, path: &Path) -> Result<()> {
        let mut files = self
            .files
            .lock()
            .map_err(|_| PageGenError::io(path, std::io::Error::other("memory sink poisoned")))?;
        files.remove(path);
        Ok(())
    }
}
